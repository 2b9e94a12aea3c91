//! Adapter implementations for application ports.

mod reqwest_api;

pub use reqwest_api::ReqwestStorefrontApi;
