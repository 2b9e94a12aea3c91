//! Marquee Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer:
//! - `ReqwestStorefrontApi` talks to the remote storefront over HTTP
//! - `FileTokenPersistence` keeps the credential in the config directory
//! - `ClientConfig` reads endpoint, timeout, and token location

pub mod adapters;
pub mod config;
pub mod persistence;
pub mod screenshot;

pub use adapters::ReqwestStorefrontApi;
pub use config::{ClientConfig, ConfigError};
pub use persistence::FileTokenPersistence;
pub use screenshot::{ScreenshotError, load_screenshot};
