//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the application core and external systems.
//! Each port is a trait that can be implemented by adapters in the infrastructure layer.

mod storefront_api;
mod token_persistence;

pub use storefront_api::{ApiError, ApiResult, StorefrontApi};
pub use token_persistence::{MemoryTokenPersistence, TokenPersistence, TokenPersistenceError};
