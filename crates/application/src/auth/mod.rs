//! Authentication state for the storefront client.
//!
//! This module provides:
//! - The credential token store, mirrored to durable storage
//! - The session manager that owns logged-in state and the user profile

mod session;
mod token_store;

pub use session::{RefreshOutcome, SessionManager, SessionPhase, SessionSnapshot};
pub use token_store::TokenStore;
