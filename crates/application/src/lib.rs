//! Marquee Application - Session coordination, ports, and view controllers
//!
//! This crate defines the application layer with:
//! - Port traits for the remote storefront API and token persistence
//! - The token store and auth session manager
//! - The shared busy signal and notification queue
//! - Headless view controllers that follow one integration contract

pub mod auth;
pub mod busy;
pub mod cancellation;
pub mod error;
pub mod notifier;
pub mod optimistic;
pub mod ports;
pub mod views;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use auth::{RefreshOutcome, SessionManager, SessionPhase, SessionSnapshot, TokenStore};
pub use busy::{BusyGuard, BusySignal};
pub use cancellation::ViewScope;
pub use error::{ApplicationError, ApplicationResult};
pub use notifier::{NOTICE_LIFETIME, Notifier};
pub use optimistic::Optimistic;
pub use ports::{
    ApiError, ApiResult, MemoryTokenPersistence, StorefrontApi, TokenPersistence,
    TokenPersistenceError,
};
pub use views::{CallOutcome, Feedback, ViewContext};
