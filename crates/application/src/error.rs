//! Application error types

use marquee_domain::DomainError;
use thiserror::Error;

use crate::ports::{ApiError, TokenPersistenceError};

/// Application-level errors.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Client-side validation blocked the operation.
    #[error("validation error: {0}")]
    Domain(#[from] DomainError),

    /// The storefront API call failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// The credential could not be persisted or read.
    #[error("token storage error: {0}")]
    Persistence(#[from] TokenPersistenceError),

    /// The operation needs a signed-in session.
    #[error("not signed in")]
    NotSignedIn,

    /// The owning view was torn down before the call resolved.
    #[error("operation cancelled")]
    Cancelled,
}

impl ApplicationError {
    /// Returns true if recovering requires the user to log in again.
    #[must_use]
    pub const fn requires_login(&self) -> bool {
        match self {
            Self::NotSignedIn => true,
            Self::Api(err) => err.is_auth_failure(),
            _ => false,
        }
    }
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_login() {
        assert!(ApplicationError::NotSignedIn.requires_login());
        assert!(ApplicationError::Api(ApiError::Unauthorized { status: 401 }).requires_login());
        assert!(!ApplicationError::Api(ApiError::Timeout).requires_login());
        assert!(!ApplicationError::Cancelled.requires_login());
    }
}
