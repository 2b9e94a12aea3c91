//! Domain error types

use thiserror::Error;

/// Domain-level errors raised by client-side validation.
///
/// These block a remote call before it is made.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A required form field was left empty.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// The email address is not shaped like one.
    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    /// Checkout was submitted without a payment screenshot.
    #[error("Please upload a screenshot before proceeding.")]
    MissingScreenshot,

    /// The requested page is outside the known result range.
    #[error("page {page} is out of range (1..={total})")]
    PageOutOfRange {
        /// Requested page.
        page: u32,
        /// Total number of pages.
        total: u32,
    },

    /// A route string could not be built.
    #[error("invalid route: {0}")]
    InvalidRoute(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
