//! Storefront API port
//!
//! Every screen talks to the remote backend through this trait. The backend
//! owns authentication, payments, the catalog, and watchlists; this port only
//! describes the calls.

use async_trait::async_trait;
use thiserror::Error;

use marquee_domain::{
    AuthToken, Catalog, LoginCredentials, MovieDetail, MovieId, Order, PasswordReset,
    PurchaseRequest, Registration, SearchPage, SearchQuery, UserProfile, WatchlistEntry,
};

/// Errors returned by storefront API adapters.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The bearer credential was missing, expired, or rejected.
    #[error("not authorized (HTTP {status})")]
    Unauthorized {
        /// HTTP status code (401 or 403).
        status: u16,
    },

    /// The server answered with a non-success status.
    #[error("server returned HTTP {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body or reason phrase.
        message: String,
    },

    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),

    /// The request exceeded the client timeout.
    #[error("request timed out")]
    Timeout,

    /// The response body did not have the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(String),

    /// The request could not be built.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// Maps a non-success HTTP status to an error.
    #[must_use]
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        match status {
            401 | 403 => Self::Unauthorized { status },
            _ => Self::Status {
                status,
                message: message.into(),
            },
        }
    }

    /// Returns true if the server rejected the credential.
    #[must_use]
    pub const fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}

/// Result type for storefront API calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// Port for the remote storefront backend.
///
/// Methods taking an `AuthToken` send it as a bearer credential.
#[async_trait]
pub trait StorefrontApi: Send + Sync {
    /// Exchanges email and password for a credential.
    async fn obtain_token(&self, credentials: &LoginCredentials) -> ApiResult<AuthToken>;

    /// Creates an account and returns its credential.
    async fn register(&self, registration: &Registration) -> ApiResult<AuthToken>;

    /// Verifies the credential and returns the account it belongs to.
    async fn verify_identity(&self, token: &AuthToken) -> ApiResult<UserProfile>;

    /// Emails a one-time password reset code.
    async fn request_otp(&self, email: &str) -> ApiResult<()>;

    /// Sets a new password using the emailed code.
    async fn confirm_password_reset(&self, reset: &PasswordReset) -> ApiResult<()>;

    /// Fetches the home page rows.
    async fn catalog_home(&self, token: Option<&AuthToken>) -> ApiResult<Catalog>;

    /// Fetches one page of search results.
    async fn search(&self, query: &SearchQuery) -> ApiResult<SearchPage>;

    /// Fetches a movie page.
    async fn movie_detail(&self, token: &AuthToken, movie_id: MovieId) -> ApiResult<MovieDetail>;

    /// Lists the caller's watchlist.
    async fn watchlist(&self, token: &AuthToken) -> ApiResult<Vec<WatchlistEntry>>;

    /// Adds a movie to the watchlist.
    async fn add_to_watchlist(&self, token: &AuthToken, movie_id: MovieId) -> ApiResult<()>;

    /// Removes a movie from the watchlist.
    async fn remove_from_watchlist(&self, token: &AuthToken, movie_id: MovieId) -> ApiResult<()>;

    /// Submits a coin purchase with its payment screenshot.
    async fn create_order(&self, token: &AuthToken, order: &PurchaseRequest) -> ApiResult<()>;

    /// Lists the caller's orders.
    async fn order_history(&self, token: &AuthToken) -> ApiResult<Vec<Order>>;

    /// Renames the account.
    async fn update_profile(&self, token: &AuthToken, username: &str) -> ApiResult<()>;
}
