//! Token persistence port
//!
//! Durable storage for the single credential token. Calls are synchronous so
//! the token store can update memory and storage without a suspension point.

use parking_lot::Mutex;

use marquee_domain::AuthToken;

/// Errors that can occur while persisting the credential.
#[derive(Debug, thiserror::Error)]
pub enum TokenPersistenceError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No storage location is available on this platform.
    #[error("no storage location available: {0}")]
    Unavailable(String),
}

/// Durable home of the credential token.
pub trait TokenPersistence: Send + Sync {
    /// Reads the stored token, if any.
    ///
    /// # Errors
    /// Returns an error if the storage exists but cannot be read.
    fn load(&self) -> Result<Option<AuthToken>, TokenPersistenceError>;

    /// Stores the token, replacing any previous one.
    ///
    /// # Errors
    /// Returns an error if the token cannot be written.
    fn save(&self, token: &AuthToken) -> Result<(), TokenPersistenceError>;

    /// Deletes the stored token. Deleting nothing is not an error.
    ///
    /// # Errors
    /// Returns an error if existing storage cannot be removed.
    fn clear(&self) -> Result<(), TokenPersistenceError>;
}

/// Process-local persistence, for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryTokenPersistence {
    token: Mutex<Option<AuthToken>>,
}

impl MemoryTokenPersistence {
    /// Creates empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates storage that already holds a token.
    #[must_use]
    pub fn with_token(token: AuthToken) -> Self {
        Self {
            token: Mutex::new(Some(token)),
        }
    }

    /// Returns what is currently stored.
    #[must_use]
    pub fn stored(&self) -> Option<AuthToken> {
        self.token.lock().clone()
    }
}

impl TokenPersistence for MemoryTokenPersistence {
    fn load(&self) -> Result<Option<AuthToken>, TokenPersistenceError> {
        Ok(self.token.lock().clone())
    }

    fn save(&self, token: &AuthToken) -> Result<(), TokenPersistenceError> {
        *self.token.lock() = Some(token.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenPersistenceError> {
        *self.token.lock() = None;
        Ok(())
    }
}
