//! Credential token storage.
//!
//! The store keeps the token in memory and mirrors every write to a
//! `TokenPersistence` backend, so the credential survives a restart.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::warn;

use marquee_domain::AuthToken;

use crate::ports::{MemoryTokenPersistence, TokenPersistence};

/// Thread-safe holder of the single credential token.
///
/// Clones share the same token.
#[derive(Clone)]
pub struct TokenStore {
    current: Arc<RwLock<Option<AuthToken>>>,
    persistence: Arc<dyn TokenPersistence>,
}

impl TokenStore {
    /// Opens the store, reading the persisted token once.
    ///
    /// A storage read failure is logged and the store starts empty.
    #[must_use]
    pub fn open(persistence: Arc<dyn TokenPersistence>) -> Self {
        let initial = persistence.load().unwrap_or_else(|err| {
            warn!(error = %err, "could not read stored credential; starting signed out");
            None
        });
        Self {
            current: Arc::new(RwLock::new(initial)),
            persistence,
        }
    }

    /// Creates a store that only lives as long as the process.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::open(Arc::new(MemoryTokenPersistence::new()))
    }

    /// Returns the current credential.
    #[must_use]
    pub fn get(&self) -> Option<AuthToken> {
        self.current.read().clone()
    }

    /// Stores a credential, overwriting any previous one.
    ///
    /// The in-memory value is authoritative even if persisting fails.
    pub fn set(&self, token: AuthToken) {
        let mut current = self.current.write();
        if let Err(err) = self.persistence.save(&token) {
            warn!(error = %err, "could not persist credential");
        }
        *current = Some(token);
    }

    /// Deletes the credential. Removing an absent token is a no-op.
    pub fn remove(&self) {
        let mut current = self.current.write();
        if let Err(err) = self.persistence.clear() {
            warn!(error = %err, "could not delete stored credential");
        }
        *current = None;
    }

    /// Returns true if a credential is present.
    #[must_use]
    pub fn is_present(&self) -> bool {
        self.current.read().is_some()
    }
}

impl Default for TokenStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenStore")
            .field("current", &*self.current.read())
            .finish_non_exhaustive()
    }
}
