//! User profile projection returned by the identity endpoint.

use serde::{Deserialize, Serialize};

/// Minimal view of the signed-in account.
///
/// Treated as a read-through cache of server state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Server-side account identifier.
    pub id: u64,
    /// Display name.
    pub username: String,
    /// Account email.
    pub email: String,
    /// Coin balance available to unlock premium movies.
    #[serde(default)]
    pub coins: u64,
}

impl UserProfile {
    /// Returns true when the balance covers `cost` coins.
    #[must_use]
    pub const fn can_afford(&self, cost: u64) -> bool {
        self.coins >= cost
    }
}
