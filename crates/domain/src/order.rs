//! Coin purchase orders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Review state of a purchase order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Waiting for the payment screenshot to be reviewed.
    Pending,
    /// Payment accepted and coins credited.
    Confirmed,
    /// Payment rejected.
    Rejected,
    /// Any status this client does not know about.
    #[serde(other)]
    Unknown,
}

impl OrderStatus {
    /// Returns true once the order will not change again.
    #[must_use]
    pub const fn is_settled(self) -> bool {
        matches!(self, Self::Confirmed | Self::Rejected)
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Rejected => "rejected",
            Self::Unknown => "unknown",
        }
    }
}

/// An entry in the caller's order history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Order identifier.
    pub id: u64,
    /// Purchased plan, e.g. "50".
    pub plan: String,
    /// Review state.
    pub status: OrderStatus,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Payment note submitted with the order.
    #[serde(default)]
    pub order_details: Option<String>,
}
