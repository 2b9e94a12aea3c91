//! Transient user-visible notifications.

use serde::{Deserialize, Serialize};

use crate::id::{NoticeId, generate_notice_id};

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    /// Operation confirmed.
    Success,
    /// Neutral information.
    Info,
    /// Operation failed or was blocked.
    Error,
}

/// A dismissable notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Identifier used to dismiss the notice.
    pub id: NoticeId,
    /// Severity.
    pub level: NoticeLevel,
    /// Message shown to the user.
    pub message: String,
}

impl Notice {
    /// Creates a notice with a fresh id.
    #[must_use]
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            id: generate_notice_id(),
            level,
            message: message.into(),
        }
    }

    /// Creates a success notice.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    /// Creates an error notice.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }

    /// Returns true for error notices.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.level, NoticeLevel::Error)
    }
}
