//! Transient notification queue shared by all views.
//!
//! Notices disappear on their own after [`NOTICE_LIFETIME`] unless the host
//! dismisses them first. A host that drains the queue itself can opt out of
//! expiry with [`Notifier::without_expiry`].

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Mutex, MutexGuard};
use tracing::debug;

use marquee_domain::{Notice, NoticeId, NoticeLevel};

/// How long a notice stays visible unless dismissed.
pub const NOTICE_LIFETIME: Duration = Duration::from_secs(5);

#[derive(Debug)]
struct Shown {
    notice: Notice,
    at: Instant,
}

/// Cloneable handle to the list of active notices.
#[derive(Debug, Clone)]
pub struct Notifier {
    shown: Arc<Mutex<Vec<Shown>>>,
    lifetime: Option<Duration>,
}

impl Notifier {
    /// Creates an empty queue whose notices expire after [`NOTICE_LIFETIME`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_lifetime(Some(NOTICE_LIFETIME))
    }

    /// Creates an empty queue whose notices stay until dismissed or cleared.
    #[must_use]
    pub fn without_expiry() -> Self {
        Self::with_lifetime(None)
    }

    /// Creates an empty queue with a custom notice lifetime.
    #[must_use]
    pub fn with_lifetime(lifetime: Option<Duration>) -> Self {
        Self {
            shown: Arc::default(),
            lifetime,
        }
    }

    /// Shows a notice and returns its id.
    pub fn push(&self, level: NoticeLevel, message: impl Into<String>) -> NoticeId {
        let notice = Notice::new(level, message);
        let id = notice.id;
        debug!(?level, message = %notice.message, "notice");
        self.visible().push(Shown {
            notice,
            at: Instant::now(),
        });
        id
    }

    /// Shows a success notice.
    pub fn success(&self, message: impl Into<String>) -> NoticeId {
        self.push(NoticeLevel::Success, message)
    }

    /// Shows an informational notice.
    pub fn info(&self, message: impl Into<String>) -> NoticeId {
        self.push(NoticeLevel::Info, message)
    }

    /// Shows an error notice.
    pub fn error(&self, message: impl Into<String>) -> NoticeId {
        self.push(NoticeLevel::Error, message)
    }

    /// Returns the notices currently shown, oldest first.
    #[must_use]
    pub fn active(&self) -> Vec<Notice> {
        self.visible().iter().map(|s| s.notice.clone()).collect()
    }

    /// Returns the messages currently shown, oldest first.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.visible()
            .iter()
            .map(|s| s.notice.message.clone())
            .collect()
    }

    /// Dismisses one notice. Returns false if it was already gone.
    pub fn dismiss(&self, id: NoticeId) -> bool {
        let mut shown = self.visible();
        let before = shown.len();
        shown.retain(|s| s.notice.id != id);
        shown.len() != before
    }

    /// Dismisses everything.
    pub fn clear(&self) {
        self.shown.lock().clear();
    }

    /// Locks the queue after dropping expired notices.
    fn visible(&self) -> MutexGuard<'_, Vec<Shown>> {
        let mut shown = self.shown.lock();
        if let Some(lifetime) = self.lifetime {
            shown.retain(|s| s.at.elapsed() < lifetime);
        }
        shown
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}
