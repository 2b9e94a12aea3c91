//! Global busy signal.
//!
//! One shared flag that drives the loading overlay. There is no nesting and
//! no reference counting: the last write wins.

use std::sync::Arc;

use tokio::sync::watch;

/// Cloneable handle to the shared busy flag.
#[derive(Debug, Clone)]
pub struct BusySignal {
    state: Arc<watch::Sender<bool>>,
}

impl BusySignal {
    /// Creates a signal that starts idle.
    #[must_use]
    pub fn new() -> Self {
        let (state, _) = watch::channel(false);
        Self {
            state: Arc::new(state),
        }
    }

    /// Sets the flag.
    pub fn set_busy(&self, busy: bool) {
        self.state.send_if_modified(|current| {
            let changed = *current != busy;
            *current = busy;
            changed
        });
    }

    /// Returns the flag.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        *self.state.borrow()
    }

    /// Subscribes to flag changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.state.subscribe()
    }

    /// Sets the flag and returns a guard that clears it when dropped.
    #[must_use = "busy is cleared as soon as the guard is dropped"]
    pub fn hold(&self) -> BusyGuard {
        self.set_busy(true);
        BusyGuard {
            signal: self.clone(),
        }
    }
}

impl Default for BusySignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Clears the busy flag on drop, whatever path the call took.
#[derive(Debug)]
pub struct BusyGuard {
    signal: BusySignal,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.signal.set_busy(false);
    }
}
