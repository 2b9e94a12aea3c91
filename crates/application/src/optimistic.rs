//! Two-phase optimistic values.
//!
//! A mutation is shown immediately via [`Optimistic::apply`], then either
//! confirmed once the server accepts it or rolled back to the last confirmed
//! value.

/// A value with an optional unconfirmed local change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Optimistic<T> {
    confirmed: T,
    pending: Option<T>,
}

impl<T> Optimistic<T> {
    /// Wraps a server-confirmed value.
    pub const fn new(confirmed: T) -> Self {
        Self {
            confirmed,
            pending: None,
        }
    }

    /// Returns what should be displayed: the pending value if any.
    pub fn current(&self) -> &T {
        self.pending.as_ref().unwrap_or(&self.confirmed)
    }

    /// Returns the last value the server accepted.
    pub const fn confirmed(&self) -> &T {
        &self.confirmed
    }

    /// Returns true while a change awaits confirmation.
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Shows `value` before the server has accepted it.
    pub fn apply(&mut self, value: T) {
        self.pending = Some(value);
    }

    /// Promotes the pending value. No-op if nothing is pending.
    pub fn confirm(&mut self) {
        if let Some(value) = self.pending.take() {
            self.confirmed = value;
        }
    }

    /// Drops the pending value and returns it.
    pub fn rollback(&mut self) -> Option<T> {
        self.pending.take()
    }

    /// Replaces the confirmed value with fresh server state, dropping any
    /// pending change.
    pub fn set_confirmed(&mut self, value: T) {
        self.confirmed = value;
        self.pending = None;
    }
}

impl<T: Default> Default for Optimistic<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_then_confirm() {
        let mut flag = Optimistic::new(false);
        flag.apply(true);
        assert!(*flag.current());
        assert!(!*flag.confirmed());
        assert!(flag.is_pending());

        flag.confirm();
        assert!(*flag.confirmed());
        assert!(!flag.is_pending());
    }

    #[test]
    fn test_apply_then_rollback() {
        let mut name = Optimistic::new("old".to_string());
        name.apply("new".to_string());
        assert_eq!(name.current(), "new");

        assert_eq!(name.rollback().as_deref(), Some("new"));
        assert_eq!(name.current(), "old");
        assert_eq!(name.rollback(), None);
    }

    #[test]
    fn test_set_confirmed_discards_pending() {
        let mut flag = Optimistic::new(false);
        flag.apply(true);
        flag.set_confirmed(false);
        assert!(!*flag.current());
        assert!(!flag.is_pending());
    }
}
