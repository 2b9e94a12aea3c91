//! Cancellation for in-flight calls.
//!
//! A view races each remote call against its [`ViewScope`]. Tearing the view
//! down cancels the scope, and calls still outstanding resolve as discarded
//! instead of writing into a view that no longer exists.

use std::future::Future;

use tokio_util::sync::CancellationToken;

/// Lifetime of one mounted view.
#[derive(Debug, Clone, Default)]
pub struct ViewScope {
    token: CancellationToken,
}

impl ViewScope {
    /// Opens a live scope.
    #[must_use]
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
        }
    }

    /// Runs `fut` unless the scope closes first.
    ///
    /// Returns `None` if the scope was already closed or closes while `fut`
    /// is pending; `fut` is dropped in that case.
    pub async fn run<F>(&self, fut: F) -> Option<F::Output>
    where
        F: Future,
    {
        if self.token.is_cancelled() {
            return None;
        }
        tokio::select! {
            biased;
            () = self.token.cancelled() => None,
            output = fut => Some(output),
        }
    }

    /// Closes the scope. Idempotent.
    pub fn close(&self) {
        self.token.cancel();
    }

    /// Returns true once the scope is closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Returns the token that closes this scope.
    #[must_use]
    pub fn handle(&self) -> CancellationToken {
        self.token.clone()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_run_returns_output_while_open() {
        let scope = ViewScope::new();
        assert_eq!(scope.run(async { 7 }).await, Some(7));
        assert!(!scope.is_closed());
    }

    #[tokio::test]
    async fn test_run_after_close_is_discarded() {
        let scope = ViewScope::new();
        scope.close();
        scope.close();
        assert!(scope.is_closed());
        assert_eq!(scope.run(async { 7 }).await, None);
    }

    #[tokio::test]
    async fn test_handle_closes_scope() {
        let scope = ViewScope::new();
        let handle = scope.handle();

        handle.cancel();

        assert!(scope.is_closed());
        assert!(scope.clone().is_closed());
    }

    #[tokio::test]
    async fn test_close_discards_pending_call() {
        let scope = ViewScope::new();
        let gate = Arc::new(tokio::sync::Notify::new());
        let waiting = gate.clone();

        let (output, ()) = tokio::join!(
            scope.run(async move {
                waiting.notified().await;
                "late"
            }),
            async { scope.handle().cancel() }
        );

        assert_eq!(output, None);
        gate.notify_one();
    }
}
