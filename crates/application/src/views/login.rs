//! Login form.

use marquee_domain::{LoginCredentials, Route};
use tokio_util::sync::CancellationToken;

use crate::cancellation::ViewScope;
use crate::views::{CallOutcome, Feedback, ViewContext};

const LOGIN_FAILED: &str = "Invalid email or password";

/// Email and password login. Errors are shown inline.
#[derive(Debug)]
pub struct LoginView {
    ctx: ViewContext,
    scope: ViewScope,
    error: Option<String>,
}

impl LoginView {
    /// Creates the form.
    #[must_use]
    pub fn new(ctx: ViewContext) -> Self {
        Self {
            ctx,
            scope: ViewScope::new(),
            error: None,
        }
    }

    /// Validates the form, exchanges it for a credential, and starts the
    /// session. Returns the home route on success.
    pub async fn submit(&mut self, email: &str, password: &str) -> Option<Route> {
        let credentials = match LoginCredentials::new(email, password) {
            Ok(credentials) => credentials,
            Err(err) => {
                self.error = Some(err.to_string());
                return None;
            }
        };

        let outcome = self
            .ctx
            .call(
                &self.scope,
                "obtain_token",
                Feedback::Silent,
                self.ctx.api().obtain_token(&credentials),
            )
            .await;

        match outcome {
            CallOutcome::Completed(token) => {
                self.error = None;
                self.ctx.session().login(token).await;
                Some(Route::Home)
            }
            CallOutcome::Failed(_) => {
                self.error = Some(LOGIN_FAILED.to_string());
                None
            }
            CallOutcome::SignedOut | CallOutcome::Discarded => None,
        }
    }

    /// Inline error from the last submit.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Returns a handle that tears this view down.
    #[must_use]
    pub fn cancel_handle(&self) -> CancellationToken {
        self.scope.handle()
    }

    /// Discards any outstanding call.
    pub fn teardown(&self) {
        self.scope.close();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::ports::ApiError;
    use crate::test_support::{TestHarness, sample_profile};
    use marquee_domain::AuthToken;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_successful_login_starts_session() {
        let harness = TestHarness::new();
        harness.api.set_login(Ok(AuthToken::new("fresh")));
        harness.api.set_profile(Ok(sample_profile()));
        let mut view = LoginView::new(harness.context());

        let route = view.submit(" thura@example.com ", "secret").await;

        assert_eq!(route, Some(Route::Home));
        assert_eq!(view.error(), None);
        assert_eq!(harness.session.user(), Some(sample_profile()));
        assert_eq!(harness.tokens.get(), Some(AuthToken::new("fresh")));
        assert_eq!(harness.api.details("obtain_token"), vec!["thura@example.com"]);
        assert!(!harness.busy.is_busy());
    }

    #[tokio::test]
    async fn test_rejected_credentials_show_inline_error() {
        let harness = TestHarness::new();
        harness
            .api
            .set_login(Err(ApiError::Unauthorized { status: 401 }));
        let mut view = LoginView::new(harness.context());

        assert_eq!(view.submit("thura@example.com", "wrong").await, None);

        assert_eq!(view.error(), Some(LOGIN_FAILED));
        assert!(!harness.session.is_logged_in());
        assert!(harness.notifier.active().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_form_makes_no_call() {
        let harness = TestHarness::new();
        let mut view = LoginView::new(harness.context());

        assert_eq!(view.submit("not-an-email", "secret").await, None);
        assert!(view.error().is_some());

        view.submit("thura@example.com", "").await;
        assert_eq!(view.error(), Some("password is required"));

        assert_eq!(harness.api.call_count("obtain_token"), 0);
    }

    #[tokio::test]
    async fn test_login_with_rejected_profile_ends_signed_out() {
        let harness = TestHarness::new();
        harness.api.set_login(Ok(AuthToken::new("abc123")));
        harness
            .api
            .set_profile(Err(ApiError::Unauthorized { status: 401 }));
        let mut view = LoginView::new(harness.context());

        view.submit("thura@example.com", "secret").await;

        assert!(!harness.session.is_logged_in());
        assert!(!harness.tokens.is_present());
    }
}
