//! Registration form.

use marquee_domain::{Registration, Route};
use tokio_util::sync::CancellationToken;

use crate::cancellation::ViewScope;
use crate::views::{CallOutcome, Feedback, ViewContext};

const SIGNUP_FAILED: &str = "Error creating account. Please try again.";

/// Account registration; a new account is signed in right away.
#[derive(Debug)]
pub struct SignUpView {
    ctx: ViewContext,
    scope: ViewScope,
    error: Option<String>,
}

impl SignUpView {
    /// Creates the form.
    #[must_use]
    pub fn new(ctx: ViewContext) -> Self {
        Self {
            ctx,
            scope: ViewScope::new(),
            error: None,
        }
    }

    /// Registers and signs in. Returns the home route on success.
    pub async fn submit(&mut self, email: &str, username: &str, password: &str) -> Option<Route> {
        let registration = match Registration::new(email, username, password) {
            Ok(registration) => registration,
            Err(err) => {
                self.error = Some(err.to_string());
                return None;
            }
        };

        let outcome = self
            .ctx
            .call(
                &self.scope,
                "register",
                Feedback::Silent,
                self.ctx.api().register(&registration),
            )
            .await;

        match outcome {
            CallOutcome::Completed(token) => {
                self.error = None;
                self.ctx.session().login(token).await;
                Some(Route::Home)
            }
            CallOutcome::Failed(_) => {
                self.error = Some(SIGNUP_FAILED.to_string());
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
