//! Headless view controllers.
//!
//! Every screen follows the same contract around a remote call: hold the
//! busy signal, send the bearer token when it has one, update its own state
//! on success, show a notice and log on failure, and clear busy on every
//! exit path. An authentication failure on a bearer call forces a logout and
//! routes to the login screen. [`ViewContext::call`] and its siblings
//! implement that contract once so the controllers only decide what to do
//! with the outcome.

mod card;
mod checkout;
mod home;
mod login;
mod movie;
mod nav;
mod orders;
mod pricing;
mod profile;
mod reset_password;
mod search;
mod signup;

pub use card::{MovieCard, PlayGate};
pub use checkout::CheckoutView;
pub use home::HomeView;
pub use login::LoginView;
pub use movie::MovieView;
pub use nav::NavBar;
pub use orders::OrderHistoryView;
pub use pricing::PricingView;
pub use profile::ProfileView;
pub use reset_password::{ResetPasswordView, ResetStep};
pub use search::SearchView;
pub use signup::SignUpView;

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use tracing::{debug, warn};

use marquee_domain::{AuthToken, Route};

use crate::auth::SessionManager;
use crate::busy::BusySignal;
use crate::cancellation::ViewScope;
use crate::error::{ApplicationError, ApplicationResult};
use crate::notifier::Notifier;
use crate::ports::{ApiError, ApiResult, StorefrontApi};

/// What to show the user when a call fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback<'a> {
    /// Push an error notice with this message.
    Notify(&'a str),
    /// Show nothing; the view reports the failure inline.
    Silent,
}

/// How a remote call made through [`ViewContext`] ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutcome<T> {
    /// The call succeeded.
    Completed(T),
    /// The call failed; feedback was already shown.
    Failed(ApiError),
    /// There was no session, or the server rejected the credential and the
    /// session was signed out.
    SignedOut,
    /// The view was torn down before the call resolved.
    Discarded,
}

impl<T> CallOutcome<T> {
    /// Returns the value of a completed call.
    pub fn completed(self) -> Option<T> {
        match self {
            Self::Completed(value) => Some(value),
            _ => None,
        }
    }

    /// Returns true if the call succeeded.
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    /// Converts into a result.
    ///
    /// # Errors
    /// Returns the API error, `NotSignedIn`, or `Cancelled`.
    pub fn into_result(self) -> ApplicationResult<T> {
        match self {
            Self::Completed(value) => Ok(value),
            Self::Failed(err) => Err(ApplicationError::Api(err)),
            Self::SignedOut => Err(ApplicationError::NotSignedIn),
            Self::Discarded => Err(ApplicationError::Cancelled),
        }
    }

    /// Returns the navigation forced by this outcome, if any.
    pub const fn route(&self) -> Option<Route> {
        match self {
            Self::SignedOut => Some(Route::Login),
            _ => None,
        }
    }
}

/// Everything a view needs, injected at construction.
#[derive(Clone)]
pub struct ViewContext {
    api: Arc<dyn StorefrontApi>,
    session: Arc<SessionManager>,
    busy: BusySignal,
    notifier: Notifier,
}

impl ViewContext {
    /// Creates a context.
    #[must_use]
    pub fn new(
        api: Arc<dyn StorefrontApi>,
        session: Arc<SessionManager>,
        busy: BusySignal,
        notifier: Notifier,
    ) -> Self {
        Self {
            api,
            session,
            busy,
            notifier,
        }
    }

    /// Returns the storefront API.
    #[must_use]
    pub fn api(&self) -> &Arc<dyn StorefrontApi> {
        &self.api
    }

    /// Returns the session manager.
    #[must_use]
    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    /// Returns the busy signal.
    #[must_use]
    pub const fn busy(&self) -> &BusySignal {
        &self.busy
    }

    /// Returns the notification queue.
    #[must_use]
    pub const fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Returns the bearer credential.
    ///
    /// # Errors
    /// Returns `NotSignedIn` if no credential is stored.
    pub fn require_token(&self) -> ApplicationResult<AuthToken> {
        self.session.token().ok_or(ApplicationError::NotSignedIn)
    }

    /// Runs a call that sends no credential.
    ///
    /// Auth failures are reported like any other failure: on a public call a
    /// 401 means bad input, not an expired session.
    pub async fn call<T, F>(
        &self,
        scope: &ViewScope,
        op: &'static str,
        feedback: Feedback<'_>,
        call: F,
    ) -> CallOutcome<T>
    where
        F: Future<Output = ApiResult<T>>,
    {
        self.execute(scope, op, feedback, None, call).await
    }

    /// Runs a call that needs the bearer credential.
    ///
    /// Without a stored credential nothing is sent and the outcome is
    /// `SignedOut`.
    pub async fn call_authenticated<T, F, Fut>(
        &self,
        scope: &ViewScope,
        op: &'static str,
        feedback: Feedback<'_>,
        make_call: F,
    ) -> CallOutcome<T>
    where
        F: FnOnce(Arc<dyn StorefrontApi>, AuthToken) -> Fut,
        Fut: Future<Output = ApiResult<T>>,
    {
        let Some(token) = self.session.token() else {
            debug!(op, "no credential; skipping call");
            return CallOutcome::SignedOut;
        };
        let call = make_call(Arc::clone(&self.api), token.clone());
        self.execute(scope, op, feedback, Some(token), call).await
    }

    /// Runs a call that sends the bearer credential only if one is stored.
    pub async fn call_optional_auth<T, F, Fut>(
        &self,
        scope: &ViewScope,
        op: &'static str,
        feedback: Feedback<'_>,
        make_call: F,
    ) -> CallOutcome<T>
    where
        F: FnOnce(Arc<dyn StorefrontApi>, Option<AuthToken>) -> Fut,
        Fut: Future<Output = ApiResult<T>>,
    {
        let token = self.session.token();
        let call = make_call(Arc::clone(&self.api), token.clone());
        self.execute(scope, op, feedback, token, call).await
    }

    async fn execute<T, F>(
        &self,
        scope: &ViewScope,
        op: &'static str,
        feedback: Feedback<'_>,
        bearer: Option<AuthToken>,
        call: F,
    ) -> CallOutcome<T>
    where
        F: Future<Output = ApiResult<T>>,
    {
        if scope.is_closed() {
            return CallOutcome::Discarded;
        }

        let _busy = self.busy.hold();
        debug!(op, "call started");
        let Some(result) = scope.run(call).await else {
            debug!(op, "view closed; discarding result");
            return CallOutcome::Discarded;
        };

        match result {
            Ok(value) => {
                debug!(op, "call finished");
                CallOutcome::Completed(value)
            }
            Err(err)
                if err.is_auth_failure()
                    && bearer
                        .as_ref()
                        .is_some_and(|token| self.session.logout_if_current(token)) =>
            {
                warn!(op, error = %err, "credential rejected; signed out");
                CallOutcome::SignedOut
            }
            Err(err) => {
                warn!(op, error = %err, "call failed");
                if let Feedback::Notify(message) = feedback {
                    self.notifier.error(message);
                }
                CallOutcome::Failed(err)
            }
        }
    }
}

impl fmt::Debug for ViewContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewContext")
            .field("session", &self.session)
            .field("busy", &self.busy)
            .field("notifier", &self.notifier)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::test_support::{TestHarness, sample_profile};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_busy_is_held_only_during_call() {
        let harness = TestHarness::new();
        let ctx = harness.context();
        let scope = ViewScope::new();
        let busy = ctx.busy().clone();
        assert!(!busy.is_busy());

        let outcome = ctx
            .call(&scope, "ping", Feedback::Silent, async {
                assert!(busy.is_busy());
                Ok::<_, ApiError>(1)
            })
            .await;

        assert_eq!(outcome, CallOutcome::Completed(1));
        assert!(!busy.is_busy());
    }

    #[tokio::test]
    async fn test_failure_clears_busy_and_notifies() {
        let harness = TestHarness::new();
        let ctx = harness.context();
        let scope = ViewScope::new();
        let busy = ctx.busy().clone();

        let outcome: CallOutcome<()> = ctx
            .call(&scope, "ping", Feedback::Notify("Nope."), async {
                assert!(busy.is_busy());
                Err(ApiError::Timeout)
            })
            .await;

        assert_eq!(outcome, CallOutcome::Failed(ApiError::Timeout));
        assert!(!ctx.busy().is_busy());
        assert_eq!(ctx.notifier().messages(), vec!["Nope."]);
    }

    #[tokio::test]
    async fn test_silent_failure_shows_nothing() {
        let harness = TestHarness::new();
        let ctx = harness.context();

        let outcome: CallOutcome<()> = ctx
            .call(&ViewScope::new(), "ping", Feedback::Silent, async {
                Err(ApiError::Timeout)
            })
            .await;

        assert!(!outcome.is_completed());
        assert!(ctx.notifier().active().is_empty());
    }

    #[tokio::test]
    async fn test_public_auth_failure_keeps_session() {
        let harness = TestHarness::signed_in().await;
        let ctx = harness.context();

        let outcome: CallOutcome<()> = ctx
            .call(&ViewScope::new(), "login", Feedback::Silent, async {
                Err(ApiError::Unauthorized { status: 401 })
            })
            .await;

        assert_eq!(outcome.route(), None);
        assert!(ctx.session().is_logged_in());
    }

    #[tokio::test]
    async fn test_bearer_auth_failure_signs_out() {
        let harness = TestHarness::signed_in().await;
        let ctx = harness.context();

        let outcome: CallOutcome<()> = ctx
            .call_authenticated(
                &ViewScope::new(),
                "ping",
                Feedback::Notify("Nope."),
                |_, _| async { Err(ApiError::Unauthorized { status: 401 }) },
            )
            .await;

        assert_eq!(outcome, CallOutcome::SignedOut);
        assert_eq!(outcome.route(), Some(Route::Login));
        assert!(!ctx.session().is_logged_in());
        assert!(ctx.notifier().active().is_empty());
    }

    #[tokio::test]
    async fn test_stale_rejection_keeps_newer_login() {
        let harness = TestHarness::signed_in().await;
        let ctx = harness.context();
        let released = tokio::sync::Notify::new();
        let scope = ViewScope::new();

        let (outcome, ()) = tokio::join!(
            ctx.call_authenticated(
                &scope,
                "ping",
                Feedback::Notify("Nope."),
                |_, token| {
                    let released = &released;
                    async move {
                        assert_eq!(token.as_str(), TestHarness::TOKEN);
                        released.notified().await;
                        Err::<(), _>(ApiError::Unauthorized { status: 401 })
                    }
                },
            ),
            async {
                ctx.session().begin_login(AuthToken::new("new-token"));
                released.notify_one();
            }
        );

        assert_eq!(
            outcome,
            CallOutcome::Failed(ApiError::Unauthorized { status: 401 })
        );
        assert!(ctx.session().is_logged_in());
        assert_eq!(ctx.session().token(), Some(AuthToken::new("new-token")));
        assert_eq!(ctx.notifier().messages(), vec!["Nope."]);
    }

    #[tokio::test]
    async fn test_authenticated_call_without_token_is_skipped() {
        let harness = TestHarness::new();
        let ctx = harness.context();

        let outcome = ctx
            .call_authenticated(
                &ViewScope::new(),
                "ping",
                Feedback::Silent,
                |_, _| -> std::future::Ready<ApiResult<()>> { panic!("must not be called") },
            )
            .await;

        assert_eq!(outcome, CallOutcome::SignedOut);
        assert!(!ctx.busy().is_busy());
    }

    #[tokio::test]
    async fn test_authenticated_call_sends_stored_token() {
        let harness = TestHarness::signed_in().await;
        let ctx = harness.context();

        let outcome = ctx
            .call_authenticated(&ViewScope::new(), "ping", Feedback::Silent, |_, token| async move {
                Ok(token.as_str().to_string())
            })
            .await;

        assert_eq!(outcome.completed().as_deref(), Some(TestHarness::TOKEN));
    }

    #[tokio::test]
    async fn test_optional_auth_without_token_does_not_sign_out() {
        let harness = TestHarness::new();
        let ctx = harness.context();

        let outcome: CallOutcome<()> = ctx
            .call_optional_auth(&ViewScope::new(), "ping", Feedback::Silent, |_, token| async move {
                assert!(token.is_none());
                Err(ApiError::Unauthorized { status: 403 })
            })
            .await;

        assert!(matches!(outcome, CallOutcome::Failed(_)));
    }

    #[tokio::test]
    async fn test_closed_scope_discards_without_busy() {
        let harness = TestHarness::new();
        let ctx = harness.context();
        let scope = ViewScope::new();
        scope.close();
        let mut busy_changes = ctx.busy().subscribe();

        let outcome = ctx
            .call(&scope, "ping", Feedback::Notify("Nope."), async {
                Ok::<_, ApiError>(())
            })
            .await;

        assert_eq!(outcome, CallOutcome::Discarded);
        assert!(!busy_changes.has_changed().unwrap());
        assert!(matches!(
            outcome.into_result(),
            Err(ApplicationError::Cancelled)
        ));
    }

    #[tokio::test]
    async fn test_signed_in_harness_has_profile() {
        let harness = TestHarness::signed_in().await;
        assert_eq!(harness.session.user(), Some(sample_profile()));
    }
}
