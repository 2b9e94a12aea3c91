//! Account page.

use marquee_domain::{DomainError, Route, UserProfile, WatchlistEntry};
use tokio_util::sync::CancellationToken;

use crate::cancellation::ViewScope;
use crate::optimistic::Optimistic;
use crate::views::{CallOutcome, Feedback, ViewContext};

const WATCHLIST_FAILED: &str = "Failed to fetch watchlist. Please try again.";
const SAVE_FAILED: &str = "Failed to update profile.";
const SAVE_OK: &str = "Successfully Saved";

/// Profile page: identity, watchlist, rename, and logout.
#[derive(Debug)]
pub struct ProfileView {
    ctx: ViewContext,
    scope: ViewScope,
    profile: Option<UserProfile>,
    username: Optimistic<String>,
    watchlist: Vec<WatchlistEntry>,
}

impl ProfileView {
    /// Creates the view.
    #[must_use]
    pub fn new(ctx: ViewContext) -> Self {
        Self {
            ctx,
            scope: ViewScope::new(),
            profile: None,
            username: Optimistic::default(),
            watchlist: Vec::new(),
        }
    }

    /// Loads identity and watchlist concurrently.
    ///
    /// Each call holds the busy signal on its own. An identity failure is
    /// only logged; a watchlist failure shows a notice.
    pub async fn load(&mut self) -> Option<Route> {
        if !self.ctx.session().is_logged_in() {
            return Some(Route::Login);
        }

        let (identity, watchlist) = tokio::join!(
            self.ctx.call_authenticated(
                &self.scope,
                "verify",
                Feedback::Silent,
                |api, token| async move { api.verify_identity(&token).await },
            ),
            self.ctx.call_authenticated(
                &self.scope,
                "watchlist",
                Feedback::Notify(WATCHLIST_FAILED),
                |api, token| async move { api.watchlist(&token).await },
            ),
        );

        let route = identity.route().or_else(|| watchlist.route());
        if let CallOutcome::Completed(profile) = identity {
            self.username.set_confirmed(profile.username.clone());
            self.profile = Some(profile);
        }
        if let CallOutcome::Completed(entries) = watchlist {
            self.watchlist = entries;
        }
        route
    }

    /// Renames the account.
    ///
    /// The new name shows immediately; on failure it rolls back. On success
    /// the session profile is amended too.
    pub async fn save_username(&mut self, name: &str) -> Option<Route> {
        let name = name.trim().to_string();
        if name.is_empty() {
            self.ctx
                .notifier()
                .error(DomainError::MissingField("username").to_string());
            return None;
        }
        self.username.apply(name.clone());

        let requested = name.clone();
        let outcome = self
            .ctx
            .call_authenticated(
                &self.scope,
                "update_profile",
                Feedback::Notify(SAVE_FAILED),
                |api, token| async move { api.update_profile(&token, &requested).await },
            )
            .await;

        if outcome.is_completed() {
            self.username.confirm();
            if let Some(profile) = &mut self.profile {
                profile.username.clone_from(&name);
            }
            self.ctx.session().amend_user(|user| user.username = name);
            self.ctx.notifier().success(SAVE_OK);
        } else {
            self.username.rollback();
        }
        outcome.route()
    }

    /// Signs out and returns the login route.
    pub fn logout(&self) -> Route {
        self.ctx.session().logout();
        Route::Login
    }

    /// Loaded identity.
    #[must_use]
    pub const fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    /// Display name as shown, including an unconfirmed rename.
    #[must_use]
    pub fn username(&self) -> &str {
        self.username.current()
    }

    /// Watchlisted movies.
    #[must_use]
    pub fn watchlist(&self) -> &[WatchlistEntry] {
        &self.watchlist
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
