//! Movie detail page.

use marquee_domain::{MovieDetail, MovieId, MovieSummary, Route};
use tokio_util::sync::CancellationToken;

use crate::cancellation::ViewScope;
use crate::optimistic::Optimistic;
use crate::views::{CallOutcome, Feedback, ViewContext};

const LOAD_FAILED: &str = "Failed to fetch movie details.";
const WATCHLIST_FAILED: &str = "Failed to update watchlist.";

/// Movie page: player embed, credits, watchlist button, recommendations.
#[derive(Debug)]
pub struct MovieView {
    ctx: ViewContext,
    scope: ViewScope,
    movie_id: MovieId,
    detail: Option<MovieDetail>,
    watchlisted: Optimistic<bool>,
}

impl MovieView {
    /// Creates the view for one movie.
    #[must_use]
    pub fn new(ctx: ViewContext, movie_id: MovieId) -> Self {
        Self {
            ctx,
            scope: ViewScope::new(),
            movie_id,
            detail: None,
            watchlisted: Optimistic::new(false),
        }
    }

    /// Loads the movie, then refreshes the session profile since opening a
    /// premium movie may have spent coins.
    ///
    /// Returns the login route without a call if signed out, and the home
    /// route if the movie could not be loaded.
    pub async fn load(&mut self) -> Option<Route> {
        if !self.ctx.session().is_logged_in() {
            return Some(Route::Login);
        }

        let movie_id = self.movie_id;
        let outcome = self
            .ctx
            .call_authenticated(
                &self.scope,
                "movie",
                Feedback::Notify(LOAD_FAILED),
                |api, token| async move { api.movie_detail(&token, movie_id).await },
            )
            .await;

        let route = match outcome {
            CallOutcome::Completed(detail) => {
                self.watchlisted.set_confirmed(detail.summary.is_watchlisted);
                self.detail = Some(detail);
                None
            }
            CallOutcome::Failed(_) => Some(Route::Home),
            CallOutcome::SignedOut => return Some(Route::Login),
            CallOutcome::Discarded => return None,
        };

        self.ctx.session().refresh_profile().await;
        route
    }

    /// Adds or removes the movie from the watchlist, showing the new state
    /// immediately and rolling back if the server refuses.
    pub async fn toggle_watchlist(&mut self) -> Option<Route> {
        let title = self.detail.as_ref()?.summary.title.clone();
        let movie_id = self.movie_id;
        let adding = !*self.watchlisted.current();
        self.watchlisted.apply(adding);

        let outcome = self
            .ctx
            .call_authenticated(
                &self.scope,
                if adding { "watchlist_add" } else { "watchlist_remove" },
                Feedback::Notify(WATCHLIST_FAILED),
                |api, token| async move {
                    if adding {
                        api.add_to_watchlist(&token, movie_id).await
                    } else {
                        api.remove_from_watchlist(&token, movie_id).await
                    }
                },
            )
            .await;

        if outcome.is_completed() {
            self.watchlisted.confirm();
            let message = if adding {
                format!("{title} has been added to your watchlist.")
            } else {
                format!("{title} has been removed from your watchlist.")
            };
            self.ctx.notifier().success(message);
        } else {
            self.watchlisted.rollback();
        }
        outcome.route()
    }

    /// Loaded movie.
    #[must_use]
    pub const fn detail(&self) -> Option<&MovieDetail> {
        self.detail.as_ref()
    }

    /// Recommendations shown below the player.
    #[must_use]
    pub fn recommended(&self) -> &[MovieSummary] {
        self.detail
            .as_ref()
            .map(|d| d.recommended_movies.as_slice())
            .unwrap_or_default()
    }

    /// Watchlist state as displayed.
    #[must_use]
    pub fn is_watchlisted(&self) -> bool {
        *self.watchlisted.current()
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
    use crate::test_support::{TestHarness, sample_detail, sample_profile};
    use marquee_domain::UserProfile;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_signed_out_routes_to_login_without_call() {
        let harness = TestHarness::new();
        let mut view = MovieView::new(harness.context(), 1);

        assert_eq!(view.load().await, Some(Route::Login));
        assert_eq!(harness.api.call_count("movie"), 0);
    }

    #[tokio::test]
    async fn test_load_sets_detail_and_refreshes_profile() {
        let harness = TestHarness::signed_in().await;
        harness.api.set_movie(Ok(sample_detail(1, "Dune")));
        harness.api.set_profile(Ok(UserProfile {
            coins: 80,
            ..sample_profile()
        }));
        let mut view = MovieView::new(harness.context(), 1);

        assert_eq!(view.load().await, None);

        assert_eq!(view.detail().unwrap().summary.title, "Dune");
        assert_eq!(view.recommended()[0].title, "Arrival");
        assert_eq!(harness.session.snapshot().coins(), Some(80));
        assert_eq!(harness.api.call_count("verify"), 2);
        assert_eq!(
            harness.api.bearer_tokens("movie"),
            vec![TestHarness::TOKEN.to_string()]
        );
    }

    #[tokio::test]
    async fn test_load_failure_routes_home() {
        let harness = TestHarness::signed_in().await;
        harness.api.set_movie(Err(ApiError::Status {
            status: 500,
            message: "boom".to_string(),
        }));
        let mut view = MovieView::new(harness.context(), 1);

        assert_eq!(view.load().await, Some(Route::Home));

        assert!(view.detail().is_none());
        assert_eq!(harness.notifier.messages(), vec![LOAD_FAILED]);
        assert_eq!(harness.api.call_count("verify"), 2);
    }

    #[tokio::test]
    async fn test_expired_token_routes_to_login() {
        let harness = TestHarness::signed_in().await;
        harness
            .api
            .set_movie(Err(ApiError::Unauthorized { status: 401 }));
        let mut view = MovieView::new(harness.context(), 1);

        assert_eq!(view.load().await, Some(Route::Login));
        assert!(!harness.session.is_logged_in());
        assert!(!harness.tokens.is_present());
    }

    #[tokio::test]
    async fn test_toggle_adds_then_removes() {
        let harness = TestHarness::signed_in().await;
        harness.api.set_movie(Ok(sample_detail(1, "Dune")));
        let mut view = MovieView::new(harness.context(), 1);
        view.load().await;

        assert_eq!(view.toggle_watchlist().await, None);
        assert!(view.is_watchlisted());
        assert_eq!(view.toggle_watchlist().await, None);
        assert!(!view.is_watchlisted());

        assert_eq!(
            harness.notifier.messages(),
            vec![
                "Dune has been added to your watchlist.",
                "Dune has been removed from your watchlist.",
            ]
        );
        assert_eq!(harness.api.details("watchlist_add"), vec!["1"]);
        assert_eq!(harness.api.details("watchlist_remove"), vec!["1"]);
    }

    #[tokio::test]
    async fn test_toggle_failure_rolls_back() {
        let harness = TestHarness::signed_in().await;
        harness.api.set_movie(Ok(sample_detail(1, "Dune")));
        harness
            .api
            .set_ack("watchlist_add", Err(ApiError::Network("reset".to_string())));
        let mut view = MovieView::new(harness.context(), 1);
        view.load().await;

        view.toggle_watchlist().await;

        assert!(!view.is_watchlisted());
        assert_eq!(harness.notifier.messages(), vec![WATCHLIST_FAILED]);
    }

    #[tokio::test]
    async fn test_toggle_shows_pending_state_while_in_flight() {
        let harness = TestHarness::signed_in().await;
        harness.api.set_movie(Ok(sample_detail(1, "Dune")));
        let mut view = MovieView::new(harness.context(), 1);
        view.load().await;
        let gate = harness.api.gate("watchlist_add");
        let busy = harness.busy.clone();

        let (_, seen_busy) = tokio::join!(view.toggle_watchlist(), async {
            let seen = busy.is_busy();
            gate.open();
            seen
        });

        assert!(seen_busy);
        assert!(view.is_watchlisted());
        assert!(!harness.busy.is_busy());
    }

    #[tokio::test]
    async fn test_toggle_before_load_does_nothing() {
        let harness = TestHarness::signed_in().await;
        let mut view = MovieView::new(harness.context(), 1);

        assert_eq!(view.toggle_watchlist().await, None);
        assert_eq!(harness.api.call_count("watchlist_add"), 0);
    }
}
