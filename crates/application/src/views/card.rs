//! Movie card shown in rows, grids, and recommendations.

use marquee_domain::{MovieSummary, Route};
use tokio_util::sync::CancellationToken;

use crate::cancellation::ViewScope;
use crate::optimistic::Optimistic;
use crate::views::{Feedback, ViewContext};

const PLAY_SIGNED_OUT: &str = "You must be logged in to play a movie.";
const PLAY_INSUFFICIENT: &str = "Insufficient coins to play this movie.";
const WATCHLIST_SIGNED_OUT: &str = "You must be logged in to manage your watchlist.";
const WATCHLIST_FAILED: &str = "Something went wrong. Please try again.";

/// What pressing play should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayGate {
    /// No credential; playing needs an account.
    SignInRequired,
    /// The movie costs more than the known balance.
    InsufficientCoins,
    /// A premium movie; the user must confirm the cost first.
    ConfirmCost(u64),
    /// Free to open.
    Open,
}

impl PlayGate {
    /// Confirmation prompt for a premium movie.
    #[must_use]
    pub fn prompt(self) -> Option<String> {
        match self {
            Self::ConfirmCost(coins) => Some(format!(
                "This movie will cost {coins} coins. Do you want to proceed?"
            )),
            _ => None,
        }
    }
}

/// A single movie card with play and watchlist buttons.
#[derive(Debug)]
pub struct MovieCard {
    ctx: ViewContext,
    scope: ViewScope,
    movie: MovieSummary,
    watchlisted: Optimistic<bool>,
}

impl MovieCard {
    /// Creates a card for `movie`.
    #[must_use]
    pub fn new(ctx: ViewContext, movie: MovieSummary) -> Self {
        let watchlisted = Optimistic::new(movie.is_watchlisted);
        Self {
            ctx,
            scope: ViewScope::new(),
            movie,
            watchlisted,
        }
    }

    /// Decides what play does, from the session alone.
    ///
    /// A balance that has not been loaded yet counts as zero.
    #[must_use]
    pub fn play_gate(&self) -> PlayGate {
        let session = self.ctx.session();
        if session.token().is_none() {
            return PlayGate::SignInRequired;
        }
        if !self.movie.is_premium() {
            return PlayGate::Open;
        }
        let balance = session.snapshot().coins().unwrap_or(0);
        if balance < self.movie.coins {
            PlayGate::InsufficientCoins
        } else {
            PlayGate::ConfirmCost(self.movie.coins)
        }
    }

    /// Handles the play button.
    ///
    /// `confirm` is asked for premium movies with the cost prompt. Returns the
    /// movie route if the user may proceed.
    pub fn play(&self, confirm: impl FnOnce(&str) -> bool) -> Option<Route> {
        let route = Route::Movie { id: self.movie.id };
        match self.play_gate() {
            PlayGate::SignInRequired => {
                self.ctx.notifier().error(PLAY_SIGNED_OUT);
                None
            }
            PlayGate::InsufficientCoins => {
                self.ctx.notifier().error(PLAY_INSUFFICIENT);
                None
            }
            gate @ PlayGate::ConfirmCost(_) => {
                let prompt = gate.prompt().unwrap_or_default();
                confirm(&prompt).then_some(route)
            }
            PlayGate::Open => Some(route),
        }
    }

    /// Adds or removes the movie from the watchlist.
    pub async fn toggle_watchlist(&mut self) -> Option<Route> {
        if self.ctx.session().token().is_none() {
            self.ctx.notifier().error(WATCHLIST_SIGNED_OUT);
            return None;
        }

        let movie_id = self.movie.id;
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
            let title = &self.movie.title;
            let message = if adding {
                format!("{title} added to watchlist!")
            } else {
                format!("{title} removed from watchlist!")
            };
            self.ctx.notifier().success(message);
        } else {
            self.watchlisted.rollback();
        }
        outcome.route()
    }

    /// The movie on this card.
    #[must_use]
    pub const fn movie(&self) -> &MovieSummary {
        &self.movie
    }

    /// Watchlist state as displayed.
    #[must_use]
    pub fn is_watchlisted(&self) -> bool {
        *self.watchlisted.current()
    }

    /// Returns a handle that tears this card down.
    #[must_use]
    pub fn cancel_handle(&self) -> CancellationToken {
        self.scope.handle()
    }

    /// Discards any outstanding call.
    pub fn teardown(&self) {
        self.scope.close();
    }
}
