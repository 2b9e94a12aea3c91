//! Navigation bar.

use marquee_domain::Route;

use crate::views::ViewContext;

/// Search box, coin badge, and account link.
#[derive(Debug, Clone)]
pub struct NavBar {
    ctx: ViewContext,
}

impl NavBar {
    /// Creates the bar.
    #[must_use]
    pub const fn new(ctx: ViewContext) -> Self {
        Self { ctx }
    }

    /// Routes a submitted search. Blank input goes nowhere.
    #[must_use]
    pub fn search(&self, input: &str) -> Option<Route> {
        let key = input.trim();
        (!key.is_empty()).then(|| Route::Search {
            key: key.to_string(),
        })
    }

    /// Coin balance to show, once the profile is loaded.
    #[must_use]
    pub fn coin_badge(&self) -> Option<u64> {
        self.ctx.session().snapshot().coins()
    }

    /// Where the account icon leads.
    #[must_use]
    pub fn account_route(&self) -> Route {
        if self.ctx.session().is_logged_in() {
            Route::Profile
        } else {
            Route::Login
        }
    }
}
