//! Catalog home screen.

use marquee_domain::{Catalog, Route};
use tokio_util::sync::CancellationToken;

use crate::cancellation::ViewScope;
use crate::views::{CallOutcome, Feedback, ViewContext};

const LOAD_FAILED: &str = "Failed to fetch movies. Please try again.";

/// Home screen: the featured carousel and one row per category.
#[derive(Debug)]
pub struct HomeView {
    ctx: ViewContext,
    scope: ViewScope,
    catalog: Catalog,
}

impl HomeView {
    /// Creates the view with an empty catalog.
    #[must_use]
    pub fn new(ctx: ViewContext) -> Self {
        Self {
            ctx,
            scope: ViewScope::new(),
            catalog: Catalog::new(),
        }
    }

    /// Fetches the catalog, personalised when a credential is stored.
    ///
    /// Returns the login route if the stored credential was rejected.
    pub async fn load(&mut self) -> Option<Route> {
        let outcome = self
            .ctx
            .call_optional_auth(
                &self.scope,
                "catalog_home",
                Feedback::Notify(LOAD_FAILED),
                |api, token| async move { api.catalog_home(token.as_ref()).await },
            )
            .await;

        let route = outcome.route();
        if let CallOutcome::Completed(catalog) = outcome {
            self.catalog = catalog;
        }
        route
    }

    /// Returns the loaded catalog.
    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
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
