//! Paginated search results.

use marquee_domain::{DomainError, DomainResult, MovieSummary, SearchQuery};
use tokio_util::sync::CancellationToken;

use crate::cancellation::ViewScope;
use crate::views::{CallOutcome, Feedback, ViewContext};

const LOAD_FAILED: &str = "Failed to fetch search results. Please try again.";

/// Search results for one term.
///
/// Each instance only ever writes the page it requested, so two views
/// searching concurrently cannot overwrite each other.
#[derive(Debug)]
pub struct SearchView {
    ctx: ViewContext,
    scope: ViewScope,
    key: String,
    page: u32,
    total_pages: u32,
    results: Vec<MovieSummary>,
}

impl SearchView {
    /// Creates a view on page 1 of `key`.
    #[must_use]
    pub fn new(ctx: ViewContext, key: impl Into<String>) -> Self {
        Self::with_page(ctx, key, 1)
    }

    /// Creates a view starting on `page` (at least 1).
    #[must_use]
    pub fn with_page(ctx: ViewContext, key: impl Into<String>, page: u32) -> Self {
        Self {
            ctx,
            scope: ViewScope::new(),
            key: key.into(),
            page: page.max(1),
            total_pages: 1,
            results: Vec::new(),
        }
    }

    /// Fetches the current page. An empty term makes no call.
    pub async fn load(&mut self) {
        if self.key.trim().is_empty() {
            return;
        }
        let query = SearchQuery::new(self.key.clone(), self.page);
        let outcome = self
            .ctx
            .call(
                &self.scope,
                "search",
                Feedback::Notify(LOAD_FAILED),
                self.ctx.api().search(&query),
            )
            .await;

        if let CallOutcome::Completed(page) = outcome {
            self.total_pages = page.total_pages();
            self.results = page.results;
        }
    }

    /// Moves to `page` and fetches it.
    ///
    /// # Errors
    /// Returns `PageOutOfRange` without a call if `page` is outside
    /// `1..=total_pages`.
    pub async fn go_to(&mut self, page: u32) -> DomainResult<()> {
        if page < 1 || page > self.total_pages {
            return Err(DomainError::PageOutOfRange {
                page,
                total: self.total_pages,
            });
        }
        self.page = page;
        self.load().await;
        Ok(())
    }

    /// Moves forward one page. Returns false on the last page.
    pub async fn next_page(&mut self) -> bool {
        self.go_to(self.page.saturating_add(1)).await.is_ok()
    }

    /// Moves back one page. Returns false on the first page.
    pub async fn previous_page(&mut self) -> bool {
        self.go_to(self.page.saturating_sub(1)).await.is_ok()
    }

    /// Search term.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Current page, one-based.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Total pages for the term, at least 1.
    #[must_use]
    pub const fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Hits on the current page.
    #[must_use]
    pub fn results(&self) -> &[MovieSummary] {
        &self.results
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
    use crate::test_support::{TestHarness, sample_movie};
    use marquee_domain::SearchPage;
    use pretty_assertions::assert_eq;

    fn page(count: u64, titles: &[&str]) -> SearchPage {
        SearchPage {
            count,
            results: titles
                .iter()
                .zip(1..)
                .map(|(title, id)| sample_movie(id, title, 0))
                .collect(),
        }
    }

    fn titles(view: &SearchView) -> Vec<&str> {
        view.results().iter().map(|m| m.title.as_str()).collect()
    }

    #[tokio::test]
    async fn test_empty_key_makes_no_call() {
        let harness = TestHarness::new();
        let mut view = SearchView::new(harness.context(), "   ");

        view.load().await;

        assert_eq!(harness.api.call_count("search"), 0);
        assert!(view.results().is_empty());
    }

    #[tokio::test]
    async fn test_load_sets_results_and_pages() {
        let harness = TestHarness::new();
        harness.api.set_search(1, Ok(page(45, &["Dune", "Dune: Part Two"])));
        let mut view = SearchView::new(harness.context(), "dune");

        view.load().await;

        assert_eq!(titles(&view), vec!["Dune", "Dune: Part Two"]);
        assert_eq!(view.total_pages(), 3);
        assert_eq!(harness.api.details("search"), vec!["dune:1"]);
    }

    #[tokio::test]
    async fn test_zero_hits_still_has_one_page() {
        let harness = TestHarness::new();
        harness.api.set_search(1, Ok(page(0, &[])));
        let mut view = SearchView::new(harness.context(), "nothing");

        view.load().await;

        assert_eq!(view.total_pages(), 1);
        assert!(!view.next_page().await);
        assert!(!view.previous_page().await);
        assert_eq!(harness.api.call_count("search"), 1);
    }

    #[tokio::test]
    async fn test_paging_is_bounded() {
        let harness = TestHarness::new();
        harness.api.set_search(1, Ok(page(25, &["One"])));
        harness.api.set_search(2, Ok(page(25, &["Two"])));
        let mut view = SearchView::new(harness.context(), "dune");
        view.load().await;

        assert!(view.next_page().await);
        assert_eq!(view.page(), 2);
        assert_eq!(titles(&view), vec!["Two"]);

        assert!(!view.next_page().await);
        assert_eq!(
            view.go_to(9).await,
            Err(DomainError::PageOutOfRange { page: 9, total: 2 })
        );

        assert!(view.previous_page().await);
        assert_eq!(titles(&view), vec!["One"]);
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_results() {
        let harness = TestHarness::new();
        harness.api.set_search(1, Ok(page(25, &["One"])));
        harness.api.set_search(2, Err(ApiError::Timeout));
        let mut view = SearchView::new(harness.context(), "dune");
        view.load().await;

        assert!(view.next_page().await);

        assert_eq!(titles(&view), vec!["One"]);
        assert_eq!(harness.notifier.messages(), vec![LOAD_FAILED]);
        assert!(!harness.busy.is_busy());
    }

    #[tokio::test]
    async fn test_concurrent_pages_resolve_out_of_order() {
        let harness = TestHarness::new();
        harness.api.set_search(1, Ok(page(40, &["Page one"])));
        harness.api.set_search(2, Ok(page(40, &["Page two"])));
        let first_gate = harness.api.gate("search:1");
        let second_gate = harness.api.gate("search:2");
        let mut first = SearchView::with_page(harness.context(), "dune", 1);
        let mut second = SearchView::with_page(harness.context(), "dune", 2);

        tokio::join!(first.load(), second.load(), async {
            second_gate.open();
            tokio::task::yield_now().await;
            first_gate.open();
        });

        assert_eq!(titles(&first), vec!["Page one"]);
        assert_eq!(titles(&second), vec!["Page two"]);
        assert!(!harness.busy.is_busy());
    }
}
