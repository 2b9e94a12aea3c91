//! Order history.

use marquee_domain::{Order, Route};
use tokio_util::sync::CancellationToken;

use crate::cancellation::ViewScope;
use crate::views::{CallOutcome, Feedback, ViewContext};

const LOAD_FAILED: &str = "Failed to fetch order history.";

/// Lists the caller's coin orders. Failures are shown inline.
#[derive(Debug)]
pub struct OrderHistoryView {
    ctx: ViewContext,
    scope: ViewScope,
    orders: Vec<Order>,
    error: Option<String>,
}

impl OrderHistoryView {
    /// Creates the view.
    #[must_use]
    pub fn new(ctx: ViewContext) -> Self {
        Self {
            ctx,
            scope: ViewScope::new(),
            orders: Vec::new(),
            error: None,
        }
    }

    /// Fetches the orders.
    pub async fn load(&mut self) -> Option<Route> {
        if !self.ctx.session().is_logged_in() {
            return Some(Route::Login);
        }
        self.error = None;

        let outcome = self
            .ctx
            .call_authenticated(
                &self.scope,
                "order_history",
                Feedback::Silent,
                |api, token| async move { api.order_history(&token).await },
            )
            .await;

        match outcome {
            CallOutcome::Completed(orders) => {
                self.orders = orders;
                None
            }
            CallOutcome::Failed(_) => {
                self.error = Some(LOAD_FAILED.to_string());
                None
            }
            other => other.route(),
        }
    }

    /// Loaded orders, as served.
    #[must_use]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Inline error from the last load.
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
    use crate::test_support::TestHarness;
    use chrono::{TimeZone, Utc};
    use marquee_domain::OrderStatus;
    use pretty_assertions::assert_eq;

    fn order() -> Order {
        Order {
            id: 3,
            plan: "200".to_string(),
            status: OrderStatus::Pending,
            created_at: Utc.with_ymd_and_hms(2025, 1, 5, 9, 30, 0).unwrap(),
            order_details: Some("kbzpay - 14,999 Kyats MMK".to_string()),
        }
    }

    #[tokio::test]
    async fn test_load_lists_orders() {
        let harness = TestHarness::signed_in().await;
        harness.api.set_orders(Ok(vec![order()]));
        let mut view = OrderHistoryView::new(harness.context());

        assert_eq!(view.load().await, None);

        assert_eq!(view.orders(), &[order()]);
        assert_eq!(view.error(), None);
    }

    #[tokio::test]
    async fn test_failure_is_inline_only() {
        let harness = TestHarness::signed_in().await;
        harness.api.set_orders(Err(ApiError::Timeout));
        let mut view = OrderHistoryView::new(harness.context());

        view.load().await;

        assert_eq!(view.error(), Some(LOAD_FAILED));
        assert!(harness.notifier.active().is_empty());
        assert!(!harness.busy.is_busy());
    }

    #[tokio::test]
    async fn test_reload_clears_previous_error() {
        let harness = TestHarness::signed_in().await;
        harness.api.set_orders(Err(ApiError::Timeout));
        let mut view = OrderHistoryView::new(harness.context());
        view.load().await;

        harness.api.set_orders(Ok(Vec::new()));
        view.load().await;

        assert_eq!(view.error(), None);
    }

    #[tokio::test]
    async fn test_signed_out_routes_to_login() {
        let harness = TestHarness::new();
        let mut view = OrderHistoryView::new(harness.context());

        assert_eq!(view.load().await, Some(Route::Login));
        assert_eq!(harness.api.call_count("order_history"), 0);
    }
}
