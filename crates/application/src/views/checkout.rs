//! Checkout for a coin plan.

use marquee_domain::{CheckoutDraft, PaymentMethod, Route, Screenshot};
use tokio_util::sync::CancellationToken;

use crate::cancellation::ViewScope;
use crate::views::{CallOutcome, Feedback, ViewContext};

const PAYMENT_FAILED: &str = "Failed to process payment. Please try again.";
const PAYMENT_OK: &str = "Payment successful!";

/// Checkout screen: pick a payment method, attach proof, submit the order.
#[derive(Debug)]
pub struct CheckoutView {
    ctx: ViewContext,
    scope: ViewScope,
    draft: CheckoutDraft,
}

impl CheckoutView {
    /// Creates the view for the plan and fee carried by the route.
    ///
    /// Missing values fall back to "Unknown Plan" and "0 Kyats".
    #[must_use]
    pub fn new(ctx: ViewContext, plan: Option<&str>, fee: Option<&str>) -> Self {
        Self {
            ctx,
            scope: ViewScope::new(),
            draft: CheckoutDraft::new(plan, fee),
        }
    }

    /// Creates the view from a checkout route; other routes use the
    /// defaults.
    #[must_use]
    pub fn open(ctx: ViewContext, route: &Route) -> Self {
        match route {
            Route::Checkout { plan, fee } => {
                Self::new(ctx, Some(plan.as_str()), Some(fee.as_str()))
            }
            _ => Self::new(ctx, None, None),
        }
    }

    /// Returns the login route if there is no session.
    #[must_use]
    pub fn mount(&self) -> Option<Route> {
        (!self.ctx.session().is_logged_in()).then_some(Route::Login)
    }

    /// Selects how the user paid.
    pub const fn select_method(&mut self, method: PaymentMethod) {
        self.draft.method = method;
    }

    /// Attaches the payment screenshot, replacing any earlier one.
    pub fn attach_screenshot(&mut self, screenshot: Screenshot) {
        self.draft.screenshot = Some(screenshot);
    }

    /// Submits the order.
    ///
    /// Without a screenshot nothing is sent. On success routes to order
    /// history.
    pub async fn submit(&mut self) -> Option<Route> {
        let request = match self.draft.to_request() {
            Ok(request) => request,
            Err(err) => {
                self.ctx.notifier().error(err.to_string());
                return None;
            }
        };

        let outcome = self
            .ctx
            .call_authenticated(
                &self.scope,
                "create_order",
                Feedback::Notify(PAYMENT_FAILED),
                |api, token| async move { api.create_order(&token, &request).await },
            )
            .await;

        match outcome {
            CallOutcome::Completed(()) => {
                self.ctx.notifier().success(PAYMENT_OK);
                Some(Route::OrderHistory)
            }
            other => other.route(),
        }
    }

    /// Current draft.
    #[must_use]
    pub const fn draft(&self) -> &CheckoutDraft {
        &self.draft
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
