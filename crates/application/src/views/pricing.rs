//! Coin price list.

use marquee_domain::{CoinPlan, Route};

/// Lists the coin plans; choosing one goes to checkout.
#[derive(Debug, Clone, Copy, Default)]
pub struct PricingView;

impl PricingView {
    /// Creates the view.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Plans on offer, cheapest first.
    #[must_use]
    pub const fn plans(&self) -> &'static [CoinPlan] {
        &CoinPlan::ALL
    }

    /// Returns the checkout route for a plan.
    #[must_use]
    pub fn choose(&self, plan: &CoinPlan) -> Route {
        Route::Checkout {
            plan: plan.name.to_string(),
            fee: plan.fee.to_string(),
        }
    }
}
