//! Coin plans, payment methods, and the checkout draft.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Plan name used when checkout is opened without one.
pub const UNKNOWN_PLAN: &str = "Unknown Plan";

/// Fee used when checkout is opened without one.
pub const UNKNOWN_FEE: &str = "0 Kyats";

/// A purchasable coin bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoinPlan {
    /// Display name, e.g. "50 Coins".
    pub name: &'static str,
    /// Display fee, e.g. "9,999 Kyats".
    pub fee: &'static str,
    /// Coins credited when the order is confirmed.
    pub coins: u64,
}

impl CoinPlan {
    /// The published price list.
    pub const ALL: [Self; 3] = [
        Self {
            name: "50 Coins",
            fee: "9,999 Kyats",
            coins: 50,
        },
        Self {
            name: "200 Coins",
            fee: "14,999 Kyats",
            coins: 200,
        },
        Self {
            name: "500 Coins",
            fee: "24,999 Kyats",
            coins: 500,
        },
    ];

    /// Feature bullets shown on the pricing card.
    #[must_use]
    pub fn features(&self) -> Vec<String> {
        vec![format!("{} Coins to Watch Premium Movies", self.coins)]
    }

    /// Looks a plan up by display name.
    #[must_use]
    pub fn by_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name == name)
    }
}

/// Mobile wallet the payer transfers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// KBZ Pay.
    #[default]
    KbzPay,
    /// Wave Pay.
    WavePay,
}

impl PaymentMethod {
    /// All methods, in display order.
    pub const ALL: [Self; 2] = [Self::KbzPay, Self::WavePay];

    /// Wire identifier.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::KbzPay => "kbzpay",
            Self::WavePay => "wavepay",
        }
    }

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::KbzPay => "KBZ Pay",
            Self::WavePay => "Wave Pay",
        }
    }

    /// Account details the payer transfers to.
    #[must_use]
    pub const fn account(self) -> &'static str {
        match self {
            Self::KbzPay => "0987654321\nKYAW KO KO TUN",
            Self::WavePay => "0912345678\nKYAW KO KO TUN",
        }
    }

    /// Parses a wire identifier.
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.id() == id)
    }
}

/// Payment proof image attached to an order.
#[derive(Clone, PartialEq, Eq)]
pub struct Screenshot {
    /// Original file name.
    pub file_name: String,
    /// MIME type, e.g. `image/png`.
    pub content_type: String,
    /// Raw file bytes.
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for Screenshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Screenshot")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Checkout form state before submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutDraft {
    /// Plan display name, e.g. "200 Coins".
    pub plan: String,
    /// Fee display string, e.g. "14,999 Kyats".
    pub fee: String,
    /// Selected wallet.
    pub method: PaymentMethod,
    /// Attached payment proof.
    pub screenshot: Option<Screenshot>,
}

impl CheckoutDraft {
    /// Opens a draft from the checkout route parameters.
    #[must_use]
    pub fn new(plan: Option<&str>, fee: Option<&str>) -> Self {
        Self {
            plan: plan.unwrap_or(UNKNOWN_PLAN).to_string(),
            fee: fee.unwrap_or(UNKNOWN_FEE).to_string(),
            method: PaymentMethod::default(),
            screenshot: None,
        }
    }

    /// Plan code sent to the server: the first word of the plan name.
    #[must_use]
    pub fn plan_code(&self) -> &str {
        self.plan.split(' ').next().unwrap_or_default()
    }

    /// Payment note sent with the order.
    #[must_use]
    pub fn order_details(&self) -> String {
        format!("{} - {} MMK", self.method.id(), self.fee)
    }

    /// Validates the draft into a submittable order.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MissingScreenshot` if no proof is attached.
    pub fn to_request(&self) -> DomainResult<PurchaseRequest> {
        let screenshot = self
            .screenshot
            .clone()
            .ok_or(DomainError::MissingScreenshot)?;
        Ok(PurchaseRequest {
            plan: self.plan_code().to_string(),
            order_details: self.order_details(),
            screenshot,
        })
    }
}

/// Multipart order payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseRequest {
    /// Plan code.
    pub plan: String,
    /// Payment note.
    pub order_details: String,
    /// Payment proof.
    pub screenshot: Screenshot,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn screenshot() -> Screenshot {
        Screenshot {
            file_name: "proof.png".to_string(),
            content_type: "image/png".to_string(),
            bytes: vec![1, 2, 3],
        }
    }

    #[test]
    fn test_draft_defaults() {
        let draft = CheckoutDraft::new(None, None);
        assert_eq!(draft.plan, "Unknown Plan");
        assert_eq!(draft.fee, "0 Kyats");
        assert_eq!(draft.method, PaymentMethod::KbzPay);
    }

    #[test]
    fn test_missing_screenshot_blocks_request() {
        let draft = CheckoutDraft::new(Some("50 Coins"), Some("9,999 Kyats"));
        assert_eq!(draft.to_request(), Err(DomainError::MissingScreenshot));
    }

    #[test]
    fn test_request_fields() {
        let mut draft = CheckoutDraft::new(Some("200 Coins"), Some("14,999 Kyats"));
        draft.method = PaymentMethod::WavePay;
        draft.screenshot = Some(screenshot());

        let request = draft.to_request().unwrap();
        assert_eq!(request.plan, "200");
        assert_eq!(request.order_details, "wavepay - 14,999 Kyats MMK");
        assert_eq!(request.screenshot.file_name, "proof.png");
    }

    #[test]
    fn test_plan_lookup() {
        let plan = CoinPlan::by_name("500 Coins").unwrap();
        assert_eq!(plan.fee, "24,999 Kyats");
        assert_eq!(plan.features(), vec!["500 Coins to Watch Premium Movies"]);
        assert!(CoinPlan::by_name("1000 Coins").is_none());
    }

    #[test]
    fn test_payment_method_ids() {
        assert_eq!(PaymentMethod::from_id("wavepay"), Some(PaymentMethod::WavePay));
        assert_eq!(PaymentMethod::from_id("paypal"), None);
        assert!(PaymentMethod::KbzPay.account().contains("0987654321"));
    }
}
