//! Two-step OTP password reset.

use marquee_domain::{PasswordReset, validate_email};
use tokio_util::sync::CancellationToken;

use crate::cancellation::ViewScope;
use crate::views::{CallOutcome, Feedback, ViewContext};

const OTP_FAILED: &str = "Failed to send OTP. Please check the email address.";
const RESET_FAILED: &str = "Failed to reset password. Please check the OTP code.";
const RESET_OK: &str = "Password reset successfully. You can now log in.";

/// Where the reset flow is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetStep {
    /// Asking for the account email.
    RequestOtp,
    /// OTP sent; asking for the code and a new password.
    ConfirmReset,
    /// Password changed.
    Done,
}

/// Password reset: request an OTP by email, then confirm it with a new
/// password.
#[derive(Debug)]
pub struct ResetPasswordView {
    ctx: ViewContext,
    scope: ViewScope,
    step: ResetStep,
    email: String,
    error: Option<String>,
    success: Option<String>,
}

impl ResetPasswordView {
    /// Creates the view at the first step.
    #[must_use]
    pub fn new(ctx: ViewContext) -> Self {
        Self {
            ctx,
            scope: ViewScope::new(),
            step: ResetStep::RequestOtp,
            email: String::new(),
            error: None,
            success: None,
        }
    }

    /// Emails a one-time code. On success the email is locked for step two.
    pub async fn send_otp(&mut self, email: &str) {
        if self.email_locked() {
            return;
        }
        let email = match validate_email(email) {
            Ok(email) => email,
            Err(err) => {
                self.error = Some(err.to_string());
                return;
            }
        };

        let outcome = self
            .ctx
            .call(
                &self.scope,
                "request_otp",
                Feedback::Silent,
                self.ctx.api().request_otp(&email),
            )
            .await;

        match outcome {
            CallOutcome::Completed(()) => {
                self.error = None;
                self.step = ResetStep::ConfirmReset;
                self.ctx
                    .notifier()
                    .success(format!("OTP code has been sent to {email}"));
                self.email = email;
            }
            CallOutcome::Failed(_) => self.error = Some(OTP_FAILED.to_string()),
            CallOutcome::SignedOut | CallOutcome::Discarded => {}
        }
    }

    /// Sets the new password using the emailed code.
    pub async fn reset(&mut self, otp: &str, password: &str) {
        if self.step != ResetStep::ConfirmReset {
            return;
        }
        let reset = match PasswordReset::new(self.email.clone(), otp, password) {
            Ok(reset) => reset,
            Err(err) => {
                self.error = Some(err.to_string());
                return;
            }
        };

        let outcome = self
            .ctx
            .call(
                &self.scope,
                "reset_password",
                Feedback::Silent,
                self.ctx.api().confirm_password_reset(&reset),
            )
            .await;

        match outcome {
            CallOutcome::Completed(()) => {
                self.error = None;
                self.success = Some(RESET_OK.to_string());
                self.step = ResetStep::Done;
            }
            CallOutcome::Failed(_) => self.error = Some(RESET_FAILED.to_string()),
            CallOutcome::SignedOut | CallOutcome::Discarded => {}
        }
    }

    /// Current step.
    #[must_use]
    pub const fn step(&self) -> ResetStep {
        self.step
    }

    /// True once the OTP was sent; the email can no longer change.
    #[must_use]
    pub fn email_locked(&self) -> bool {
        self.step != ResetStep::RequestOtp
    }

    /// Email the OTP was sent to.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Inline error from the last action.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Success message after the password changed.
    #[must_use]
    pub fn success(&self) -> Option<&str> {
        self.success.as_deref()
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
