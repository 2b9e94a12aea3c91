//! Account forms and their client-side validation.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::{DomainError, DomainResult};

static EMAIL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

fn require(field: &'static str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::MissingField(field));
    }
    Ok(())
}

fn require_email(email: &str) -> DomainResult<()> {
    require("email", email)?;
    let valid = EMAIL.as_ref().is_some_and(|re| re.is_match(email.trim()));
    if valid {
        Ok(())
    } else {
        Err(DomainError::InvalidEmail(email.to_string()))
    }
}

/// Login form body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginCredentials {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

impl LoginCredentials {
    /// Builds and validates login credentials.
    ///
    /// # Errors
    ///
    /// Returns a `DomainError` if a field is empty or the email is malformed.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> DomainResult<Self> {
        let credentials = Self {
            email: email.into().trim().to_string(),
            password: password.into(),
        };
        require_email(&credentials.email)?;
        require("password", &credentials.password)?;
        Ok(credentials)
    }
}

/// Registration form body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    /// Account email.
    pub email: String,
    /// Display name.
    pub username: String,
    /// Account password.
    pub password: String,
}

impl Registration {
    /// Builds and validates a registration.
    ///
    /// # Errors
    ///
    /// Returns a `DomainError` if a field is empty or the email is malformed.
    pub fn new(
        email: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> DomainResult<Self> {
        let registration = Self {
            email: email.into().trim().to_string(),
            username: username.into().trim().to_string(),
            password: password.into(),
        };
        require_email(&registration.email)?;
        require("username", &registration.username)?;
        require("password", &registration.password)?;
        Ok(registration)
    }
}

/// Second step of the OTP password reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PasswordReset {
    /// Account email the OTP was sent to.
    pub email: String,
    /// One-time code from the email.
    pub otp: String,
    /// New password.
    pub password: String,
}

impl PasswordReset {
    /// Builds and validates a reset confirmation.
    ///
    /// # Errors
    ///
    /// Returns a `DomainError` if a field is empty or the email is malformed.
    pub fn new(
        email: impl Into<String>,
        otp: impl Into<String>,
        password: impl Into<String>,
    ) -> DomainResult<Self> {
        let reset = Self {
            email: email.into().trim().to_string(),
            otp: otp.into().trim().to_string(),
            password: password.into(),
        };
        require_email(&reset.email)?;
        require("otp", &reset.otp)?;
        require("password", &reset.password)?;
        Ok(reset)
    }
}

/// Validates a standalone email field (OTP request).
///
/// # Errors
///
/// Returns a `DomainError` if the email is empty or malformed.
pub fn validate_email(email: &str) -> DomainResult<String> {
    require_email(email)?;
    Ok(email.trim().to_string())
}
