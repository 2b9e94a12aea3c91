//! Credential token issued by the storefront API.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque bearer credential.
///
/// Any string is accepted as-is; the server is the only judge of validity.
/// `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthToken(String);

impl AuthToken {
    /// Wraps a raw token string.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the raw token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the `Authorization` header value for this token.
    #[must_use]
    pub fn bearer_header(&self) -> String {
        format!("Bearer {}", self.0)
    }

    /// Returns a short preview (first 8 chars + ...) for logs.
    #[must_use]
    pub fn preview(&self) -> String {
        if self.0.chars().count() > 12 {
            let head: String = self.0.chars().take(8).collect();
            format!("{head}...")
        } else {
            "***".to_string()
        }
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AuthToken").field(&self.preview()).finish()
    }
}

impl From<String> for AuthToken {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl From<&str> for AuthToken {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_header() {
        let token = AuthToken::new("abc123");
        assert_eq!(token.bearer_header(), "Bearer abc123");
    }

    #[test]
    fn test_debug_is_redacted() {
        let token = AuthToken::new("abcdefghijklmnopqrstuvwxyz");
        let debug = format!("{token:?}");
        assert!(debug.contains("abcdefgh..."));
        assert!(!debug.contains("xyz"));

        let short = AuthToken::new("abc123");
        assert!(!format!("{short:?}").contains("abc123"));
    }

    #[test]
    fn test_any_string_is_accepted() {
        let token = AuthToken::from("");
        assert_eq!(token.as_str(), "");
        let token = AuthToken::from("not a jwt at all");
        assert_eq!(token.as_str(), "not a jwt at all");
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let token = AuthToken::new("abc123");
        assert_eq!(serde_json::to_string(&token).unwrap(), "\"abc123\"");
    }
}
