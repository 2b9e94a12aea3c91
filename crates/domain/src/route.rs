//! Navigation targets a view can hand back to its host.

use std::fmt;
use std::str::FromStr;

use url::form_urlencoded;

use crate::error::{DomainError, DomainResult};
use crate::movie::MovieId;

/// A screen the host should navigate to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Catalog home.
    Home,
    /// Search results for a term.
    Search {
        /// Search term.
        key: String,
    },
    /// Movie detail page.
    Movie {
        /// Movie identifier.
        id: MovieId,
    },
    /// Account page.
    Profile,
    /// Coin price list.
    Pricing,
    /// Checkout for a chosen plan.
    Checkout {
        /// Plan display name.
        plan: String,
        /// Fee display string.
        fee: String,
    },
    /// Order history.
    OrderHistory,
    /// Login form.
    Login,
    /// Registration form.
    SignUp,
    /// OTP password reset.
    ResetPassword,
}

impl Route {
    /// Returns the path (with query string) for this route.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Search { key } => format!("/search?{}", encode(&[("key", key)])),
            Self::Movie { id } => format!("/movie/{id}"),
            Self::Profile => "/profile".to_string(),
            Self::Pricing => "/pricing".to_string(),
            Self::Checkout { plan, fee } => {
                format!("/checkout?{}", encode(&[("plan", plan), ("fee", fee)]))
            }
            Self::OrderHistory => "/order-history".to_string(),
            Self::Login => "/login".to_string(),
            Self::SignUp => "/signup".to_string(),
            Self::ResetPassword => "/reset-password".to_string(),
        }
    }

    /// Returns true for screens that need a signed-in session.
    #[must_use]
    pub const fn requires_session(&self) -> bool {
        matches!(
            self,
            Self::Movie { .. } | Self::Profile | Self::Checkout { .. } | Self::OrderHistory
        )
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

impl FromStr for Route {
    type Err = DomainError;

    /// Parses a path produced by [`Route::path`].
    fn from_str(raw: &str) -> DomainResult<Self> {
        let (path, query) = raw.split_once('?').unwrap_or((raw, ""));
        let param = |name: &str| {
            form_urlencoded::parse(query.as_bytes())
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.into_owned())
        };
        let invalid = || DomainError::InvalidRoute(raw.to_string());

        let route = match path.trim_end_matches('/') {
            "" => Self::Home,
            "/search" => Self::Search {
                key: param("key").unwrap_or_default(),
            },
            "/profile" => Self::Profile,
            "/pricing" => Self::Pricing,
            "/checkout" => Self::Checkout {
                plan: param("plan").unwrap_or_else(|| crate::pricing::UNKNOWN_PLAN.to_string()),
                fee: param("fee").unwrap_or_else(|| crate::pricing::UNKNOWN_FEE.to_string()),
            },
            "/order-history" => Self::OrderHistory,
            "/login" => Self::Login,
            "/signup" => Self::SignUp,
            "/reset-password" => Self::ResetPassword,
            other => {
                let id = other.strip_prefix("/movie/").ok_or_else(invalid)?;
                Self::Movie {
                    id: id.parse().map_err(|_| invalid())?,
                }
            }
        };
        Ok(route)
    }
}

fn encode(pairs: &[(&str, &String)]) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (name, value) in pairs {
        serializer.append_pair(name, value);
    }
    serializer.finish()
}
