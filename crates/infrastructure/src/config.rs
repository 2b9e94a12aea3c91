//! Client configuration.
//!
//! Values come from the environment and may be overridden by the caller
//! (the CLI applies its flags on top):
//! - `MARQUEE_API_URL`: storefront origin, default `http://localhost:8000/`
//! - `MARQUEE_TIMEOUT_SECS`: request timeout, default 30
//! - `MARQUEE_TOKEN_FILE`: credential file, default `<config dir>/marquee/token`

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

/// Environment variable holding the storefront origin.
pub const API_URL_VAR: &str = "MARQUEE_API_URL";
/// Environment variable holding the request timeout in seconds.
pub const TIMEOUT_VAR: &str = "MARQUEE_TIMEOUT_SECS";
/// Environment variable holding the credential file path.
pub const TOKEN_FILE_VAR: &str = "MARQUEE_TOKEN_FILE";

const DEFAULT_API_URL: &str = "http://localhost:8000/";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Error type for configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The API URL could not be parsed.
    #[error("invalid API URL '{value}': {reason}")]
    InvalidUrl {
        /// The rejected value.
        value: String,
        /// Parser message.
        reason: String,
    },

    /// The timeout was not a positive number of seconds.
    #[error("invalid timeout '{0}': expected a positive number of seconds")]
    InvalidTimeout(String),

    /// Could not determine config directory.
    #[error("Could not determine config directory")]
    NoConfigDir,
}

/// Settings for the HTTP adapter and token storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Storefront origin; API paths live under `api/`.
    pub api_url: Url,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Credential file. `None` means the platform default.
    pub token_path: Option<PathBuf>,
    /// User-Agent header sent with every request.
    pub user_agent: String,
}

impl Default for ClientConfig {
    #[allow(clippy::expect_used)]
    fn default() -> Self {
        Self {
            api_url: Url::parse(DEFAULT_API_URL).expect("default API URL is valid"),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            token_path: None,
            user_agent: format!("Marquee/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    /// Returns an error if a variable is set to an unusable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through `lookup`. Unset and blank variables
    /// fall back to defaults.
    ///
    /// # Errors
    /// Returns an error if a variable is set to an unusable value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(url) = read(API_URL_VAR) {
            config = config.with_api_url(&url)?;
        }
        if let Some(secs) = read(TIMEOUT_VAR) {
            config.timeout = parse_timeout(&secs)?;
        }
        if let Some(path) = read(TOKEN_FILE_VAR) {
            config.token_path = Some(PathBuf::from(path.trim()));
        }

        Ok(config)
    }

    /// Replaces the API origin.
    ///
    /// # Errors
    /// Returns an error if `raw` is not an absolute http(s) URL.
    pub fn with_api_url(mut self, raw: &str) -> Result<Self, ConfigError> {
        self.api_url = normalize_base_url(raw)?;
        Ok(self)
    }

    /// Replaces the timeout, given in seconds.
    ///
    /// # Errors
    /// Returns an error for zero.
    pub fn with_timeout_secs(mut self, secs: u64) -> Result<Self, ConfigError> {
        if secs == 0 {
            return Err(ConfigError::InvalidTimeout(secs.to_string()));
        }
        self.timeout = Duration::from_secs(secs);
        Ok(self)
    }

    /// Replaces the credential file location.
    #[must_use]
    pub fn with_token_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.token_path = Some(path.into());
        self
    }

    /// Resolves the credential file, falling back to the platform default.
    ///
    /// # Errors
    /// Returns `NoConfigDir` if no path is set and the platform has no
    /// config directory.
    pub fn resolved_token_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.token_path {
            Some(path) => Ok(path.clone()),
            None => default_token_path().ok_or(ConfigError::NoConfigDir),
        }
    }
}

/// Default credential file: `<config dir>/marquee/token`.
#[must_use]
pub fn default_token_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("marquee").join("token"))
}

/// Parses an origin and makes sure its path ends with `/`, so relative
/// joins keep any path prefix.
///
/// # Errors
/// Returns an error if `raw` does not parse or is not http(s).
pub fn normalize_base_url(raw: &str) -> Result<Url, ConfigError> {
    let raw = raw.trim();
    let mut url = Url::parse(raw).map_err(|e| ConfigError::InvalidUrl {
        value: raw.to_string(),
        reason: e.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl {
            value: raw.to_string(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidTimeout(raw.to_string())),
    }
}
