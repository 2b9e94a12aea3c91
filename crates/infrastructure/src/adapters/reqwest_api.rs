//! Storefront API implementation using reqwest.
//!
//! This adapter implements the `StorefrontApi` port against the storefront's
//! REST backend. Every endpoint lives under `{base}/api/`; authenticated
//! calls send the credential as a bearer token.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use marquee_application::ports::{ApiError, ApiResult, StorefrontApi};
use marquee_domain::{
    AuthToken, Catalog, LoginCredentials, MovieDetail, MovieId, Order, PasswordReset,
    PurchaseRequest, Registration, SearchPage, SearchQuery, UserProfile, WatchlistEntry,
};

use crate::config::ClientConfig;

/// Body returned by the token and registration endpoints.
#[derive(Deserialize)]
struct AccessResponse {
    access: AuthToken,
}

/// Storefront client backed by `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestStorefrontApi {
    client: Client,
    api_root: Url,
}

impl ReqwestStorefrontApi {
    /// Creates a client from configuration.
    ///
    /// The configured timeout applies to every request, and the configured
    /// User-Agent is sent with each of them.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn from_config(config: &ClientConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;

        Self::with_client(client, &config.api_url)
    }

    /// Creates a client around an existing `reqwest::Client`.
    ///
    /// # Errors
    ///
    /// Returns an error if `base` cannot carry the `api/` path.
    pub fn with_client(client: Client, base: &Url) -> ApiResult<Self> {
        let mut base = base.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let api_root = base
            .join("api/")
            .map_err(|e| ApiError::InvalidRequest(format!("{e}: {base}")))?;

        Ok(Self { client, api_root })
    }

    /// Root every endpoint path is joined onto.
    #[must_use]
    pub const fn api_root(&self) -> &Url {
        &self.api_root
    }

    fn endpoint(&self, path: &str) -> ApiResult<Url> {
        self.api_root
            .join(path)
            .map_err(|e| ApiError::InvalidRequest(format!("{e}: {path}")))
    }

    /// Sends the request and turns non-success statuses into errors.
    async fn execute(&self, endpoint: &'static str, builder: RequestBuilder) -> ApiResult<Response> {
        debug!(endpoint, "sending storefront request");

        let response = builder.send().await.map_err(Self::map_error)?;
        let status = response.status();
        debug!(endpoint, status = status.as_u16(), "storefront response");

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ApiError::from_status(
            status.as_u16(),
            error_message(status, &body),
        ))
    }

    /// Sends the request and decodes a JSON body.
    async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        builder: RequestBuilder,
    ) -> ApiResult<T> {
        let response = self.execute(endpoint, builder).await?;
        let bytes = response.bytes().await.map_err(Self::map_error)?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(format!("{endpoint}: {e}")))
    }

    /// Sends the request and ignores whatever body comes back.
    async fn acknowledge(&self, endpoint: &'static str, builder: RequestBuilder) -> ApiResult<()> {
        self.execute(endpoint, builder).await.map(drop)
    }

    /// Maps reqwest errors to `ApiError`.
    fn map_error(error: reqwest::Error) -> ApiError {
        if error.is_timeout() {
            return ApiError::Timeout;
        }

        if error.is_builder() {
            return ApiError::InvalidRequest(error.to_string());
        }

        if error.is_decode() {
            return ApiError::Decode(error.to_string());
        }

        if error.is_connect() {
            let host = error
                .url()
                .and_then(Url::host_str)
                .unwrap_or("unknown")
                .to_string();
            return ApiError::Network(format!("could not connect to {host}: {error}"));
        }

        ApiError::Network(error.to_string())
    }

    fn screenshot_part(order: &PurchaseRequest) -> ApiResult<Part> {
        let screenshot = &order.screenshot;
        Part::bytes(screenshot.bytes.clone())
            .file_name(screenshot.file_name.clone())
            .mime_str(&screenshot.content_type)
            .map_err(|e| ApiError::InvalidRequest(format!("screenshot: {e}")))
    }
}

/// Picks a readable message out of an error response.
///
/// The backend reports most failures as `{"detail": "..."}`; anything else
/// falls back to the raw body, then to the reason phrase.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(serde_json::Value::Object(fields)) = serde_json::from_str(body)
        && let Some(serde_json::Value::String(detail)) = fields.get("detail")
    {
        return detail.clone();
    }

    let body = body.trim();
    if body.is_empty() {
        status.canonical_reason().unwrap_or("unknown error").to_string()
    } else {
        body.to_string()
    }
}

#[async_trait]
impl StorefrontApi for ReqwestStorefrontApi {
    async fn obtain_token(&self, credentials: &LoginCredentials) -> ApiResult<AuthToken> {
        let url = self.endpoint("auth/token/obtain/")?;
        let response: AccessResponse = self
            .fetch("obtain_token", self.client.post(url).json(credentials))
            .await?;
        Ok(response.access)
    }

    async fn register(&self, registration: &Registration) -> ApiResult<AuthToken> {
        let url = self.endpoint("auth/register/")?;
        let response: AccessResponse = self
            .fetch("register", self.client.post(url).json(registration))
            .await?;
        Ok(response.access)
    }

    async fn verify_identity(&self, token: &AuthToken) -> ApiResult<UserProfile> {
        let url = self.endpoint("auth/token/verify")?;
        self.fetch("verify", self.client.get(url).bearer_auth(token.as_str()))
            .await
    }

    async fn request_otp(&self, email: &str) -> ApiResult<()> {
        let url = self.endpoint("auth/request-otp/")?;
        let body = serde_json::json!({ "email": email });
        self.acknowledge("request_otp", self.client.post(url).json(&body))
            .await
    }

    async fn confirm_password_reset(&self, reset: &PasswordReset) -> ApiResult<()> {
        let url = self.endpoint("auth/reset-password/")?;
        self.acknowledge("reset_password", self.client.post(url).json(reset))
            .await
    }

    async fn catalog_home(&self, token: Option<&AuthToken>) -> ApiResult<Catalog> {
        let url = self.endpoint("movies/home/")?;
        let mut builder = self.client.get(url);
        if let Some(token) = token {
            builder = builder.bearer_auth(token.as_str());
        }
        self.fetch("catalog_home", builder).await
    }

    async fn search(&self, query: &SearchQuery) -> ApiResult<SearchPage> {
        let mut url = self.endpoint("movies/search/")?;
        let encoded = serde_urlencoded::to_string(query)
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        url.set_query(Some(&encoded));
        self.fetch("search", self.client.get(url)).await
    }

    async fn movie_detail(&self, token: &AuthToken, movie_id: MovieId) -> ApiResult<MovieDetail> {
        let url = self.endpoint(&format!("movies/{movie_id}/"))?;
        self.fetch("movie", self.client.get(url).bearer_auth(token.as_str()))
            .await
    }

    async fn watchlist(&self, token: &AuthToken) -> ApiResult<Vec<WatchlistEntry>> {
        let url = self.endpoint("movies/watchlist/")?;
        self.fetch("watchlist", self.client.get(url).bearer_auth(token.as_str()))
            .await
    }

    async fn add_to_watchlist(&self, token: &AuthToken, movie_id: MovieId) -> ApiResult<()> {
        let url = self.endpoint("movies/watchlist/")?;
        let body = serde_json::json!({ "movie_id": movie_id });
        self.acknowledge(
            "watchlist_add",
            self.client.post(url).bearer_auth(token.as_str()).json(&body),
        )
        .await
    }

    async fn remove_from_watchlist(&self, token: &AuthToken, movie_id: MovieId) -> ApiResult<()> {
        let url = self.endpoint(&format!("movies/watchlist/remove/{movie_id}/"))?;
        self.acknowledge(
            "watchlist_remove",
            self.client.delete(url).bearer_auth(token.as_str()),
        )
        .await
    }

    async fn create_order(&self, token: &AuthToken, order: &PurchaseRequest) -> ApiResult<()> {
        let url = self.endpoint("orders/create/")?;
        let form = Form::new()
            .text("plan", order.plan.clone())
            .text("order_details", order.order_details.clone())
            .part("screenshot", Self::screenshot_part(order)?);

        self.acknowledge(
            "create_order",
            self.client
                .post(url)
                .bearer_auth(token.as_str())
                .multipart(form),
        )
        .await
    }

    async fn order_history(&self, token: &AuthToken) -> ApiResult<Vec<Order>> {
        let url = self.endpoint("orders/history/")?;
        self.fetch(
            "order_history",
            self.client.get(url).bearer_auth(token.as_str()),
        )
        .await
    }

    async fn update_profile(&self, token: &AuthToken, username: &str) -> ApiResult<()> {
        let url = self.endpoint("profile/update/")?;
        let body = serde_json::json!({ "username": username });
        self.acknowledge(
            "update_profile",
            self.client.put(url).bearer_auth(token.as_str()).json(&body),
        )
        .await
    }
}
