//! Scripted storefront for tests.
//!
//! `MockStorefront` answers every endpoint from a scripted response, records
//! each call with the credential it carried, and can hold a call at a named
//! gate so tests can resolve concurrent calls in any order.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Notify;

use marquee_domain::{
    AuthToken, Catalog, LoginCredentials, MovieDetail, MovieId, MovieSummary, Order,
    PasswordReset, PurchaseRequest, Registration, SearchPage, SearchQuery, UserProfile,
    WatchlistEntry,
};

use crate::auth::{SessionManager, TokenStore};
use crate::busy::BusySignal;
use crate::notifier::Notifier;
use crate::ports::{ApiError, ApiResult, StorefrontApi};
use crate::views::ViewContext;

/// One call seen by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// Endpoint name, e.g. `"verify"` or `"search"`.
    pub endpoint: &'static str,
    /// Bearer credential sent with the call.
    pub token: Option<String>,
    /// Endpoint-specific argument summary.
    pub detail: String,
}

/// Releases calls waiting at a gate.
#[derive(Debug, Clone)]
pub struct Gate(Arc<Notify>);

impl Gate {
    /// Lets the waiting call (or the next one to arrive) through.
    pub fn open(&self) {
        self.0.notify_one();
    }
}

#[derive(Default)]
struct Script {
    login: Option<ApiResult<AuthToken>>,
    register: Option<ApiResult<AuthToken>>,
    profile: Option<ApiResult<UserProfile>>,
    catalog: Option<ApiResult<Catalog>>,
    search: HashMap<u32, ApiResult<SearchPage>>,
    movie: Option<ApiResult<MovieDetail>>,
    watchlist: Option<ApiResult<Vec<WatchlistEntry>>>,
    orders: Option<ApiResult<Vec<Order>>>,
    acks: HashMap<&'static str, ApiResult<()>>,
}

/// In-memory `StorefrontApi` with scripted responses.
///
/// Unscripted data endpoints fail with HTTP 404; unscripted
/// acknowledgements succeed.
#[derive(Default)]
pub struct MockStorefront {
    script: Mutex<Script>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    calls: Mutex<Vec<RecordedCall>>,
    orders_sent: Mutex<Vec<PurchaseRequest>>,
}

fn unscripted<T>(endpoint: &str) -> ApiResult<T> {
    Err(ApiError::Status {
        status: 404,
        message: format!("{endpoint} not scripted"),
    })
}

impl MockStorefront {
    /// Creates a mock with nothing scripted.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the login response.
    pub fn set_login(&self, result: ApiResult<AuthToken>) {
        self.script.lock().login = Some(result);
    }

    /// Scripts the registration response.
    pub fn set_register(&self, result: ApiResult<AuthToken>) {
        self.script.lock().register = Some(result);
    }

    /// Scripts the verify/identity response.
    pub fn set_profile(&self, result: ApiResult<UserProfile>) {
        self.script.lock().profile = Some(result);
    }

    /// Scripts the home catalog response.
    pub fn set_catalog(&self, result: ApiResult<Catalog>) {
        self.script.lock().catalog = Some(result);
    }

    /// Scripts the response for one search page.
    pub fn set_search(&self, page: u32, result: ApiResult<SearchPage>) {
        self.script.lock().search.insert(page, result);
    }

    /// Scripts the movie detail response.
    pub fn set_movie(&self, result: ApiResult<MovieDetail>) {
        self.script.lock().movie = Some(result);
    }

    /// Scripts the watchlist response.
    pub fn set_watchlist(&self, result: ApiResult<Vec<WatchlistEntry>>) {
        self.script.lock().watchlist = Some(result);
    }

    /// Scripts the order history response.
    pub fn set_orders(&self, result: ApiResult<Vec<Order>>) {
        self.script.lock().orders = Some(result);
    }

    /// Scripts an acknowledgement-only endpoint such as `"watchlist_add"`.
    pub fn set_ack(&self, endpoint: &'static str, result: ApiResult<()>) {
        self.script.lock().acks.insert(endpoint, result);
    }

    /// Makes the next call with this key wait until the gate opens.
    ///
    /// Keys are endpoint names; search calls also check `"search:{page}"`.
    pub fn gate(&self, key: impl Into<String>) -> Gate {
        let notify = Arc::new(Notify::new());
        self.gates.lock().insert(key.into(), Arc::clone(&notify));
        Gate(notify)
    }

    /// Returns every recorded call, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    /// Counts calls to one endpoint.
    #[must_use]
    pub fn call_count(&self, endpoint: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.endpoint == endpoint)
            .count()
    }

    /// Returns the credentials sent to one endpoint.
    #[must_use]
    pub fn bearer_tokens(&self, endpoint: &str) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.endpoint == endpoint)
            .filter_map(|c| c.token.clone())
            .collect()
    }

    /// Returns the argument summaries sent to one endpoint.
    #[must_use]
    pub fn details(&self, endpoint: &str) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.endpoint == endpoint)
            .map(|c| c.detail.clone())
            .collect()
    }

    /// Returns the purchase requests received.
    #[must_use]
    pub fn orders_sent(&self) -> Vec<PurchaseRequest> {
        self.orders_sent.lock().clone()
    }

    fn record(&self, endpoint: &'static str, token: Option<&AuthToken>, detail: String) {
        self.calls.lock().push(RecordedCall {
            endpoint,
            token: token.map(|t| t.as_str().to_string()),
            detail,
        });
    }

    async fn pass_gate(&self, key: &str) {
        let gate = self.gates.lock().remove(key);
        if let Some(gate) = gate {
            gate.notified().await;
        }
    }

    fn ack(&self, endpoint: &'static str) -> ApiResult<()> {
        self.script
            .lock()
            .acks
            .get(endpoint)
            .cloned()
            .unwrap_or(Ok(()))
    }
}

#[async_trait]
impl StorefrontApi for MockStorefront {
    async fn obtain_token(&self, credentials: &LoginCredentials) -> ApiResult<AuthToken> {
        self.record("obtain_token", None, credentials.email.clone());
        self.pass_gate("obtain_token").await;
        let scripted = self.script.lock().login.clone();
        scripted.unwrap_or_else(|| unscripted("obtain_token"))
    }

    async fn register(&self, registration: &Registration) -> ApiResult<AuthToken> {
        self.record("register", None, registration.username.clone());
        self.pass_gate("register").await;
        let scripted = self.script.lock().register.clone();
        scripted.unwrap_or_else(|| unscripted("register"))
    }

    async fn verify_identity(&self, token: &AuthToken) -> ApiResult<UserProfile> {
        self.record("verify", Some(token), String::new());
        self.pass_gate("verify").await;
        let scripted = self.script.lock().profile.clone();
        scripted.unwrap_or_else(|| unscripted("verify"))
    }

    async fn request_otp(&self, email: &str) -> ApiResult<()> {
        self.record("request_otp", None, email.to_string());
        self.pass_gate("request_otp").await;
        self.ack("request_otp")
    }

    async fn confirm_password_reset(&self, reset: &PasswordReset) -> ApiResult<()> {
        self.record("reset_password", None, format!("{}:{}", reset.email, reset.otp));
        self.pass_gate("reset_password").await;
        self.ack("reset_password")
    }

    async fn catalog_home(&self, token: Option<&AuthToken>) -> ApiResult<Catalog> {
        self.record("catalog_home", token, String::new());
        self.pass_gate("catalog_home").await;
        let scripted = self.script.lock().catalog.clone();
        scripted.unwrap_or_else(|| unscripted("catalog_home"))
    }

    async fn search(&self, query: &SearchQuery) -> ApiResult<SearchPage> {
        self.record("search", None, format!("{}:{}", query.search, query.page));
        self.pass_gate("search").await;
        self.pass_gate(&format!("search:{}", query.page)).await;
        let scripted = self.script.lock().search.get(&query.page).cloned();
        scripted.unwrap_or_else(|| unscripted("search"))
    }

    async fn movie_detail(&self, token: &AuthToken, movie_id: MovieId) -> ApiResult<MovieDetail> {
        self.record("movie", Some(token), movie_id.to_string());
        self.pass_gate("movie").await;
        let scripted = self.script.lock().movie.clone();
        scripted.unwrap_or_else(|| unscripted("movie"))
    }

    async fn watchlist(&self, token: &AuthToken) -> ApiResult<Vec<WatchlistEntry>> {
        self.record("watchlist", Some(token), String::new());
        self.pass_gate("watchlist").await;
        let scripted = self.script.lock().watchlist.clone();
        scripted.unwrap_or_else(|| unscripted("watchlist"))
    }

    async fn add_to_watchlist(&self, token: &AuthToken, movie_id: MovieId) -> ApiResult<()> {
        self.record("watchlist_add", Some(token), movie_id.to_string());
        self.pass_gate("watchlist_add").await;
        self.ack("watchlist_add")
    }

    async fn remove_from_watchlist(&self, token: &AuthToken, movie_id: MovieId) -> ApiResult<()> {
        self.record("watchlist_remove", Some(token), movie_id.to_string());
        self.pass_gate("watchlist_remove").await;
        self.ack("watchlist_remove")
    }

    async fn create_order(&self, token: &AuthToken, order: &PurchaseRequest) -> ApiResult<()> {
        self.record("create_order", Some(token), order.order_details.clone());
        self.orders_sent.lock().push(order.clone());
        self.pass_gate("create_order").await;
        self.ack("create_order")
    }

    async fn order_history(&self, token: &AuthToken) -> ApiResult<Vec<Order>> {
        self.record("order_history", Some(token), String::new());
        self.pass_gate("order_history").await;
        let scripted = self.script.lock().orders.clone();
        scripted.unwrap_or_else(|| unscripted("order_history"))
    }

    async fn update_profile(&self, token: &AuthToken, username: &str) -> ApiResult<()> {
        self.record("update_profile", Some(token), username.to_string());
        self.pass_gate("update_profile").await;
        self.ack("update_profile")
    }
}

/// A profile with 100 coins.
#[must_use]
pub fn sample_profile() -> UserProfile {
    UserProfile {
        id: 7,
        username: "thura".to_string(),
        email: "thura@example.com".to_string(),
        coins: 100,
    }
}

/// A card-level movie.
#[must_use]
pub fn sample_movie(id: MovieId, title: &str, coins: u64) -> MovieSummary {
    MovieSummary {
        id,
        title: title.to_string(),
        year: Some(2021),
        genre: "Sci-Fi".to_string(),
        thumbnail: format!("/media/{id}.jpg"),
        coins,
        is_watchlisted: false,
    }
}

/// A movie page with one recommendation.
#[must_use]
pub fn sample_detail(id: MovieId, title: &str) -> MovieDetail {
    MovieDetail {
        summary: sample_movie(id, title, 0),
        director: Some("Denis Villeneuve".to_string()),
        description: Some("Spice must flow.".to_string()),
        embedded: Some("<iframe src=\"player\"></iframe>".to_string()),
        recommended_movies: vec![sample_movie(id + 1, "Arrival", 20)],
    }
}

/// Wires a mock API to a fresh session, busy signal, and notifier.
pub struct TestHarness {
    /// Scripted API.
    pub api: Arc<MockStorefront>,
    /// Token store shared with the session.
    pub tokens: TokenStore,
    /// Session under test.
    pub session: Arc<SessionManager>,
    /// Shared busy signal.
    pub busy: BusySignal,
    /// Shared notifier.
    pub notifier: Notifier,
}

impl TestHarness {
    /// Credential used by [`Self::signed_in`].
    pub const TOKEN: &'static str = "abc123";

    /// Creates a logged-out harness.
    #[must_use]
    pub fn new() -> Self {
        let api = Arc::new(MockStorefront::new());
        let tokens = TokenStore::in_memory();
        let session = Arc::new(SessionManager::new(tokens.clone(), api.clone()));
        Self {
            api,
            tokens,
            session,
            busy: BusySignal::new(),
            notifier: Notifier::new(),
        }
    }

    /// Creates a harness logged in as [`sample_profile`].
    pub async fn signed_in() -> Self {
        let harness = Self::new();
        harness.api.set_profile(Ok(sample_profile()));
        harness.session.login(AuthToken::new(Self::TOKEN)).await;
        harness
    }

    /// Returns a view context over this harness.
    #[must_use]
    pub fn context(&self) -> ViewContext {
        ViewContext::new(
            self.api.clone(),
            Arc::clone(&self.session),
            self.busy.clone(),
            self.notifier.clone(),
        )
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
