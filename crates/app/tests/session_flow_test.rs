//! End-to-end flows: view controllers over the HTTP adapter and the
//! credential file, against a mock storefront.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::path::Path;
use std::sync::Arc;

use marquee_application::views::{
    CheckoutView, LoginView, MovieView, OrderHistoryView, PricingView, ProfileView,
};
use marquee_application::{
    BusySignal, Notifier, RefreshOutcome, SessionManager, StorefrontApi, TokenStore, ViewContext,
};
use marquee_domain::{CoinPlan, PaymentMethod, Route};
use marquee_infrastructure::{
    ClientConfig, FileTokenPersistence, ReqwestStorefrontApi, load_screenshot,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Client {
    ctx: ViewContext,
    session: Arc<SessionManager>,
    notifier: Notifier,
}

fn connect(server: &MockServer, token_path: &Path) -> Client {
    let config = ClientConfig::default()
        .with_api_url(&server.uri())
        .unwrap()
        .with_token_path(token_path);
    let api: Arc<dyn StorefrontApi> =
        Arc::new(ReqwestStorefrontApi::from_config(&config).unwrap());
    let persistence = FileTokenPersistence::new(config.resolved_token_path().unwrap());
    let tokens = TokenStore::open(Arc::new(persistence));
    let session = Arc::new(SessionManager::new(tokens, Arc::clone(&api)));
    let notifier = Notifier::new();
    let ctx = ViewContext::new(
        api,
        Arc::clone(&session),
        BusySignal::new(),
        notifier.clone(),
    );

    Client {
        ctx,
        session,
        notifier,
    }
}

fn profile_body(coins: u64) -> serde_json::Value {
    json!({"id": 7, "username": "thura", "email": "thura@example.com", "coins": coins})
}

async fn mount_verify(server: &MockServer, token: &str, status: u16) {
    let response = if status == 200 {
        ResponseTemplate::new(200).set_body_json(profile_body(100))
    } else {
        ResponseTemplate::new(status).set_body_json(json!({"detail": "Token is invalid or expired"}))
    };
    Mock::given(method("GET"))
        .and(path("/api/auth/token/verify"))
        .and(header("authorization", format!("Bearer {token}").as_str()))
        .respond_with(response)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_login_persists_and_survives_restart() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let token_path = dir.path().join("marquee").join("token");
    Mock::given(method("POST"))
        .and(path("/api/auth/token/obtain/"))
        .and(body_json(json!({"email": "thura@example.com", "password": "secret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "abc123"})))
        .expect(1)
        .mount(&server)
        .await;
    mount_verify(&server, "abc123", 200).await;

    let client = connect(&server, &token_path);
    let mut login = LoginView::new(client.ctx.clone());
    let route = login.submit("thura@example.com", "secret").await;

    assert_eq!(route, Some(Route::Home));
    assert_eq!(client.session.user().unwrap().username, "thura");
    assert_eq!(std::fs::read_to_string(&token_path).unwrap(), "abc123");

    let restarted = connect(&server, &token_path);
    assert!(restarted.session.is_logged_in());
    match restarted.session.restore().await {
        RefreshOutcome::Refreshed(profile) => assert_eq!(profile.coins, 100),
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[tokio::test]
async fn test_expired_stored_token_signs_out_on_restore() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let token_path = dir.path().join("token");
    std::fs::write(&token_path, "stale").unwrap();
    mount_verify(&server, "stale", 401).await;

    let client = connect(&server, &token_path);

    assert_eq!(client.session.restore().await, RefreshOutcome::SignedOut);
    assert!(!client.session.is_logged_in());
    assert!(client.session.user().is_none());
    assert!(!token_path.exists());
}

#[tokio::test]
async fn test_rejected_token_on_movie_page_routes_to_login() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let token_path = dir.path().join("token");
    std::fs::write(&token_path, "abc123").unwrap();
    mount_verify(&server, "abc123", 200).await;
    Mock::given(method("GET"))
        .and(path("/api/movies/3/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "expired"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = connect(&server, &token_path);
    client.session.restore().await;
    assert!(client.session.user().is_some());

    let mut view = MovieView::new(client.ctx.clone(), 3);
    let route = view.load().await;

    assert_eq!(route, Some(Route::Login));
    assert!(!client.session.is_logged_in());
    assert!(!token_path.exists());
    assert!(view.detail().is_none());
}

#[tokio::test]
async fn test_checkout_uploads_order_and_lists_it() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let token_path = dir.path().join("token");
    std::fs::write(&token_path, "abc123").unwrap();
    mount_verify(&server, "abc123", 200).await;
    Mock::given(method("POST"))
        .and(path("/api/orders/create/"))
        .and(header("authorization", "Bearer abc123"))
        .and(body_string_contains("wavepay - 14,999 Kyats MMK"))
        .and(body_string_contains("filename=\"receipt.png\""))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/orders/history/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "plan": "200", "status": "pending", "created_at": "2024-11-02T08:30:00Z"}
        ])))
        .mount(&server)
        .await;

    let screenshot_path = dir.path().join("receipt.png");
    std::fs::write(&screenshot_path, b"not-really-a-png").unwrap();

    let client = connect(&server, &token_path);
    client.session.restore().await;

    let plan = CoinPlan::by_name("200 Coins").unwrap();
    let route = PricingView::new().choose(&plan);
    let mut checkout = CheckoutView::open(client.ctx.clone(), &route);
    assert_eq!(checkout.mount(), None);
    checkout.select_method(PaymentMethod::WavePay);
    checkout.attach_screenshot(load_screenshot(&screenshot_path).await.unwrap());

    assert_eq!(checkout.submit().await, Some(Route::OrderHistory));
    assert_eq!(client.notifier.messages(), vec!["Payment successful!"]);

    let mut history = OrderHistoryView::new(client.ctx.clone());
    assert_eq!(history.load().await, None);
    assert_eq!(history.orders().len(), 1);
    assert_eq!(history.orders()[0].plan, "200");
}

#[tokio::test]
async fn test_rename_updates_server_and_session() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let token_path = dir.path().join("token");
    std::fs::write(&token_path, "abc123").unwrap();
    mount_verify(&server, "abc123", 200).await;
    Mock::given(method("GET"))
        .and(path("/api/movies/watchlist/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/profile/update/"))
        .and(body_json(json!({"username": "kyaw"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = connect(&server, &token_path);
    client.session.restore().await;

    let mut profile = ProfileView::new(client.ctx.clone());
    assert_eq!(profile.load().await, None);
    assert_eq!(profile.save_username("kyaw").await, None);

    assert_eq!(profile.username(), "kyaw");
    assert_eq!(client.session.user().unwrap().username, "kyaw");

    assert_eq!(profile.logout(), Route::Login);
    assert!(!token_path.exists());
}

#[tokio::test]
async fn test_server_outage_keeps_session() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let token_path = dir.path().join("token");
    std::fs::write(&token_path, "abc123").unwrap();
    mount_verify(&server, "abc123", 200).await;
    Mock::given(method("GET"))
        .and(path("/api/orders/history/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = connect(&server, &token_path);
    client.session.restore().await;

    let mut history = OrderHistoryView::new(client.ctx.clone());
    assert_eq!(history.load().await, None);

    assert!(history.error().is_some());
    assert!(client.session.is_logged_in());
    assert!(token_path.exists());
}
