//! Integration tests for the management API
//!
//! These tests drive the API router end-to-end: shortening URLs,
//! logging in, and reading the protected listing and analytics
//! endpoints through the session middleware.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::{DateTime, Utc};
use linksnap::api;
use linksnap::auth::AuthService;
use linksnap::config::AuthConfig;
use linksnap::models::ClickEvent;
use linksnap::storage::{MemoryStore, Storage};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

/// Helper to build an auth service with the default demo credentials
fn auth_service() -> Arc<AuthService> {
    Arc::new(AuthService::new(&AuthConfig {
        admin_email: "admin@linksnap.com".to_string(),
        admin_password: "admin123".to_string(),
        session_secret: Some("integration-test-secret".to_string()),
        session_ttl_hours: 24,
    }))
}

/// Helper to build the API router over the given store
fn test_router(store: Arc<MemoryStore>) -> Router {
    api::routes::create_api_router(
        store,
        auth_service(),
        None,
        "http://localhost:3000".to_string(),
    )
}

/// Helper to parse a JSON response body
async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Helper to log in with the demo credentials and return the bearer token
async fn login_token(app: &Router) -> String {
    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({ "email": "admin@linksnap.com", "password": "admin123" }).to_string(),
        ))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK, "login should succeed");

    let body = body_json(response).await;
    body["token"].as_str().unwrap().to_string()
}

fn click(referrer: &str, user_agent: &str) -> ClickEvent {
    ClickEvent {
        timestamp: Utc::now(),
        referrer: referrer.to_string(),
        user_agent: user_agent.to_string(),
    }
}

#[tokio::test]
async fn test_health_check() {
    let app = test_router(Arc::new(MemoryStore::new()));

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "OK");
}

#[tokio::test]
async fn test_shorten_creates_url() {
    let store = Arc::new(MemoryStore::new());
    let app = test_router(store.clone());

    let request = Request::builder()
        .method("POST")
        .uri("/api/shorten")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({ "url": "https://example.com/landing" }).to_string(),
        ))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;

    let code = body["shortCode"].as_str().unwrap();
    assert_eq!(code.len(), 6, "short codes are six characters");
    assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_eq!(
        body["shortUrl"].as_str().unwrap(),
        format!("http://localhost:3000/{code}")
    );
    assert_eq!(body["originalUrl"], "https://example.com/landing");
    assert!(body["createdAt"].is_string());

    // The entry is immediately visible in storage.
    let entry = store.get(code).await.unwrap().unwrap();
    assert_eq!(entry.original_url, "https://example.com/landing");
    assert_eq!(entry.clicks(), 0);
}

#[tokio::test]
async fn test_shorten_rejects_invalid_scheme() {
    let app = test_router(Arc::new(MemoryStore::new()));

    for url in ["ftp://example.com", "example.com", "not a url"] {
        let request = Request::builder()
            .method("POST")
            .uri("/api/shorten")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({ "url": url }).to_string()))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();

        assert_eq!(
            response.status(),
            StatusCode::BAD_REQUEST,
            "{url} should be rejected"
        );
        let body = body_json(response).await;
        assert_eq!(body["error"], "url must start with http:// or https://");
    }
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = test_router(Arc::new(MemoryStore::new()));

    for path in ["/api/urls", "/api/analytics", "/api/analytics/abc123"] {
        // No Authorization header at all.
        let request = Request::builder().uri(path).body(Body::empty()).unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "{path} should reject anonymous requests"
        );
        let body = body_json(response).await;
        assert_eq!(body["error"], "authentication required");

        // A token that never came from the signer.
        let request = Request::builder()
            .uri(path)
            .header(header::AUTHORIZATION, "Bearer not-a-real-token")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "{path} should reject forged tokens"
        );
    }
}

#[tokio::test]
async fn test_login_returns_token_and_expiry() {
    let app = test_router(Arc::new(MemoryStore::new()));

    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({ "email": "admin@linksnap.com", "password": "admin123" }).to_string(),
        ))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(!body["token"].as_str().unwrap().is_empty());

    let expires_at: DateTime<Utc> = body["expiresAt"].as_str().unwrap().parse().unwrap();
    assert!(expires_at > Utc::now(), "session should expire in the future");
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let app = test_router(Arc::new(MemoryStore::new()));

    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({ "email": "admin@linksnap.com", "password": "wrong" }).to_string(),
        ))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "invalid credentials");
}

#[tokio::test]
async fn test_list_urls_shows_click_totals() {
    let store = Arc::new(MemoryStore::new());
    store
        .create_with_code("aaa111", "https://example.com/a")
        .await
        .unwrap();
    store
        .create_with_code("bbb222", "https://example.com/b")
        .await
        .unwrap();
    for _ in 0..3 {
        store
            .append_event("aaa111", click("google.com", "test-agent"))
            .await
            .unwrap();
    }

    let app = test_router(store);
    let token = login_token(&app).await;

    let request = Request::builder()
        .uri("/api/urls")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let urls = body.as_array().unwrap();
    assert_eq!(urls.len(), 2);

    // Listing order follows insertion order.
    assert_eq!(urls[0]["shortCode"], "aaa111");
    assert_eq!(urls[0]["originalUrl"], "https://example.com/a");
    assert_eq!(urls[0]["clicks"], 3);
    assert!(urls[0]["id"].is_number());
    assert!(urls[0]["createdAt"].is_string());
    assert_eq!(urls[1]["shortCode"], "bbb222");
    assert_eq!(urls[1]["clicks"], 0);
}

#[tokio::test]
async fn test_site_stats_endpoint() {
    let store = Arc::new(MemoryStore::new());
    store
        .create_with_code("aaa111", "https://example.com/a")
        .await
        .unwrap();
    store
        .create_with_code("bbb222", "https://example.com/b")
        .await
        .unwrap();
    for _ in 0..3 {
        store
            .append_event("aaa111", click("google.com", "test-agent"))
            .await
            .unwrap();
    }
    store
        .append_event("bbb222", click("", "test-agent"))
        .await
        .unwrap();

    let app = test_router(store);
    let token = login_token(&app).await;

    let request = Request::builder()
        .uri("/api/analytics")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["totalClicks"], 4);
    assert_eq!(body["totalUrls"], 2);

    let popular = body["popularUrls"].as_array().unwrap();
    assert_eq!(popular.len(), 2);
    assert_eq!(popular[0]["shortCode"], "aaa111");
    assert_eq!(popular[0]["clicks"], 3);
    assert_eq!(popular[0]["originalUrl"], "https://example.com/a");
    assert!(popular[0]["createdAt"].is_string());
    assert_eq!(popular[1]["shortCode"], "bbb222");
    assert_eq!(popular[1]["clicks"], 1);
}

#[tokio::test]
async fn test_url_stats_endpoint() {
    let store = Arc::new(MemoryStore::new());
    store
        .create_with_code("aaa111", "https://example.com/a")
        .await
        .unwrap();
    for _ in 0..2 {
        store
            .append_event(
                "aaa111",
                click(
                    "https://google.com/search?q=linksnap",
                    "Mozilla/5.0 (iPhone; CPU iPhone OS 16_0)",
                ),
            )
            .await
            .unwrap();
    }
    store
        .append_event(
            "aaa111",
            click("", "Mozilla/5.0 (Windows NT 10.0; Win64; x64)"),
        )
        .await
        .unwrap();

    let app = test_router(store);
    let token = login_token(&app).await;

    let request = Request::builder()
        .uri("/api/analytics/aaa111")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["shortCode"], "aaa111");
    assert_eq!(body["originalUrl"], "https://example.com/a");
    assert_eq!(body["totalClicks"], 3);

    assert_eq!(body["clicksByHour"].as_array().unwrap().len(), 24);
    assert_eq!(body["dailyClicks"].as_array().unwrap().len(), 7);

    let devices = body["deviceStats"].as_array().unwrap();
    assert_eq!(devices.len(), 2);
    assert_eq!(devices[0]["name"], "iPhone");
    assert_eq!(devices[0]["value"], 2);
    assert_eq!(devices[1]["name"], "Windows");
    assert_eq!(devices[1]["value"], 1);

    let referrers = body["referrerStats"].as_array().unwrap();
    assert_eq!(referrers.len(), 2);
    assert_eq!(referrers[0]["name"], "google.com");
    assert_eq!(referrers[0]["value"], 2);
    assert_eq!(referrers[1]["name"], "direct");
    assert_eq!(referrers[1]["value"], 1);
}

#[tokio::test]
async fn test_url_stats_unknown_code() {
    let app = test_router(Arc::new(MemoryStore::new()));
    let token = login_token(&app).await;

    let request = Request::builder()
        .uri("/api/analytics/nosuch")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"], "URL not found");
}

#[tokio::test]
async fn test_insights_unavailable_without_upstream() {
    let app = test_router(Arc::new(MemoryStore::new()));
    let token = login_token(&app).await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/ai/insights")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(json!({ "type": "traffic" }).to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(response).await;
    assert_eq!(body["error"], "insights API is not configured");
}
