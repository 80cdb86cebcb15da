use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use chrono::{Duration as ChronoDuration, Utc};
use server::routes::{self, ServerState};
use service::auth::domain::Identity;
use service::auth::token::{self, Claims};
use service::auth::password::HashCost;
use service::auth::repository::mock::MockUserStore;
use service::auth::AuthConfig;
use service::flight::repository::mock::MockFlightStore;

fn cors() -> tower_http::cors::CorsLayer { tower_http::cors::CorsLayer::very_permissive() }

fn build_app() -> Router {
    let mut cfg = AuthConfig::new("test-secret", 72);
    cfg.hash_cost = HashCost::minimal();
    let state = ServerState::new(Arc::new(MockUserStore::default()), Arc::new(MockFlightStore::default()), cfg);
    routes::build_router(state, cors(), Duration::from_secs(5))
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn read_json(resp: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_is_public() -> anyhow::Result<()> {
    let app = build_app();
    let resp = app.oneshot(Request::builder().uri("/health").body(Body::empty())?).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(read_json(resp).await, json!({"status": "ok"}));
    Ok(())
}

#[tokio::test]
async fn test_register_and_login_flow() -> anyhow::Result<()> {
    let app = build_app();

    // Register
    let body = json!({"username": "tester", "email": "tester@example.com", "password": "S3curePass!"});
    let resp = app.clone().oneshot(post_json("/v1/register", body)).await?;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let user = read_json(resp).await;
    assert_eq!(user["name"], "tester");
    assert!(user.get("password").is_none());

    // Duplicate name
    let dup = json!({"username": "tester", "email": "other@example.com", "password": "x"});
    let resp = app.clone().oneshot(post_json("/v1/register", dup)).await?;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // Login
    let resp = app
        .clone()
        .oneshot(post_json("/v1/login", json!({"username": "tester", "password": "S3curePass!"})))
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    // Must set cookie
    let cookie = resp.headers().get(header::SET_COOKIE).and_then(|v| v.to_str().ok()).map(str::to_string);
    assert!(cookie.as_deref().is_some_and(|c| c.starts_with("auth_token=")));
    let token = read_json(resp).await["token"].as_str().unwrap_or_default().to_string();
    assert!(!token.is_empty());

    // Me via bearer header
    let req = Request::builder()
        .uri("/v1/me")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())?;
    let resp = app.clone().oneshot(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let me = read_json(resp).await;
    assert_eq!(me["name"], "tester");
    assert_eq!(me["email"], "tester@example.com");

    // Me via cookie
    let req = Request::builder()
        .uri("/v1/me")
        .header(header::COOKIE, format!("auth_token={}", token))
        .body(Body::empty())?;
    let resp = app.oneshot(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn wrong_password_is_unauthorized_without_token() -> anyhow::Result<()> {
    let app = build_app();
    let body = json!({"username": "bob", "email": "bob@example.com", "password": "right"});
    app.clone().oneshot(post_json("/v1/register", body)).await?;

    let resp = app
        .clone()
        .oneshot(post_json("/v1/login", json!({"username": "bob", "password": "wrong"})))
        .await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().get(header::SET_COOKIE).is_none());
    let body = read_json(resp).await;
    assert!(body.get("token").is_none());

    let resp = app.oneshot(post_json("/v1/login", json!({"username": "nobody", "password": "x"}))).await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn register_validation_reports_fields() -> anyhow::Result<()> {
    let app = build_app();
    let body = json!({"username": "", "email": "a@example.com", "password": ""});
    let resp = app.oneshot(post_json("/v1/register", body)).await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = read_json(resp).await;
    let fields: Vec<&str> = body["fields"].as_array().unwrap().iter().filter_map(|f| f["field"].as_str()).collect();
    assert!(fields.contains(&"name"));
    assert!(fields.contains(&"password"));
    Ok(())
}

#[tokio::test]
async fn protected_routes_require_token() -> anyhow::Result<()> {
    let app = build_app();
    let resp = app.clone().oneshot(Request::builder().uri("/v1/me").body(Body::empty())?).await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = Request::builder()
        .uri("/v1/flights")
        .header(header::AUTHORIZATION, "Bearer not-a-jwt")
        .body(Body::empty())?;
    let resp = app.clone().oneshot(req).await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = Request::builder()
        .uri("/v1/flights")
        .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
        .body(Body::empty())?;
    let resp = app.oneshot(req).await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn recently_expired_token_is_rejected() -> anyhow::Result<()> {
    let app = build_app();
    // exp = now - 30s
    let issued = Utc::now() - ChronoDuration::seconds(90);
    let claims = Claims::new(&Identity::new("u-1", "tester"), issued, ChronoDuration::seconds(60));
    let token = token::sign(&claims, "test-secret")?;
    let req = Request::builder()
        .uri("/v1/me")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())?;
    let resp = app.oneshot(req).await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn openapi_document_is_served() -> anyhow::Result<()> {
    let app = build_app();
    let resp = app.oneshot(Request::builder().uri("/api-docs/openapi.json").body(Body::empty())?).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let doc = read_json(resp).await;
    assert!(doc["paths"].get("/v1/flights").is_some());
    Ok(())
}
