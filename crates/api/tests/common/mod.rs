//! Shared helpers for API integration tests.
//!
//! Builds the production router (same middleware stack as `main.rs`) on a
//! `#[sqlx::test]`-provided pool, plus small request/response helpers used
//! across the test files.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use cocosurvey_ai::{AnalysisClient, AnalysisSettings};
use cocosurvey_api::auth::jwt::JwtConfig;
use cocosurvey_api::config::{AiConfig, ServerConfig};
use cocosurvey_api::router::build_app_router;
use cocosurvey_api::state::AppState;
use cocosurvey_events::ResponseNotifier;

/// Build a test `ServerConfig` with safe defaults.
///
/// The AI credential is a dummy key pointed at an unroutable local address:
/// the analyze endpoint is enabled, the empty-input short-circuit never
/// touches the network, and any real upstream call fails fast (exercising
/// the degraded/502 paths deterministically).
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret-that-is-long-enough".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
        ai: AiConfig {
            api_key: Some("test-key".to_string()),
            model: "gemini-1.5-flash".to_string(),
            api_url: "http://127.0.0.1:9".to_string(),
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let analysis = config.ai.api_key.as_ref().map(|api_key| {
        Arc::new(AnalysisClient::new(AnalysisSettings {
            api_key: api_key.clone(),
            model: config.ai.model.clone(),
            api_url: config.ai.api_url.clone(),
        }))
    });
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        analysis,
        notifier: Arc::new(ResponseNotifier::from_env()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    path: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, path: &str) -> Response<Body> {
    send(app, Method::GET, path, None, None).await
}

pub async fn get_auth(app: Router, path: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, path, Some(token), None).await
}

pub async fn post_json(app: Router, path: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, path, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    path: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::POST, path, Some(token), Some(body)).await
}

pub async fn put_json_auth(
    app: Router,
    path: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PUT, path, Some(token), Some(body)).await
}

pub async fn patch_json_auth(
    app: Router,
    path: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PATCH, path, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, path: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, path, Some(token), None).await
}

/// Read the response body as JSON. Empty bodies (204) decode to `null`.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    if bytes.is_empty() {
        return serde_json::Value::Null;
    }
    serde_json::from_slice(&bytes).expect("body is valid JSON")
}

// ---------------------------------------------------------------------------
// Fixture helpers
// ---------------------------------------------------------------------------

/// Sign up a fresh organization and return an access token for its owner.
pub async fn signup_and_token(pool: &PgPool, email: &str) -> String {
    let app = build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/auth/signup",
        serde_json::json!({
            "orgName": "Acme Inc",
            "email": email,
            "password": "password123"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    json["access_token"].as_str().unwrap().to_string()
}

/// Create an active form with the given fields, returning `(form_id, share_id)`.
pub async fn create_active_form(
    pool: &PgPool,
    token: &str,
    mut body: serde_json::Value,
) -> (i64, String) {
    body["status"] = serde_json::json!("active");
    let app = build_test_app(pool.clone());
    let response = post_json_auth(app, "/api/v1/forms", token, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let form_id = json["data"]["id"].as_i64().unwrap();
    let share_id = json["data"]["shareId"].as_str().unwrap().to_string();
    (form_id, share_id)
}
