#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use payroll_api::config::{ServerConfig, SummaryConfig};
use payroll_api::router::build_app_router;
use payroll_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
///
/// Upstream URLs point at a closed local port and no completion API key is
/// set. Tests that need an upstream spawn one with [`spawn_upstream`] and
/// override the relevant field.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3001".to_string()],
        request_timeout_secs: 30,
        upstream_connect_timeout_secs: 2,
        payroll_api_base: "http://127.0.0.1:9/resource.json".to_string(),
        job_summary_path: "/api/job-summary".to_string(),
        summary: SummaryConfig {
            api_base: "http://127.0.0.1:9/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            max_tokens: 400,
            api_key: None,
        },
    }
}

/// Build the full application router with all middleware layers.
///
/// Uses the same [`build_app_router`] as `main.rs`, so integration tests
/// exercise the production middleware stack.
pub fn build_test_app(config: ServerConfig) -> Router {
    let state = AppState::from_config(config.clone()).unwrap();
    build_app_router(state, &config)
}

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn spawn_upstream(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}
