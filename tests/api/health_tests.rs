//! Health Check and Metrics API Tests

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use realtime_gateway::startup::{build_router, AppState};

use crate::common::test_settings;

fn test_state() -> AppState {
    AppState::new(test_settings())
}

async fn get(router: Router, uri: &str) -> (StatusCode, String) {
    let response = router
        .oneshot(Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

/// Test basic health check endpoint returns 200 OK
#[tokio::test]
async fn test_health_check_returns_ok() {
    let (status, body) = get(build_router(test_state()), "/health").await;

    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

/// Test liveness probe endpoint
#[tokio::test]
async fn test_liveness_probe() {
    let (status, body) = get(build_router(test_state()), "/health/live").await;

    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "alive");
}

/// Test readiness probe reports the gateway's connections
#[tokio::test]
async fn test_readiness_probe() {
    let (status, body) = get(build_router(test_state()), "/health/ready").await;

    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["websocket"]["active_connections"], 0);
    assert!(json["started_at"].is_string());
}

/// Readiness flips to 503 once shutdown has started
#[tokio::test]
async fn test_readiness_probe_during_shutdown() {
    let state = test_state();
    state.registry.shutdown();

    let (status, body) = get(build_router(state), "/health/ready").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "unhealthy");
}

/// Metrics endpoint serves the Prometheus text format
#[tokio::test]
async fn test_metrics_endpoint() {
    realtime_gateway::infrastructure::metrics::set_websocket_connections(0);

    let (status, body) = get(build_router(test_state()), "/metrics").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("realtime_gateway_websocket_connections_active"));
}

/// Plain HTTP requests to the socket path are rejected
#[tokio::test]
async fn test_socket_path_requires_upgrade() {
    let (status, _) = get(build_router(test_state()), "/socket").await;
    assert!(status.is_client_error(), "got {}", status);
}
