//! Integration tests for health check and general API functionality.
//!
//! Tests cover:
//! - Health check endpoint
//! - Backends left untouched by health checks
//! - Unreachable backends

use axum::http::StatusCode;

use super::common::{get, test_app, test_app_with, FakeBackend};
use api::{BackendEndpoints, Config};
use std::time::Duration;

#[tokio::test]
async fn test_health_check() {
    let backend = FakeBackend::new().start().await;
    let app = test_app(&backend);

    let (status, response) = get(app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["status"], "healthy");
    assert_eq!(response["service"], "o11y-gateway");
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_unreachable_backend_is_bad_gateway() {
    // Bind and drop a listener to get a local port nothing listens on
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = Config {
        backends: BackendEndpoints::new(
            format!("http://{addr}/loki/api/v1"),
            format!("http://{addr}/api/v1"),
            format!("http://{addr}/api"),
        ),
        backend_timeout: Duration::from_secs(2),
        ..Config::default()
    };

    let (status, response) = get(test_app_with(&config), "/o11y/loki/api/v1/labels").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(response["error"], "backend_unavailable");
}
