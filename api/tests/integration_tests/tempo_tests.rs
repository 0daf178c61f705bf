//! Integration tests for the trace backend route.
//!
//! Tests cover:
//! - Trace pass-through
//! - Missing traces
//! - Path segment encoding

use axum::http::StatusCode;
use serde_json::json;

use super::common::{get, post, test_app, FakeBackend};

#[tokio::test]
async fn test_query_trace_returns_trace_untouched() {
    let trace = json!({
        "resourceSpans": [{
            "resource": {"attributes": [{"key": "service.name", "value": {"stringValue": "checkout"}}]},
            "scopeSpans": [{"spans": [{"spanId": "a1b2c3d4e5f60718", "name": "POST /pay"}]}]
        }]
    });
    let backend = FakeBackend::new()
        .json(
            "/tempo/api/v2/traces/4bf92f3577b34da6a3ce929d0e0e4736",
            json!({"trace": trace}),
        )
        .start()
        .await;

    let (status, response) = post(
        test_app(&backend),
        "/o11y/tempo/api/query_trace?trace_id=4bf92f3577b34da6a3ce929d0e0e4736",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response, json!({"trace": trace}));
}

#[tokio::test]
async fn test_missing_trace_has_message() {
    let backend = FakeBackend::new().start().await;

    let (status, response) = get(
        test_app(&backend),
        "/o11y/tempo/api/query_trace?trace_id=00000000000000000000000000000000",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["trace"], json!({}));
    assert!(response["message"].is_string());
    assert_eq!(
        backend.requests()[0].path,
        "/tempo/api/v2/traces/00000000000000000000000000000000"
    );
}

#[tokio::test]
async fn test_trace_id_is_path_encoded() {
    let backend = FakeBackend::new().start().await;

    get(
        test_app(&backend),
        "/o11y/tempo/api/query_trace?trace_id=..%2F..%2Fmetrics",
    )
    .await;

    assert_eq!(
        backend.requests()[0].path,
        "/tempo/api/v2/traces/..%2F..%2Fmetrics"
    );
}
