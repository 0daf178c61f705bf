//! Integration tests for the log backend routes.
//!
//! Tests cover:
//! - Range query forwarding and stream normalization
//! - Metric-style (matrix) answers from the log backend
//! - Label and stream listings
//! - Backend error handling

use axum::http::StatusCode;
use serde_json::json;

use super::common::{get, post, test_app, FakeBackend};

#[tokio::test]
async fn test_query_range_streams_are_normalized_in_order() {
    let backend = FakeBackend::new()
        .json(
            "/loki/api/v1/query_range",
            json!({
                "status": "success",
                "data": {
                    "resultType": "streams",
                    "result": [
                        {
                            "stream": {"app": "checkout", "level": "error"},
                            "values": [
                                ["1750000003000000000", "payment declined"],
                                ["1750000001000000000", "retrying payment"],
                                ["1750000002000000000", "retrying payment"]
                            ]
                        },
                        {
                            "stream": {"app": "cart", "level": "error"},
                            "values": [
                                ["1750000000500000000", "cart not found"],
                                ["1750000000400000000", "cart not found"],
                                ["1750000000300000000", "session expired"]
                            ]
                        }
                    ]
                }
            }),
        )
        .start()
        .await;
    let app = test_app(&backend);

    let (status, response) = post(
        app,
        "/o11y/loki/api/v1/query_range?query=%7Blevel%3D%22error%22%7D&start=1750000000000000000&limit=500",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["kind"], "log");
    assert!(response.get("message").is_none());

    let series = response["series"].as_array().unwrap();
    assert_eq!(series.len(), 2);
    assert_eq!(series[0]["labels"]["app"], "checkout");
    assert_eq!(series[1]["labels"]["app"], "cart");
    assert_eq!(series[0]["entries"].as_array().unwrap().len(), 3);
    assert_eq!(
        series[0]["entries"][1],
        json!({"timestamp": "1750000001000000000", "value": "retrying payment"})
    );
    assert_eq!(series[1]["entries"][2]["value"], "session expired");

    let requests = backend.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/loki/api/v1/query_range");
    assert_eq!(requests[0].param("query"), Some(r#"{level="error"}"#));
    assert_eq!(requests[0].param("start"), Some("1750000000000000000"));
    assert_eq!(requests[0].param("limit"), Some("500"));
    assert_eq!(requests[0].param("end"), None);
    assert_eq!(requests[0].param("step"), None);
}

#[tokio::test]
async fn test_query_range_matrix_from_log_backend() {
    let backend = FakeBackend::new()
        .json(
            "/loki/api/v1/query_range",
            json!({
                "status": "success",
                "data": {
                    "resultType": "matrix",
                    "result": [{
                        "metric": {"app": "checkout"},
                        "values": [[1750000000, "12"], [1750000060, "7"]]
                    }]
                }
            }),
        )
        .start()
        .await;
    let app = test_app(&backend);

    let (status, response) = get(
        app,
        "/o11y/loki/api/v1/query_range?query=count_over_time(%7Bapp%3D%22checkout%22%7D%5B1m%5D)&step=60",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["kind"], "metric");
    assert_eq!(response["series"][0]["entries"][1]["value"], "7");
    assert_eq!(backend.requests()[0].param("step"), Some("60"));
}

#[tokio::test]
async fn test_query_range_empty_streams() {
    let backend = FakeBackend::new()
        .json(
            "/loki/api/v1/query_range",
            json!({"status": "success", "data": {"resultType": "streams", "result": []}}),
        )
        .start()
        .await;
    let app = test_app(&backend);

    let (status, response) = get(app, "/o11y/loki/api/v1/query_range?query=%7Bapp%3D%22nope%22%7D").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["kind"], "empty");
    assert_eq!(response["series"], json!([]));
    assert!(response["message"].is_string());
}

#[tokio::test]
async fn test_query_range_structured_metadata_is_dropped() {
    let backend = FakeBackend::new()
        .json(
            "/loki/api/v1/query_range",
            json!({
                "status": "success",
                "data": {
                    "resultType": "streams",
                    "result": [{
                        "stream": {"app": "api"},
                        "values": [["1750000000000000000", "request done", {"trace_id": "4bf92f35"}]]
                    }]
                }
            }),
        )
        .start()
        .await;
    let app = test_app(&backend);

    let (status, response) = get(app, "/o11y/loki/api/v1/query_range?query=%7Bapp%3D%22api%22%7D").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["kind"], "log");
    assert_eq!(
        response["series"][0]["entries"][0],
        json!({"timestamp": "1750000000000000000", "value": "request done"})
    );
}

#[tokio::test]
async fn test_query_range_decode_failure() {
    let backend = FakeBackend::new()
        .json(
            "/loki/api/v1/query_range",
            json!({
                "status": "success",
                "data": {"resultType": "streams", "result": [{"stream": {"app": "x"}, "values": [[1, 2]]}]}
            }),
        )
        .start()
        .await;
    let app = test_app(&backend);

    let (status, response) = get(app, "/o11y/loki/api/v1/query_range?query=x").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(response["error"], "backend_decode_error");
}

#[tokio::test]
async fn test_query_range_backend_parse_error() {
    let backend = FakeBackend::new()
        .raw(
            "/loki/api/v1/query_range",
            StatusCode::BAD_REQUEST,
            "parse error at line 1, col 1: syntax error: unexpected IDENTIFIER",
        )
        .start()
        .await;
    let app = test_app(&backend);

    let (status, response) = get(app, "/o11y/loki/api/v1/query_range?query=oops").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(response["error"], "backend_unavailable");
    assert!(response["message"]
        .as_str()
        .unwrap()
        .contains("HTTP 400: parse error at line 1"));
}

#[tokio::test]
async fn test_missing_query_never_reaches_backend() {
    let backend = FakeBackend::new().start().await;
    let app = test_app(&backend);

    let (status, response) = get(app, "/o11y/loki/api/v1/query_range?start=1750000000").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "invalid_request");
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_labels_and_label_values() {
    let backend = FakeBackend::new()
        .json(
            "/loki/api/v1/labels",
            json!({"status": "success", "data": ["app", "level", "namespace"]}),
        )
        .json(
            "/loki/api/v1/label/namespace/values",
            json!({"status": "success", "data": ["default", "shop"]}),
        )
        .start()
        .await;

    let (status, labels) = get(test_app(&backend), "/o11y/loki/api/v1/labels").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(labels, json!({"data": ["app", "level", "namespace"]}));

    let (status, values) = post(
        test_app(&backend),
        "/o11y/loki/api/v1/label_values?label=namespace",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(values, json!({"data": ["default", "shop"]}));
}

#[tokio::test]
async fn test_streams_selector_has() {
    let backend = FakeBackend::new()
        .json(
            "/loki/api/v1/series",
            json!({
                "status": "success",
                "data": [
                    {"app": "checkout", "pod": "checkout-7d9f"},
                    {"app": "checkout", "pod": "checkout-a12c"}
                ]
            }),
        )
        .start()
        .await;
    let app = test_app(&backend);

    let (status, response) = get(
        app,
        "/o11y/loki/api/v1/streams_selector_has?selector=%7Bapp%3D%22checkout%22%7D",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["data"][1]["pod"], "checkout-a12c");
    assert_eq!(
        backend.requests()[0].param("match[]"),
        Some(r#"{app="checkout"}"#)
    );
}
