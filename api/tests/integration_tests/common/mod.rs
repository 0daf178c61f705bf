//! Common test utilities and helpers for integration tests.
//!
//! This module provides a fake backend server that answers canned responses and
//! records every request it receives, plus HTTP request helpers for the gateway
//! router.

use api::{create_router, AppState, BackendEndpoints, Config};
use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{Request, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

/// A request received by the fake backend.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Request path, e.g. `/prometheus/api/v1/query_range`.
    pub path: String,
    /// Decoded query string pairs, in order.
    pub params: Vec<(String, String)>,
}

impl RecordedRequest {
    /// Returns the first value of parameter `key`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Clone)]
struct Canned {
    status: StatusCode,
    body: String,
    delay: Duration,
}

struct Inner {
    routes: HashMap<String, Canned>,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// Builder for a fake backend serving the log, metric and trace APIs on one port.
///
/// Paths are the full request paths the gateway will hit: `/loki/api/v1/...`,
/// `/prometheus/api/v1/...` and `/tempo/api/...`. Unknown paths answer 404.
#[derive(Default)]
pub struct FakeBackend {
    routes: HashMap<String, Canned>,
}

impl FakeBackend {
    /// Creates a backend with no routes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers `path` with a 200 JSON body.
    pub fn json(self, path: &str, body: Value) -> Self {
        self.raw(path, StatusCode::OK, &body.to_string())
    }

    /// Answers `path` with an arbitrary status and body.
    pub fn raw(mut self, path: &str, status: StatusCode, body: &str) -> Self {
        self.routes.insert(
            path.to_string(),
            Canned {
                status,
                body: body.to_string(),
                delay: Duration::ZERO,
            },
        );
        self
    }

    /// Answers `path` with a 200 JSON body after `delay`.
    pub fn slow(mut self, path: &str, body: Value, delay: Duration) -> Self {
        self.routes.insert(
            path.to_string(),
            Canned {
                status: StatusCode::OK,
                body: body.to_string(),
                delay,
            },
        );
        self
    }

    /// Starts serving on an ephemeral local port.
    pub async fn start(self) -> RunningBackend {
        let inner = Arc::new(Inner {
            routes: self.routes,
            requests: Mutex::new(Vec::new()),
        });

        let router = Router::new().fallback(answer).with_state(inner.clone());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });

        RunningBackend {
            base: format!("http://{addr}"),
            inner,
        }
    }
}

async fn answer(
    State(inner): State<Arc<Inner>>,
    uri: Uri,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    inner.requests.lock().unwrap().push(RecordedRequest {
        path: uri.path().to_string(),
        params,
    });

    let Some(canned) = inner.routes.get(uri.path()).cloned() else {
        return (StatusCode::NOT_FOUND, "404 page not found").into_response();
    };

    if !canned.delay.is_zero() {
        tokio::time::sleep(canned.delay).await;
    }
    (
        canned.status,
        [("content-type", "application/json")],
        canned.body,
    )
        .into_response()
}

/// A fake backend that is accepting connections.
pub struct RunningBackend {
    base: String,
    inner: Arc<Inner>,
}

impl RunningBackend {
    /// Returns every request received so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.inner.requests.lock().unwrap().clone()
    }

    /// Returns a gateway configuration pointing all backends at this server.
    pub fn config(&self) -> Config {
        Config {
            backends: BackendEndpoints::new(
                format!("{}/loki/api/v1", self.base),
                format!("{}/prometheus/api/v1", self.base),
                format!("{}/tempo/api", self.base),
            ),
            backend_timeout: Duration::from_secs(2),
            ..Config::default()
        }
    }
}

/// Creates a gateway router wired to `backend` through the real HTTP executor.
pub fn test_app(backend: &RunningBackend) -> Router {
    test_app_with(&backend.config())
}

/// Creates a gateway router from an explicit configuration.
pub fn test_app_with(config: &Config) -> Router {
    let state = AppState::from_config(config).unwrap();
    create_router(state)
}

async fn send(app: Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let response = tower::ServiceExt::oneshot(
        app,
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap();

    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

    (status, json)
}

/// Helper to make a GET request.
pub async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    send(app, "GET", uri).await
}

/// Helper to make a POST request with the parameters in the query string.
pub async fn post(app: Router, uri: &str) -> (StatusCode, Value) {
    send(app, "POST", uri).await
}
