//! Health check endpoint.
//!
//! Answers without touching any backend, so it reports gateway liveness only.

use crate::config::BackendEndpoints;
use crate::state::AppState;
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status (always "healthy" if reachable).
    pub status: &'static str,
    /// Service name.
    pub service: &'static str,
    /// Service version.
    pub version: &'static str,
    /// Backend base addresses the gateway forwards to.
    pub backends: BackendEndpoints,
}

/// Creates the health check routes.
pub fn health_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .with_state(state)
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "o11y-gateway",
        version: env!("CARGO_PKG_VERSION"),
        backends: state.gateway().endpoints().clone(),
    })
}
