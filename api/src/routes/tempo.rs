//! Trace backend endpoint.
//!
//! Traces are passed through untouched.

use super::params::{bind, TraceParams};
use super::response::TraceResponse;
use crate::error::GatewayError;
use crate::state::AppState;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};

/// Creates the trace backend routes.
pub fn tempo_routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/o11y/tempo/api/query_trace",
            get(query_trace).post(query_trace),
        )
        .with_state(state)
}

async fn query_trace(
    State(state): State<AppState>,
    params: Result<Query<TraceParams>, QueryRejection>,
) -> Result<Json<TraceResponse>, GatewayError> {
    let params = bind(params)?;
    let trace = state.gateway().tempo_trace(&params.trace_id).await?;
    Ok(Json(trace.into()))
}
