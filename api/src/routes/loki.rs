//! Log backend endpoints.
//!
//! Range queries are forwarded with the caller's range parameters untouched and
//! their results normalized. Label and stream listings are flattened to plain lists.

use super::params::{bind, LabelParams, RangeQueryParams, SelectorParams};
use super::response::{ListingResponse, QueryRangeResponse};
use crate::error::GatewayError;
use crate::state::AppState;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use shared::models::LabelSet;
use shared::query::QueryDescriptor;

/// Creates the log backend routes.
pub fn loki_routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/o11y/loki/api/v1/query_range",
            get(query_range).post(query_range),
        )
        .route("/o11y/loki/api/v1/labels", get(labels).post(labels))
        .route(
            "/o11y/loki/api/v1/label_values",
            get(label_values).post(label_values),
        )
        .route(
            "/o11y/loki/api/v1/streams_selector_has",
            get(streams_selector_has).post(streams_selector_has),
        )
        .with_state(state)
}

async fn query_range(
    State(state): State<AppState>,
    params: Result<Query<RangeQueryParams>, QueryRejection>,
) -> Result<Json<QueryRangeResponse>, GatewayError> {
    let query = QueryDescriptor::from(bind(params)?);
    let result = state.gateway().loki_query_range(&query).await?;
    Ok(Json(result.into()))
}

async fn labels(
    State(state): State<AppState>,
) -> Result<Json<ListingResponse<String>>, GatewayError> {
    let labels = state.gateway().loki_labels().await?;
    Ok(Json(labels.into()))
}

async fn label_values(
    State(state): State<AppState>,
    params: Result<Query<LabelParams>, QueryRejection>,
) -> Result<Json<ListingResponse<String>>, GatewayError> {
    let params = bind(params)?;
    let values = state.gateway().loki_label_values(&params.label).await?;
    Ok(Json(values.into()))
}

async fn streams_selector_has(
    State(state): State<AppState>,
    params: Result<Query<SelectorParams>, QueryRejection>,
) -> Result<Json<ListingResponse<LabelSet>>, GatewayError> {
    let params = bind(params)?;
    let streams = state.gateway().loki_series(&params.selector).await?;
    Ok(Json(streams.into()))
}
