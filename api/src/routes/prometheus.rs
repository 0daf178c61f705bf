//! Metric backend endpoints.
//!
//! Range queries go through range resolution before they are forwarded, so the
//! metric backend always receives a usable `start`, `end` and `step`.

use super::params::{bind, LabelParams, MetricParams, RangeQueryParams};
use super::response::{ListingResponse, QueryRangeResponse};
use crate::error::GatewayError;
use crate::state::AppState;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use shared::models::LabelSet;
use shared::query::QueryDescriptor;

/// Creates the metric backend routes.
pub fn prometheus_routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/o11y/prometheus/api/v1/query_range",
            get(query_range).post(query_range),
        )
        .route("/o11y/prometheus/api/v1/labels", get(labels).post(labels))
        .route(
            "/o11y/prometheus/api/v1/label_values",
            get(label_values).post(label_values),
        )
        .route(
            "/o11y/prometheus/api/v1/all_metrics",
            get(all_metrics).post(all_metrics),
        )
        .route(
            "/o11y/prometheus/api/v1/labels_values_metric_has",
            get(labels_values_metric_has).post(labels_values_metric_has),
        )
        .with_state(state)
}

async fn query_range(
    State(state): State<AppState>,
    params: Result<Query<RangeQueryParams>, QueryRejection>,
) -> Result<Json<QueryRangeResponse>, GatewayError> {
    let query = QueryDescriptor::from(bind(params)?);
    let result = state
        .gateway()
        .prometheus_query_range(&query, Utc::now())
        .await?;
    Ok(Json(result.into()))
}

async fn labels(
    State(state): State<AppState>,
) -> Result<Json<ListingResponse<String>>, GatewayError> {
    let labels = state.gateway().prometheus_labels().await?;
    Ok(Json(labels.into()))
}

async fn label_values(
    State(state): State<AppState>,
    params: Result<Query<LabelParams>, QueryRejection>,
) -> Result<Json<ListingResponse<String>>, GatewayError> {
    let params = bind(params)?;
    let values = state
        .gateway()
        .prometheus_label_values(&params.label)
        .await?;
    Ok(Json(values.into()))
}

async fn all_metrics(
    State(state): State<AppState>,
) -> Result<Json<ListingResponse<String>>, GatewayError> {
    let names = state.gateway().prometheus_metric_names().await?;
    Ok(Json(names.into()))
}

async fn labels_values_metric_has(
    State(state): State<AppState>,
    params: Result<Query<MetricParams>, QueryRejection>,
) -> Result<Json<ListingResponse<LabelSet>>, GatewayError> {
    let params = bind(params)?;
    let series = state.gateway().prometheus_series(&params.metric).await?;
    Ok(Json(series.into()))
}
