//! Caller parameter binding.
//!
//! Every gateway route reads its parameters from the query string, for GET and POST
//! alike. Binding fails with [`GatewayError::InvalidRequest`] when a required field is
//! missing or empty, or a field does not parse.

use crate::error::GatewayError;
use axum::extract::{rejection::QueryRejection, Query};
use serde::{de, Deserialize, Deserializer};
use shared::query::{Direction, QueryDescriptor};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

/// Unwraps and validates extracted query parameters.
pub(crate) fn bind<T: Validate>(
    params: Result<Query<T>, QueryRejection>,
) -> Result<T, GatewayError> {
    let Query(params) =
        params.map_err(|rejection| GatewayError::InvalidRequest(rejection.body_text()))?;

    params
        .validate()
        .map_err(|errors| GatewayError::InvalidRequest(errors.to_string()))?;

    Ok(params)
}

/// Treats an empty value as absent, parsing anything else with `FromStr`.
fn empty_string_as_none<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let opt = Option::<String>::deserialize(de)?;
    match opt.as_deref() {
        None | Some("") => Ok(None),
        Some(s) => FromStr::from_str(s).map_err(de::Error::custom).map(Some),
    }
}

/// Parameters of a range query.
#[derive(Debug, Deserialize, Validate)]
pub struct RangeQueryParams {
    /// Query text in the backend's query language.
    #[validate(length(min = 1, message = "query must not be empty"))]
    pub query: String,
    /// Range start.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub start: Option<String>,
    /// Range end.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub end: Option<String>,
    /// Resolution step in seconds.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub step: Option<String>,
    /// Maximum number of log lines.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub limit: Option<i64>,
    /// Log line ordering.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub direction: Option<Direction>,
}

impl From<RangeQueryParams> for QueryDescriptor {
    fn from(params: RangeQueryParams) -> Self {
        Self {
            query: params.query,
            start: params.start,
            end: params.end,
            step: params.step,
            limit: params.limit,
            direction: params.direction,
        }
    }
}

/// Parameters of a label value lookup.
#[derive(Debug, Deserialize, Validate)]
pub struct LabelParams {
    /// Label name.
    #[validate(length(min = 1, message = "label must not be empty"))]
    pub label: String,
}

/// Parameters of a stream lookup by selector.
#[derive(Debug, Deserialize, Validate)]
pub struct SelectorParams {
    /// Stream selector, e.g. `{app="api"}`.
    #[validate(length(min = 1, message = "selector must not be empty"))]
    pub selector: String,
}

/// Parameters of a series lookup by metric.
#[derive(Debug, Deserialize, Validate)]
pub struct MetricParams {
    /// Metric name or series selector.
    #[validate(length(min = 1, message = "metric must not be empty"))]
    pub metric: String,
}

/// Parameters of a trace lookup.
#[derive(Debug, Deserialize, Validate)]
pub struct TraceParams {
    /// Trace id.
    #[validate(length(min = 1, message = "trace_id must not be empty"))]
    pub trace_id: String,
}
