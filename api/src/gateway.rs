//! Gateway orchestration.
//!
//! [`Gateway`] turns caller intent into backend requests, runs them through the
//! configured [`BackendExecutor`] and normalizes what comes back. Handlers only bind
//! input and render output; everything in between happens here.

use crate::config::{BackendEndpoints, Config};
use crate::error::GatewayError;
use crate::executor::{BackendError, BackendExecutor, BackendRequest};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};
use shared::config::{Backend, PlausibleWindow, UnknownShapePolicy};
use shared::models::{LabelSet, NormalizedResult};
use shared::normalize::{
    normalize_label_list, normalize_response, normalize_series_list, NormalizeError,
};
use shared::query::{resolve_range, QueryDescriptor};
use std::sync::Arc;

/// Label holding the metric name in the metric backend.
const METRIC_NAME_LABEL: &str = "__name__";

/// Composes range resolution, backend execution and normalization per backend.
#[derive(Clone)]
pub struct Gateway {
    endpoints: BackendEndpoints,
    window: PlausibleWindow,
    unknown_shape: UnknownShapePolicy,
    executor: Arc<dyn BackendExecutor>,
}

#[derive(Debug, Deserialize)]
struct TraceEnvelope {
    #[serde(default)]
    trace: Option<Map<String, Value>>,
}

impl Gateway {
    /// Creates a gateway that sends every backend call through `executor`.
    #[must_use]
    pub fn new(config: &Config, executor: Arc<dyn BackendExecutor>) -> Self {
        Self {
            endpoints: config.backends.clone(),
            window: config.window,
            unknown_shape: config.unknown_shape,
            executor,
        }
    }

    /// Returns the backend base addresses.
    #[must_use]
    pub fn endpoints(&self) -> &BackendEndpoints {
        &self.endpoints
    }

    /// Returns the plausible-date window used for timestamp classification.
    #[must_use]
    pub fn window(&self) -> &PlausibleWindow {
        &self.window
    }

    /// Runs a log range query.
    ///
    /// Range parameters are forwarded verbatim when supplied; the log backend applies
    /// its own defaults to the rest. `limit` is dropped when zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend call fails or its response cannot be normalized.
    pub async fn loki_query_range(
        &self,
        query: &QueryDescriptor,
    ) -> Result<NormalizedResult, GatewayError> {
        let mut request = BackendRequest::new(
            Backend::Loki,
            self.endpoints.url(Backend::Loki, "query_range"),
        )
        .with_param("query", query.query.as_str());

        if let Some(start) = non_empty(query.start.as_deref()) {
            request = request.with_param("start", start);
        }
        if let Some(end) = non_empty(query.end.as_deref()) {
            request = request.with_param("end", end);
        }
        if let Some(limit) = query.limit.filter(|l| *l != 0) {
            request = request.with_param("limit", limit.to_string());
        }
        if let Some(step) = non_empty(query.step.as_deref()) {
            request = request.with_param("step", step);
        }
        if let Some(direction) = query.direction {
            request = request.with_param("direction", direction.to_string());
        }

        tracing::info!(logql = %query.query, "Log range query");

        self.query_range(request).await
    }

    /// Lists all log label names.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend call fails or the listing cannot be decoded.
    pub async fn loki_labels(&self) -> Result<Vec<String>, GatewayError> {
        self.label_list(BackendRequest::new(
            Backend::Loki,
            self.endpoints.url(Backend::Loki, "labels"),
        ))
        .await
    }

    /// Lists the values of log label `label`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend call fails or the listing cannot be decoded.
    pub async fn loki_label_values(&self, label: &str) -> Result<Vec<String>, GatewayError> {
        self.label_list(BackendRequest::new(
            Backend::Loki,
            self.endpoints.url(Backend::Loki, &label_values_path(label)),
        ))
        .await
    }

    /// Lists the label sets of log streams matching `selector`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend call fails or the listing cannot be decoded.
    pub async fn loki_series(&self, selector: &str) -> Result<Vec<LabelSet>, GatewayError> {
        tracing::info!(%selector, "Streams matching selector");

        self.series_list(
            BackendRequest::new(Backend::Loki, self.endpoints.url(Backend::Loki, "series"))
                .with_param("match[]", selector),
        )
        .await
    }

    /// Runs a metric range query, resolving the window against `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend call fails or its response cannot be normalized.
    pub async fn prometheus_query_range(
        &self,
        query: &QueryDescriptor,
        now: DateTime<Utc>,
    ) -> Result<NormalizedResult, GatewayError> {
        let resolution = resolve_range(
            query.start.as_deref(),
            query.end.as_deref(),
            query.step.as_deref(),
            now,
            &self.window,
        );
        resolution.log();

        let range = resolution.range;
        tracing::info!(
            promql = %query.query,
            start = %range.start,
            end = %range.end,
            step = %range.step,
            "Metric range query"
        );

        let request = BackendRequest::new(
            Backend::Prometheus,
            self.endpoints.url(Backend::Prometheus, "query_range"),
        )
        .with_param("query", query.query.as_str())
        .with_param("start", range.start)
        .with_param("end", range.end)
        .with_param("step", range.step);

        self.query_range(request).await
    }

    /// Lists all metric label names.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend call fails or the listing cannot be decoded.
    pub async fn prometheus_labels(&self) -> Result<Vec<String>, GatewayError> {
        self.label_list(BackendRequest::new(
            Backend::Prometheus,
            self.endpoints.url(Backend::Prometheus, "labels"),
        ))
        .await
    }

    /// Lists the values of metric label `label`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend call fails or the listing cannot be decoded.
    pub async fn prometheus_label_values(&self, label: &str) -> Result<Vec<String>, GatewayError> {
        self.label_list(BackendRequest::new(
            Backend::Prometheus,
            self.endpoints
                .url(Backend::Prometheus, &label_values_path(label)),
        ))
        .await
    }

    /// Lists every metric name.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend call fails or the listing cannot be decoded.
    pub async fn prometheus_metric_names(&self) -> Result<Vec<String>, GatewayError> {
        self.prometheus_label_values(METRIC_NAME_LABEL).await
    }

    /// Lists the label sets of series matching `metric`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend call fails or the listing cannot be decoded.
    pub async fn prometheus_series(&self, metric: &str) -> Result<Vec<LabelSet>, GatewayError> {
        tracing::info!(%metric, "Series matching metric");

        self.series_list(
            BackendRequest::new(
                Backend::Prometheus,
                self.endpoints.url(Backend::Prometheus, "series"),
            )
            .with_param("match[]", metric),
        )
        .await
    }

    /// Fetches a trace by id and returns its `trace` object as received.
    ///
    /// A missing trace (HTTP 404, or a body without a `trace` object) yields an empty
    /// map.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend call fails or the body is not JSON.
    pub async fn tempo_trace(&self, trace_id: &str) -> Result<Map<String, Value>, GatewayError> {
        tracing::info!(%trace_id, "Trace lookup");

        let path = format!("v2/traces/{}", urlencoding::encode(trace_id));
        let request = BackendRequest::new(Backend::Tempo, self.endpoints.url(Backend::Tempo, &path));

        let body = match self.executor.execute(request).await {
            Ok(body) => body,
            Err(BackendError::Status { status: 404, .. }) => {
                tracing::info!(%trace_id, "Trace not found");
                return Ok(Map::new());
            }
            Err(err) => return Err(err.into()),
        };

        let envelope: TraceEnvelope = serde_json::from_slice(&body).map_err(|e| {
            GatewayError::from_normalize(Backend::Tempo, NormalizeError::InvalidEnvelope(e))
        })?;

        Ok(envelope.trace.unwrap_or_default())
    }

    async fn query_range(&self, request: BackendRequest) -> Result<NormalizedResult, GatewayError> {
        let backend = request.backend;
        let body = self.executor.execute(request).await?;

        let result = normalize_response(&body, self.unknown_shape)
            .map_err(|e| GatewayError::from_normalize(backend, e))?;

        tracing::debug!(
            %backend,
            kind = %result.kind(),
            series = result.series().len(),
            entries = result.entry_count(),
            "Normalized range query result"
        );

        Ok(result)
    }

    async fn label_list(&self, request: BackendRequest) -> Result<Vec<String>, GatewayError> {
        let backend = request.backend;
        let body = self.executor.execute(request).await?;
        normalize_label_list(&body).map_err(|e| GatewayError::from_normalize(backend, e))
    }

    async fn series_list(&self, request: BackendRequest) -> Result<Vec<LabelSet>, GatewayError> {
        let backend = request.backend;
        let body = self.executor.execute(request).await?;
        normalize_series_list(&body).map_err(|e| GatewayError::from_normalize(backend, e))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn label_values_path(label: &str) -> String {
    format!("label/{}/values", urlencoding::encode(label))
}
