//! Result shape normalization.
//!
//! Collapses the log backend's `streams` payloads and the metric backend's `matrix`
//! payloads into one [`NormalizedResult`]. Order is preserved exactly: no sorting,
//! deduplication, filtering or truncation happens here.
//!
//! A payload that claims a known shape but fails to decode is an error, never an
//! empty result. Unrecognized shapes follow the configured [`UnknownShapePolicy`].
//!
//! # Example
//!
//! ```
//! use shared::config::UnknownShapePolicy;
//! use shared::models::ResultKind;
//! use shared::normalize::normalize_response;
//!
//! let body = br#"{
//!     "status": "success",
//!     "data": {
//!         "resultType": "streams",
//!         "result": [{"stream": {"app": "api"}, "values": [["1750000000000000000", "boot"]]}]
//!     }
//! }"#;
//!
//! let result = normalize_response(body, UnknownShapePolicy::Empty).unwrap();
//! assert_eq!(result.kind(), ResultKind::Log);
//! assert_eq!(result.series()[0].entries[0].value, "boot");
//! ```

mod labels;
mod payload;

pub use labels::{normalize_label_list, normalize_series_list};
pub use payload::{BackendPayload, LogStream, MetricSeries, MATRIX, STREAMS};

use crate::config::UnknownShapePolicy;
use crate::models::{LabelSet, NormalizedEntry, NormalizedResult, NormalizedSeries, ResultKind};
use thiserror::Error;

/// Errors raised while turning a backend body into a normalized value.
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// The body is not a JSON envelope at all.
    #[error("Backend response is not a valid JSON envelope: {0}")]
    InvalidEnvelope(#[source] serde_json::Error),

    /// The backend answered with a non-success status.
    #[error("Backend reported an error ({error_type}): {message}")]
    BackendStatus {
        /// The backend's `errorType`.
        error_type: String,
        /// The backend's `error` text.
        message: String,
    },

    /// The payload claims `shape` but does not decode as it.
    #[error("Failed to decode '{shape}' result: {source}")]
    Decode {
        /// The shape the payload claimed.
        shape: &'static str,
        /// The underlying decode failure.
        #[source]
        source: serde_json::Error,
    },

    /// The discriminator is not recognized and the policy rejects it.
    #[error("Unrecognized result type '{0}'")]
    UnknownShape(String),
}

/// Projects a decoded payload onto the uniform result shape.
///
/// # Errors
///
/// Returns [`NormalizeError::UnknownShape`] if the payload has an unrecognized
/// discriminator and `policy` is [`UnknownShapePolicy::Reject`].
pub fn normalize(
    payload: BackendPayload,
    policy: UnknownShapePolicy,
) -> Result<NormalizedResult, NormalizeError> {
    let result = match payload {
        BackendPayload::Streams(streams) => NormalizedResult::from_series(
            ResultKind::Log,
            streams
                .into_iter()
                .map(|s| project(s.stream, s.values))
                .collect(),
        ),
        BackendPayload::Matrix(matrix) => NormalizedResult::from_series(
            ResultKind::Metric,
            matrix
                .into_iter()
                .map(|s| project(s.metric, s.values))
                .collect(),
        ),
        BackendPayload::Unknown(result_type) => {
            let result_type = result_type.unwrap_or_default();
            match policy {
                UnknownShapePolicy::Empty => {
                    tracing::warn!(
                        result_type = %result_type,
                        "Unrecognized result type, returning empty result"
                    );
                    NormalizedResult::empty()
                }
                UnknownShapePolicy::Reject => {
                    return Err(NormalizeError::UnknownShape(result_type));
                }
            }
        }
    };

    Ok(result)
}

/// Decodes and normalizes a raw backend response body.
///
/// # Errors
///
/// Returns an error if the body cannot be decoded (see [`BackendPayload::decode`]) or
/// its shape is rejected by `policy`.
pub fn normalize_response(
    body: &[u8],
    policy: UnknownShapePolicy,
) -> Result<NormalizedResult, NormalizeError> {
    normalize(BackendPayload::decode(body)?, policy)
}

fn project(labels: LabelSet, values: Vec<(serde_json::Value, String)>) -> NormalizedSeries {
    NormalizedSeries {
        labels,
        entries: values
            .into_iter()
            .map(|(timestamp, value)| NormalizedEntry::new(timestamp, value))
            .collect(),
    }
}
