//! Backend query envelope and discriminated payload decoding.
//!
//! Both the log and the metric backend answer range queries with
//! `{"status": ..., "data": {"resultType": ..., "result": [...]}}`. The shape of
//! `result` depends on `resultType`, so decoding happens in two steps: the envelope
//! first, then the `result` array against the shape its discriminator claims.

use super::NormalizeError;
use crate::models::LabelSet;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Discriminator value for log streams.
pub const STREAMS: &str = "streams";

/// Discriminator value for metric matrices.
pub const MATRIX: &str = "matrix";

/// The outer envelope shared by query and listing responses.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub status: Option<String>,
    pub data: Option<T>,
    #[serde(rename = "errorType")]
    pub error_type: Option<String>,
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    /// Fails if the backend flagged the response as an error.
    ///
    /// A missing `status` is accepted; only an explicit non-`success` value fails.
    pub(crate) fn into_data(self) -> Result<Option<T>, NormalizeError> {
        match self.status.as_deref() {
            None | Some("success") => Ok(self.data),
            Some(_) => Err(NormalizeError::BackendStatus {
                error_type: self.error_type.unwrap_or_else(|| "unknown".to_string()),
                message: self.error.unwrap_or_else(|| "Unknown error".to_string()),
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct QueryData {
    #[serde(default, rename = "resultType")]
    result_type: Option<String>,
    #[serde(default)]
    result: Value,
}

/// One log stream: a label set and `[timestamp, line]` pairs.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LogStream {
    /// Stream labels.
    pub stream: LabelSet,
    /// `[timestamp, line]` pairs in backend order.
    #[serde(deserialize_with = "entry_pairs")]
    pub values: Vec<(Value, String)>,
}

/// One metric series: a label set and `[timestamp, value]` pairs.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MetricSeries {
    /// Series labels.
    pub metric: LabelSet,
    /// `[timestamp, numeric string]` pairs in backend order.
    #[serde(deserialize_with = "entry_pairs")]
    pub values: Vec<(Value, String)>,
}

/// Reads `[timestamp, value, ...]` rows, keeping the first two elements.
///
/// Loki appends a structured-metadata object as a third element when it has one.
fn entry_pairs<'de, D>(deserializer: D) -> Result<Vec<(Value, String)>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let rows = Vec::<Vec<Value>>::deserialize(deserializer)?;

    rows.into_iter()
        .enumerate()
        .map(|(index, row)| {
            let mut fields = row.into_iter();
            match (fields.next(), fields.next()) {
                (Some(timestamp), Some(Value::String(value))) => Ok((timestamp, value)),
                (Some(_), Some(other)) => Err(D::Error::custom(format!(
                    "entry {index}: expected a string value, found {other}"
                ))),
                _ => Err(D::Error::custom(format!(
                    "entry {index}: expected at least [timestamp, value]"
                ))),
            }
        })
        .collect()
}

/// A decoded query payload, one variant per recognized discriminator.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendPayload {
    /// `resultType = streams`.
    Streams(Vec<LogStream>),
    /// `resultType = matrix`.
    Matrix(Vec<MetricSeries>),
    /// Any other discriminator, or none (`None`).
    Unknown(Option<String>),
}

impl BackendPayload {
    /// Decodes a raw backend response body.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The body is not a JSON query envelope
    /// - The backend reported a non-success status
    /// - `result` does not match the shape its `resultType` claims
    ///
    /// # Example
    ///
    /// ```
    /// use shared::normalize::BackendPayload;
    ///
    /// let body = br#"{"status":"success","data":{"resultType":"matrix","result":[]}}"#;
    /// assert_eq!(BackendPayload::decode(body).unwrap(), BackendPayload::Matrix(Vec::new()));
    /// ```
    pub fn decode(body: &[u8]) -> Result<Self, NormalizeError> {
        let envelope: Envelope<QueryData> =
            serde_json::from_slice(body).map_err(NormalizeError::InvalidEnvelope)?;

        let Some(data) = envelope.into_data()? else {
            return Ok(Self::Unknown(None));
        };

        match data.result_type.as_deref() {
            Some(STREAMS) => serde_json::from_value(data.result)
                .map(Self::Streams)
                .map_err(|source| NormalizeError::Decode {
                    shape: STREAMS,
                    source,
                }),
            Some(MATRIX) => serde_json::from_value(data.result)
                .map(Self::Matrix)
                .map_err(|source| NormalizeError::Decode {
                    shape: MATRIX,
                    source,
                }),
            _ => Ok(Self::Unknown(data.result_type)),
        }
    }
}
