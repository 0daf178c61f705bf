//! Labels-only normalization.
//!
//! Label-name, label-value and series-selector listings carry no timestamps and no
//! discriminator: `data` is either a list of strings or a list of label sets.

use super::payload::Envelope;
use super::NormalizeError;
use crate::models::LabelSet;
use serde::de::DeserializeOwned;
use serde_json::Value;

fn decode_listing<T: DeserializeOwned>(
    body: &[u8],
    shape: &'static str,
) -> Result<Vec<T>, NormalizeError> {
    let envelope: Envelope<Value> =
        serde_json::from_slice(body).map_err(NormalizeError::InvalidEnvelope)?;

    match envelope.into_data()? {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(data) => {
            serde_json::from_value(data).map_err(|source| NormalizeError::Decode { shape, source })
        }
    }
}

/// Normalizes a label-name or label-value listing into a flat list.
///
/// A missing or `null` `data` field yields an empty list. Backend order is kept.
///
/// # Errors
///
/// Returns an error if the body is not an envelope, reports a failure, or its `data`
/// is not a list of strings.
///
/// # Example
///
/// ```
/// use shared::normalize::normalize_label_list;
///
/// let labels = normalize_label_list(br#"{"status":"success","data":["job","app"]}"#).unwrap();
/// assert_eq!(labels, vec!["job", "app"]);
/// ```
pub fn normalize_label_list(body: &[u8]) -> Result<Vec<String>, NormalizeError> {
    decode_listing(body, "labels")
}

/// Normalizes a series listing into a list of label sets.
///
/// # Errors
///
/// Returns an error if the body is not an envelope, reports a failure, or its `data`
/// is not a list of string-to-string maps.
pub fn normalize_series_list(body: &[u8]) -> Result<Vec<LabelSet>, NormalizeError> {
    decode_listing(body, "series")
}
