//! Response bodies shared by the backend routes.

use serde::Serialize;
use serde_json::{Map, Value};
use shared::models::NormalizedResult;

/// Hint returned alongside an empty range query or listing.
pub const NO_DATA_MESSAGE: &str = "No data found. Try different search conditions \
    (the query may name a label that does not exist; check the available labels).";

/// Hint returned when the trace backend has no trace under the requested id.
pub const NO_TRACE_MESSAGE: &str = "No data exists for this trace id.";

/// Body of a range query response: the normalized result plus an optional hint.
#[derive(Debug, Serialize)]
pub struct QueryRangeResponse {
    /// The normalized result, flattened into `kind` and `series`.
    #[serde(flatten)]
    pub result: NormalizedResult,
    /// Set when the result is empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl From<NormalizedResult> for QueryRangeResponse {
    fn from(result: NormalizedResult) -> Self {
        let message = result.is_empty().then_some(NO_DATA_MESSAGE);
        Self { result, message }
    }
}

/// Body of a label or series listing.
#[derive(Debug, Serialize)]
pub struct ListingResponse<T> {
    /// The listed items in backend order.
    pub data: Vec<T>,
    /// Set when the listing is empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl<T> From<Vec<T>> for ListingResponse<T> {
    fn from(data: Vec<T>) -> Self {
        let message = data.is_empty().then_some(NO_DATA_MESSAGE);
        Self { data, message }
    }
}

/// Body of a trace lookup: the trace object as the backend returned it.
#[derive(Debug, Serialize)]
pub struct TraceResponse {
    /// The trace, untouched.
    pub trace: Map<String, Value>,
    /// Set when no trace was found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl From<Map<String, Value>> for TraceResponse {
    fn from(trace: Map<String, Value>) -> Self {
        let message = trace.is_empty().then_some(NO_TRACE_MESSAGE);
        Self { trace, message }
    }
}
