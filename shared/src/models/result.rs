//! Normalized query result model.
//!
//! Log streams and metric matrices collapse into the same shape: a list of series,
//! each a label set plus ordered `(timestamp, value)` entries. The `kind` tag records
//! which backend shape produced the series and is `empty` exactly when there are none.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// A label set attached to a stream or series.
pub type LabelSet = BTreeMap<String, String>;

/// Which payload shape a normalized result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    /// Log streams (`resultType = streams`).
    Log,
    /// Metric series (`resultType = matrix`).
    Metric,
    /// No series at all.
    Empty,
}

impl std::fmt::Display for ResultKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Log => write!(f, "log"),
            Self::Metric => write!(f, "metric"),
            Self::Empty => write!(f, "empty"),
        }
    }
}

/// A single observation point.
///
/// Both fields are kept as raw JSON: log entries carry a nanosecond string timestamp
/// and a log line, metric entries carry a float timestamp and a numeric string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedEntry {
    /// The entry timestamp, exactly as the backend sent it.
    pub timestamp: Value,
    /// The log line or sample value, exactly as the backend sent it.
    pub value: Value,
}

impl NormalizedEntry {
    /// Creates a new entry.
    #[must_use]
    pub fn new(timestamp: impl Into<Value>, value: impl Into<Value>) -> Self {
        Self {
            timestamp: timestamp.into(),
            value: value.into(),
        }
    }
}

/// A labeled, ordered sequence of entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedSeries {
    /// Labels identifying the stream or series.
    pub labels: LabelSet,
    /// Entries in backend order.
    pub entries: Vec<NormalizedEntry>,
}

/// Errors raised when a result would break the kind/series invariant.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResultShapeError {
    /// `kind` is `empty` but series are present.
    #[error("Result of kind 'empty' cannot carry {0} series")]
    SeriesOnEmpty(usize),

    /// `kind` is `log` or `metric` but no series are present.
    #[error("Result of kind '{0}' must carry at least one series")]
    NoSeries(ResultKind),
}

/// The backend-agnostic result handed to the response writer.
///
/// # Example
///
/// ```
/// use shared::models::{NormalizedResult, NormalizedSeries, ResultKind};
///
/// let empty = NormalizedResult::from_series(ResultKind::Metric, Vec::new());
/// assert_eq!(empty.kind(), ResultKind::Empty);
/// assert!(empty.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedResult")]
pub struct NormalizedResult {
    kind: ResultKind,
    series: Vec<NormalizedSeries>,
}

impl NormalizedResult {
    /// Returns a result with no series.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            kind: ResultKind::Empty,
            series: Vec::new(),
        }
    }

    /// Builds a result of `kind` from `series`.
    ///
    /// An empty `series` always yields an `empty` result regardless of `kind`.
    #[must_use]
    pub fn from_series(kind: ResultKind, series: Vec<NormalizedSeries>) -> Self {
        if series.is_empty() {
            return Self::empty();
        }
        Self { kind, series }
    }

    /// Returns the result kind.
    #[must_use]
    pub fn kind(&self) -> ResultKind {
        self.kind
    }

    /// Returns the series in backend order.
    #[must_use]
    pub fn series(&self) -> &[NormalizedSeries] {
        &self.series
    }

    /// Returns true if the result holds no series.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kind == ResultKind::Empty
    }

    /// Total number of entries across all series.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.series.iter().map(|s| s.entries.len()).sum()
    }
}

impl Default for NormalizedResult {
    fn default() -> Self {
        Self::empty()
    }
}

#[derive(Deserialize)]
struct UncheckedResult {
    kind: ResultKind,
    #[serde(default)]
    series: Vec<NormalizedSeries>,
}

impl TryFrom<UncheckedResult> for NormalizedResult {
    type Error = ResultShapeError;

    fn try_from(raw: UncheckedResult) -> Result<Self, Self::Error> {
        match (raw.kind, raw.series.is_empty()) {
            (ResultKind::Empty, false) => {
                Err(ResultShapeError::SeriesOnEmpty(raw.series.len()))
            }
            (ResultKind::Log | ResultKind::Metric, true) => {
                Err(ResultShapeError::NoSeries(raw.kind))
            }
            (kind, _) => Ok(Self {
                kind,
                series: raw.series,
            }),
        }
    }
}
