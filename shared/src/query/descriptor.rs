//! Caller query descriptions.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Order in which log lines are returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Oldest lines first.
    Forward,
    /// Newest lines first.
    Backward,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Forward => write!(f, "forward"),
            Self::Backward => write!(f, "backward"),
        }
    }
}

/// Error returned when a direction string is neither `forward` nor `backward`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown direction '{0}', expected 'forward' or 'backward'")]
pub struct ParseDirectionError(pub String);

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "forward" => Ok(Self::Forward),
            "backward" => Ok(Self::Backward),
            other => Err(ParseDirectionError(other.to_string())),
        }
    }
}

/// A range query as described by the caller, before any resolution.
///
/// # Example
///
/// ```
/// use shared::query::{Direction, QueryDescriptor};
///
/// let query = QueryDescriptor::new(r#"{app="api"} |= "error""#)
///     .with_start("1750000000")
///     .with_limit(100)
///     .with_direction(Direction::Forward);
///
/// assert_eq!(query.start.as_deref(), Some("1750000000"));
/// assert!(query.end.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryDescriptor {
    /// The query text in the backend's query language.
    pub query: String,

    /// Range start as supplied by the caller.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,

    /// Range end as supplied by the caller.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,

    /// Resolution step as supplied by the caller.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<String>,

    /// Maximum number of entries to return. Zero means unset; other values,
    /// negative ones included, are left to the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,

    /// Log line ordering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
}

impl QueryDescriptor {
    /// Creates a descriptor with only the query text set.
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    /// Sets the range start.
    #[must_use]
    pub fn with_start(mut self, start: impl Into<String>) -> Self {
        self.start = Some(start.into());
        self
    }

    /// Sets the range end.
    #[must_use]
    pub fn with_end(mut self, end: impl Into<String>) -> Self {
        self.end = Some(end.into());
        self
    }

    /// Sets the resolution step.
    #[must_use]
    pub fn with_step(mut self, step: impl Into<String>) -> Self {
        self.step = Some(step.into());
        self
    }

    /// Sets the entry limit.
    #[must_use]
    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the log line ordering.
    #[must_use]
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }
}
