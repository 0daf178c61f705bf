//! Backend identity and result-shape policy.

use serde::{Deserialize, Serialize};

/// The observability backends the gateway fronts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Log store queried with `LogQL`.
    Loki,
    /// Metric store queried with `PromQL`.
    Prometheus,
    /// Trace store queried by trace id.
    Tempo,
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Loki => write!(f, "loki"),
            Self::Prometheus => write!(f, "prometheus"),
            Self::Tempo => write!(f, "tempo"),
        }
    }
}

/// What the normalizer does with a `resultType` it does not recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownShapePolicy {
    /// Treat the payload as an empty result and log a warning.
    #[default]
    Empty,
    /// Fail the request with an unknown-shape error.
    Reject,
}

impl UnknownShapePolicy {
    /// Maps the strict-mode flag onto a policy.
    ///
    /// # Examples
    ///
    /// ```
    /// use shared::config::UnknownShapePolicy;
    ///
    /// assert_eq!(UnknownShapePolicy::from_strict(true), UnknownShapePolicy::Reject);
    /// assert_eq!(UnknownShapePolicy::from_strict(false), UnknownShapePolicy::Empty);
    /// ```
    #[must_use]
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            Self::Reject
        } else {
            Self::Empty
        }
    }
}
