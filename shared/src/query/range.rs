//! Range parameter resolution.
//!
//! Turns the raw `start`, `end` and `step` strings of a range query into values a
//! backend will accept. Resolution never fails: absent or invalid input falls back to
//! a default, and every replaced value is reported as a [`RangeWarning`].

use super::timestamp::classify;
use crate::config::PlausibleWindow;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Step used when the caller supplies none, in seconds (10 minutes).
pub const DEFAULT_STEP: &str = "600";

/// How far back the default `start` reaches from `now`, in seconds.
pub const DEFAULT_LOOKBACK_SECS: i64 = 60 * 60;

/// A backend-ready time window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedRange {
    /// Range start, either the caller's value or an epoch-seconds default.
    pub start: String,
    /// Range end, either the caller's value or an epoch-seconds default.
    pub end: String,
    /// Resolution step in seconds.
    pub step: String,
}

/// Which range parameter a fallback decision applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeParam {
    /// The `start` parameter.
    Start,
    /// The `end` parameter.
    End,
    /// The `step` parameter.
    Step,
}

impl std::fmt::Display for RangeParam {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Start => write!(f, "start"),
            Self::End => write!(f, "end"),
            Self::Step => write!(f, "step"),
        }
    }
}

/// A value the caller supplied that was replaced by its default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RangeWarning {
    /// The parameter that was replaced.
    pub param: RangeParam,
    /// The rejected input, verbatim.
    pub rejected: String,
    /// The default substituted for it.
    pub substituted: String,
}

impl std::fmt::Display for RangeWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} format ({}) is invalid, using default {}",
            self.param, self.rejected, self.substituted
        )
    }
}

/// Outcome of resolving a range: the window plus any non-fatal warnings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RangeResolution {
    /// The fully populated window.
    pub range: ResolvedRange,
    /// One warning per supplied value that was replaced.
    pub warnings: Vec<RangeWarning>,
    /// Parameters that were absent and took their default.
    pub defaulted: Vec<RangeParam>,
}

impl RangeResolution {
    /// Emits the defaulting decisions and warnings as tracing events.
    pub fn log(&self) {
        for param in &self.defaulted {
            tracing::info!(%param, "Parameter not set, using default");
        }
        for warning in &self.warnings {
            tracing::warn!(
                param = %warning.param,
                rejected = %warning.rejected,
                substituted = %warning.substituted,
                "Invalid range parameter replaced by default"
            );
        }
    }
}

/// Resolves raw range parameters against the wall-clock time `now`.
///
/// Empty strings count as absent.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use shared::config::PlausibleWindow;
/// use shared::query::resolve_range;
///
/// let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
/// let resolution = resolve_range(None, Some("bogus"), Some("30"), now, &PlausibleWindow::default());
///
/// assert_eq!(resolution.range.start, (now.timestamp() - 3600).to_string());
/// assert_eq!(resolution.range.end, now.timestamp().to_string());
/// assert_eq!(resolution.range.step, "30");
/// assert_eq!(resolution.warnings.len(), 1);
/// ```
#[must_use]
pub fn resolve_range(
    start: Option<&str>,
    end: Option<&str>,
    step: Option<&str>,
    now: DateTime<Utc>,
    window: &PlausibleWindow,
) -> RangeResolution {
    let mut warnings = Vec::new();
    let mut defaulted = Vec::new();

    let default_start = (now - Duration::seconds(DEFAULT_LOOKBACK_SECS))
        .timestamp()
        .to_string();
    let default_end = now.timestamp().to_string();

    let start = resolve_timestamp(
        RangeParam::Start,
        start,
        default_start,
        window,
        &mut warnings,
        &mut defaulted,
    );
    let end = resolve_timestamp(
        RangeParam::End,
        end,
        default_end,
        window,
        &mut warnings,
        &mut defaulted,
    );
    let step = resolve_step(step, &mut warnings, &mut defaulted);

    RangeResolution {
        range: ResolvedRange { start, end, step },
        warnings,
        defaulted,
    }
}

fn resolve_timestamp(
    param: RangeParam,
    raw: Option<&str>,
    default: String,
    window: &PlausibleWindow,
    warnings: &mut Vec<RangeWarning>,
    defaulted: &mut Vec<RangeParam>,
) -> String {
    match raw.filter(|s| !s.is_empty()) {
        None => {
            defaulted.push(param);
            default
        }
        Some(value) if classify(&param.to_string(), value, window) => value.to_string(),
        Some(value) => {
            warnings.push(RangeWarning {
                param,
                rejected: value.to_string(),
                substituted: default.clone(),
            });
            default
        }
    }
}

fn resolve_step(
    raw: Option<&str>,
    warnings: &mut Vec<RangeWarning>,
    defaulted: &mut Vec<RangeParam>,
) -> String {
    match raw.filter(|s| !s.is_empty()) {
        None => {
            defaulted.push(RangeParam::Step);
            DEFAULT_STEP.to_string()
        }
        Some(value) if value.parse::<i64>().is_ok_and(|n| n > 0) => value.to_string(),
        Some(value) => {
            warnings.push(RangeWarning {
                param: RangeParam::Step,
                rejected: value.to_string(),
                substituted: DEFAULT_STEP.to_string(),
            });
            DEFAULT_STEP.to_string()
        }
    }
}
