//! Timestamp classification.
//!
//! Decides whether a caller-supplied string is an instant the backends can accept.
//! Three forms are tried in order and the first match wins:
//!
//! 1. RFC3339, accepted whenever it parses in the strict form (uppercase `T`
//!    separator, `Z` or `±hh:mm` offset)
//! 2. an integer read as Unix seconds inside the plausible-date window
//! 3. the same integer read as Unix milliseconds inside the scaled window

use crate::config::PlausibleWindow;
use chrono::DateTime;
use serde::Serialize;

/// The form a timestamp string was recognized as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampFormat {
    /// An RFC3339 date-time such as `2025-06-01T12:00:00Z`.
    Rfc3339,
    /// Integer Unix seconds.
    UnixSeconds,
    /// Integer Unix milliseconds.
    UnixMillis,
}

impl std::fmt::Display for TimestampFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rfc3339 => write!(f, "RFC3339"),
            Self::UnixSeconds => write!(f, "Unix timestamp (seconds)"),
            Self::UnixMillis => write!(f, "Unix timestamp (milliseconds)"),
        }
    }
}

/// Classifies `raw` against `window`, returning the matching format.
///
/// # Examples
///
/// ```
/// use shared::config::PlausibleWindow;
/// use shared::query::{classify_format, TimestampFormat};
///
/// let window = PlausibleWindow::default();
/// assert_eq!(
///     classify_format("2025-06-01T00:00:00Z", &window),
///     Some(TimestampFormat::Rfc3339)
/// );
/// assert_eq!(
///     classify_format("1750000000", &window),
///     Some(TimestampFormat::UnixSeconds)
/// );
/// assert_eq!(
///     classify_format("1750000000000", &window),
///     Some(TimestampFormat::UnixMillis)
/// );
/// assert_eq!(classify_format("yesterday", &window), None);
/// ```
#[must_use]
pub fn classify_format(raw: &str, window: &PlausibleWindow) -> Option<TimestampFormat> {
    if is_strict_rfc3339(raw) {
        return Some(TimestampFormat::Rfc3339);
    }

    // One integer parse serves both the seconds and the milliseconds checks.
    let value = raw.parse::<i64>().ok()?;

    if window.contains_secs(value) {
        return Some(TimestampFormat::UnixSeconds);
    }
    if window.contains_millis(value) {
        return Some(TimestampFormat::UnixMillis);
    }
    None
}

/// Parses `raw` as RFC3339 without the lenient forms chrono allows.
///
/// chrono also takes a space or lowercase `t` separator and a lowercase `z`; the
/// backends parse the strict layout only and reject those.
fn is_strict_rfc3339(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    if bytes.get(10) != Some(&b'T') {
        return false;
    }

    let offset_ok = match bytes.last() {
        Some(b'Z') => true,
        _ => bytes.len().checked_sub(6).is_some_and(|at| {
            matches!(bytes[at], b'+' | b'-') && bytes[at + 3] == b':'
        }),
    };

    offset_ok && DateTime::parse_from_rfc3339(raw).is_ok()
}

/// Reports whether `raw` is an acceptable instant expression.
///
/// `param` names the parameter being checked and only feeds the diagnostic event.
#[must_use]
pub fn classify(param: &str, raw: &str, window: &PlausibleWindow) -> bool {
    match classify_format(raw, window) {
        Some(format) => {
            tracing::debug!(param, %format, "Timestamp format recognized");
            true
        }
        None => false,
    }
}
