//! Query descriptions and range sanitization.
//!
//! This module holds the caller-facing query description, the timestamp classifier
//! that recognizes RFC3339 and Unix epoch instants, and the resolver that turns raw
//! `start`/`end`/`step` strings into a backend-ready window.
//!
//! # Example
//!
//! ```
//! use chrono::Utc;
//! use shared::config::PlausibleWindow;
//! use shared::query::{classify, resolve_range};
//!
//! let window = PlausibleWindow::default();
//! assert!(classify("start", "2025-03-01T00:00:00Z", &window));
//!
//! let resolution = resolve_range(None, None, Some("0"), Utc::now(), &window);
//! assert_eq!(resolution.range.step, "600");
//! ```

mod descriptor;
mod range;
mod timestamp;

pub use descriptor::{Direction, ParseDirectionError, QueryDescriptor};
pub use range::{
    resolve_range, RangeParam, RangeResolution, RangeWarning, ResolvedRange,
    DEFAULT_LOOKBACK_SECS, DEFAULT_STEP,
};
pub use timestamp::{classify, classify_format, TimestampFormat};
