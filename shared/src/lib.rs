//! O11y Gateway Shared Library
//!
//! This crate contains the request sanitization and response normalization logic
//! used by the O11y Gateway in front of log, metric and trace backends.
//!
//! # Modules
//!
//! - [`config`] - Plausible-date window, backend identity, unknown-shape policy
//! - [`query`] - Query descriptions, timestamp classification, range resolution
//! - [`models`] - The normalized result shape
//! - [`normalize`] - Decoding backend payloads into the normalized shape
//!
//! # Example
//!
//! ```
//! use chrono::Utc;
//! use shared::config::{PlausibleWindow, UnknownShapePolicy};
//! use shared::models::ResultKind;
//! use shared::normalize::normalize_response;
//! use shared::query::resolve_range;
//!
//! let resolution = resolve_range(Some("1750000000"), None, None, Utc::now(), &PlausibleWindow::default());
//! assert_eq!(resolution.range.start, "1750000000");
//! assert_eq!(resolution.range.step, "600");
//!
//! let body = br#"{"status":"success","data":{"resultType":"matrix","result":[]}}"#;
//! let result = normalize_response(body, UnknownShapePolicy::Empty).unwrap();
//! assert_eq!(result.kind(), ResultKind::Empty);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod models;
pub mod normalize;
pub mod query;

/// Re-export common dependencies for convenience.
pub use chrono;
pub use serde;
pub use serde_json;
