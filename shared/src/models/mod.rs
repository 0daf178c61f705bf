//! Data models for normalized query results.
//!
//! This module contains the backend-agnostic result shape the gateway returns for
//! log and metric range queries.

pub mod result;

pub use result::{
    LabelSet, NormalizedEntry, NormalizedResult, NormalizedSeries, ResultKind, ResultShapeError,
};
