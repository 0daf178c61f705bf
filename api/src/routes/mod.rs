//! API route definitions.
//!
//! This module organizes all HTTP routes for the gateway: one module per backend
//! plus the health check.

mod health;
mod loki;
mod params;
mod prometheus;
mod response;
mod tempo;

pub use health::health_routes;
pub use loki::loki_routes;
pub use prometheus::prometheus_routes;
pub use response::{
    ListingResponse, QueryRangeResponse, TraceResponse, NO_DATA_MESSAGE, NO_TRACE_MESSAGE,
};
pub use tempo::tempo_routes;
