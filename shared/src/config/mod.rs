//! Configuration values consumed by the core.
//!
//! This module contains the plausible-date window used by timestamp classification
//! and the policy applied to unrecognized backend result shapes.

pub mod backend;
pub mod window;

pub use backend::{Backend, UnknownShapePolicy};
pub use window::{PlausibleWindow, DEFAULT_WINDOW_END_SECS, DEFAULT_WINDOW_START_SECS};
