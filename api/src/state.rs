//! Application state module.
//!
//! Defines the shared application state that is passed to route handlers.

use crate::config::Config;
use crate::executor::{BackendError, BackendExecutor, HttpExecutor};
use crate::gateway::Gateway;
use std::sync::Arc;

/// Application state shared across all request handlers.
///
/// Holds only read-only resources: the gateway and, through it, the backend
/// addresses, the executor and the normalization settings.
#[derive(Clone)]
pub struct AppState {
    gateway: Arc<Gateway>,
}

impl AppState {
    /// Creates a new application state around `gateway`.
    #[must_use]
    pub fn new(gateway: Gateway) -> Self {
        Self {
            gateway: Arc::new(gateway),
        }
    }

    /// Creates a state whose gateway sends backend calls through `executor`.
    ///
    /// This is useful for testing with a canned executor.
    #[must_use]
    pub fn with_executor(config: &Config, executor: Arc<dyn BackendExecutor>) -> Self {
        Self::new(Gateway::new(config, executor))
    }

    /// Creates a state that talks to the configured backends over HTTP.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn from_config(config: &Config) -> Result<Self, BackendError> {
        let executor = HttpExecutor::new(config.backend_timeout)?;
        Ok(Self::with_executor(config, Arc::new(executor)))
    }

    /// Returns a reference to the gateway.
    #[must_use]
    pub fn gateway(&self) -> &Gateway {
        self.gateway.as_ref()
    }
}
