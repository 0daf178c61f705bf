//! Server configuration module.
//!
//! Handles loading configuration from environment variables with sensible defaults.

use anyhow::{Context, Result};
use shared::config::{
    Backend, PlausibleWindow, UnknownShapePolicy, DEFAULT_WINDOW_END_SECS,
    DEFAULT_WINDOW_START_SECS,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::time::Duration;

/// Default log backend API base.
pub const DEFAULT_LOKI_URL: &str = "http://loki:3100/loki/api/v1";
/// Default metric backend API base.
pub const DEFAULT_PROMETHEUS_URL: &str = "http://prometheus:9090/api/v1";
/// Default trace backend API base.
pub const DEFAULT_TEMPO_URL: &str = "http://tempo:3200/api";
/// Default upper bound on a single backend call.
pub const DEFAULT_BACKEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Base addresses of the backends, fixed for the process lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackendEndpoints {
    /// Log backend API base, e.g. `http://loki:3100/loki/api/v1`.
    pub loki: String,
    /// Metric backend API base, e.g. `http://prometheus:9090/api/v1`.
    pub prometheus: String,
    /// Trace backend API base, e.g. `http://tempo:3200/api`.
    pub tempo: String,
}

impl BackendEndpoints {
    /// Creates endpoints, dropping any trailing slashes.
    #[must_use]
    pub fn new(
        loki: impl Into<String>,
        prometheus: impl Into<String>,
        tempo: impl Into<String>,
    ) -> Self {
        Self {
            loki: trim_base(loki.into()),
            prometheus: trim_base(prometheus.into()),
            tempo: trim_base(tempo.into()),
        }
    }

    /// Returns the base address of `backend`.
    #[must_use]
    pub fn base(&self, backend: Backend) -> &str {
        match backend {
            Backend::Loki => &self.loki,
            Backend::Prometheus => &self.prometheus,
            Backend::Tempo => &self.tempo,
        }
    }

    /// Joins `path` onto the base address of `backend`.
    #[must_use]
    pub fn url(&self, backend: Backend, path: &str) -> String {
        format!("{}/{}", self.base(backend), path.trim_start_matches('/'))
    }
}

impl Default for BackendEndpoints {
    fn default() -> Self {
        Self::new(DEFAULT_LOKI_URL, DEFAULT_PROMETHEUS_URL, DEFAULT_TEMPO_URL)
    }
}

fn trim_base(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

/// Server configuration.
///
/// Configuration values can be set via environment variables:
/// - `GATEWAY_HOST`: The host address to bind to (default: "0.0.0.0")
/// - `GATEWAY_PORT`: The port to listen on (default: 8070)
/// - `GATEWAY_LOKI_URL`, `GATEWAY_PROMETHEUS_URL`, `GATEWAY_TEMPO_URL`: backend API bases
/// - `GATEWAY_BACKEND_TIMEOUT_SECS`: upper bound on each backend call (default: 10)
/// - `GATEWAY_WINDOW_START`, `GATEWAY_WINDOW_END`: plausible-date window in epoch seconds
/// - `GATEWAY_STRICT_RESULT_TYPE`: reject unrecognized result types (default: false)
#[derive(Debug, Clone)]
pub struct Config {
    /// The host address to bind to.
    pub host: String,
    /// The port to listen on.
    pub port: u16,
    /// Backend base addresses.
    pub backends: BackendEndpoints,
    /// Upper bound on each backend call.
    pub backend_timeout: Duration,
    /// Window used to disambiguate integer timestamps.
    pub window: PlausibleWindow,
    /// Handling of unrecognized `resultType` values.
    pub unknown_shape: UnknownShapePolicy,
}

impl Config {
    /// Creates a new configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `GATEWAY_PORT` is set but cannot be parsed as a valid port number
    /// - `GATEWAY_BACKEND_TIMEOUT_SECS` is set but is not a positive integer
    /// - `GATEWAY_WINDOW_START` or `GATEWAY_WINDOW_END` is not an integer, or the
    ///   resulting window is invalid
    /// - `GATEWAY_STRICT_RESULT_TYPE` is set but is not a boolean
    pub fn from_env() -> Result<Self> {
        let host = std::env::var("GATEWAY_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = parse_env::<u16>("GATEWAY_PORT")?.unwrap_or(8070);

        let backends = BackendEndpoints::new(
            std::env::var("GATEWAY_LOKI_URL").unwrap_or_else(|_| DEFAULT_LOKI_URL.to_string()),
            std::env::var("GATEWAY_PROMETHEUS_URL")
                .unwrap_or_else(|_| DEFAULT_PROMETHEUS_URL.to_string()),
            std::env::var("GATEWAY_TEMPO_URL").unwrap_or_else(|_| DEFAULT_TEMPO_URL.to_string()),
        );

        let backend_timeout = match parse_env::<u64>("GATEWAY_BACKEND_TIMEOUT_SECS")? {
            Some(0) => anyhow::bail!("GATEWAY_BACKEND_TIMEOUT_SECS must be greater than zero"),
            Some(secs) => Duration::from_secs(secs),
            None => DEFAULT_BACKEND_TIMEOUT,
        };

        let window = PlausibleWindow::new(
            parse_env::<i64>("GATEWAY_WINDOW_START")?.unwrap_or(DEFAULT_WINDOW_START_SECS),
            parse_env::<i64>("GATEWAY_WINDOW_END")?.unwrap_or(DEFAULT_WINDOW_END_SECS),
        );
        window
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid plausible-date window: {e}"))?;

        let strict = parse_env::<bool>("GATEWAY_STRICT_RESULT_TYPE")?.unwrap_or(false);

        Ok(Self {
            host,
            port,
            backends,
            backend_timeout,
            window,
            unknown_shape: UnknownShapePolicy::from_strict(strict),
        })
    }

    /// Returns the socket address for binding.
    ///
    /// # Errors
    ///
    /// Returns an error if the host is not an IP address.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid bind address {}:{}", self.host, self.port))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8070,
            backends: BackendEndpoints::default(),
            backend_timeout: DEFAULT_BACKEND_TIMEOUT,
            window: PlausibleWindow::default(),
            unknown_shape: UnknownShapePolicy::default(),
        }
    }
}

fn parse_env<T>(name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    std::env::var(name)
        .ok()
        .map(|v| v.trim().parse::<T>())
        .transpose()
        .with_context(|| format!("Failed to parse {name}"))
}
