//! Backend query execution.
//!
//! The gateway never talks to a backend directly. It hands a fully formed
//! [`BackendRequest`] to a [`BackendExecutor`] and gets the raw response body back.
//! [`HttpExecutor`] is the production implementation; tests inject their own.

use async_trait::async_trait;
use shared::config::Backend;
use std::time::Duration;
use thiserror::Error;

/// Longest backend error body echoed back in a [`BackendError::Status`].
const MAX_ERROR_BODY: usize = 512;

/// A fully formed backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendRequest {
    /// The backend being called.
    pub backend: Backend,
    /// Absolute URL without the query string.
    pub url: String,
    /// Query string parameters, in order.
    pub params: Vec<(String, String)>,
}

impl BackendRequest {
    /// Creates a request with no parameters.
    #[must_use]
    pub fn new(backend: Backend, url: impl Into<String>) -> Self {
        Self {
            backend,
            url: url.into(),
            params: Vec::new(),
        }
    }

    /// Appends a query string parameter.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Returns the first value of parameter `key`, if present.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Errors that can occur while calling a backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BackendError {
    /// The HTTP client could not be built.
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    /// The request could not be sent or the connection failed.
    #[error("Request to {backend} failed: {message}")]
    Transport {
        /// The backend being called.
        backend: Backend,
        /// Transport error description.
        message: String,
    },

    /// The call exceeded the configured bound.
    #[error("Request to {backend} timed out after {timeout_secs}s")]
    Timeout {
        /// The backend being called.
        backend: Backend,
        /// The configured bound in seconds.
        timeout_secs: u64,
    },

    /// The backend answered with a non-success HTTP status.
    #[error("{backend} returned HTTP {status}: {body}")]
    Status {
        /// The backend being called.
        backend: Backend,
        /// The HTTP status code.
        status: u16,
        /// The start of the response body.
        body: String,
    },

    /// The response body could not be read.
    #[error("Failed to read response body from {backend}: {message}")]
    Body {
        /// The backend being called.
        backend: Backend,
        /// Read error description.
        message: String,
    },
}

impl BackendError {
    /// Returns true if the call was cut off by the timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Performs backend calls on behalf of the gateway.
///
/// Implementations must be thread-safe (Send + Sync) and must treat every
/// non-success outcome as an error.
#[async_trait]
pub trait BackendExecutor: Send + Sync {
    /// Executes `request` and returns the raw response body.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails, times out, or the backend answers with a
    /// non-success status.
    async fn execute(&self, request: BackendRequest) -> Result<Vec<u8>, BackendError>;
}

/// Executes backend calls over HTTP with `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpExecutor {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpExecutor {
    /// Creates an executor whose calls are bounded by `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(timeout: Duration) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Client(e.to_string()))?;

        Ok(Self { client, timeout })
    }

    fn classify(&self, backend: Backend, err: &reqwest::Error) -> BackendError {
        if err.is_timeout() {
            BackendError::Timeout {
                backend,
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            BackendError::Transport {
                backend,
                message: err.to_string(),
            }
        }
    }
}

#[async_trait]
impl BackendExecutor for HttpExecutor {
    async fn execute(&self, request: BackendRequest) -> Result<Vec<u8>, BackendError> {
        let backend = request.backend;

        tracing::debug!(%backend, url = %request.url, "Sending backend request");

        let response = self
            .client
            .get(&request.url)
            .query(&request.params)
            .send()
            .await
            .map_err(|e| self.classify(backend, &e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                backend,
                status: status.as_u16(),
                body: truncate(&text, MAX_ERROR_BODY),
            });
        }

        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                self.classify(backend, &e)
            } else {
                BackendError::Body {
                    backend,
                    message: e.to_string(),
                }
            }
        })?;

        tracing::debug!(%backend, bytes = body.len(), "Received backend response");

        Ok(body.to_vec())
    }
}

fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
