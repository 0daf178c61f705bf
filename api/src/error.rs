//! Gateway error type and its HTTP mapping.
//!
//! Every handler returns `Result<_, GatewayError>`. Input problems map to 400,
//! backend problems to 502 (or 504 when the call timed out).

use crate::executor::BackendError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use shared::config::Backend;
use shared::normalize::NormalizeError;
use thiserror::Error;

/// Errors surfaced to gateway callers.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// A required parameter is missing or a parameter is malformed.
    #[error("{0}")]
    InvalidRequest(String),

    /// The backend call itself failed.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// The backend answered 2xx but flagged the response as an error.
    #[error("{backend} reported an error ({error_type}): {message}")]
    BackendRejected {
        /// The backend that answered.
        backend: Backend,
        /// The backend's `errorType`.
        error_type: String,
        /// The backend's `error` text.
        message: String,
    },

    /// The backend response did not decode as the shape it claimed.
    #[error("Failed to decode {backend} response: {source}")]
    Decode {
        /// The backend that answered.
        backend: Backend,
        /// The underlying decode failure.
        #[source]
        source: NormalizeError,
    },

    /// The backend returned a `resultType` the gateway does not handle.
    #[error("{backend} returned unrecognized result type '{result_type}'")]
    UnknownShape {
        /// The backend that answered.
        backend: Backend,
        /// The discriminator as received (empty if absent).
        result_type: String,
    },
}

impl GatewayError {
    /// Attributes a normalization failure to `backend`.
    #[must_use]
    pub fn from_normalize(backend: Backend, err: NormalizeError) -> Self {
        match err {
            NormalizeError::BackendStatus {
                error_type,
                message,
            } => Self::BackendRejected {
                backend,
                error_type,
                message,
            },
            NormalizeError::UnknownShape(result_type) => Self::UnknownShape {
                backend,
                result_type,
            },
            source @ (NormalizeError::InvalidEnvelope(_) | NormalizeError::Decode { .. }) => {
                Self::Decode { backend, source }
            }
        }
    }

    /// Returns the HTTP status and machine-readable kind for this error.
    #[must_use]
    pub fn classification(&self) -> (StatusCode, &'static str) {
        match self {
            Self::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            Self::Backend(err) if err.is_timeout() => {
                (StatusCode::GATEWAY_TIMEOUT, "backend_timeout")
            }
            Self::Backend(_) => (StatusCode::BAD_GATEWAY, "backend_unavailable"),
            Self::BackendRejected { .. } => (StatusCode::BAD_GATEWAY, "backend_error"),
            Self::Decode { .. } => (StatusCode::BAD_GATEWAY, "backend_decode_error"),
            Self::UnknownShape { .. } => (StatusCode::BAD_GATEWAY, "unknown_result_type"),
        }
    }
}

/// Error body returned to callers.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error kind.
    pub error: String,
    /// Detailed error message.
    pub message: String,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, kind) = self.classification();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!(error = kind, %message, "Request failed");
        } else {
            tracing::warn!(error = kind, %message, "Rejected request");
        }

        let body = ErrorResponse {
            error: kind.to_string(),
            message,
        };
        (status, Json(body)).into_response()
    }
}
