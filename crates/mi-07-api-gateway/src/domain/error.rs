//! Gateway error types and their HTTP status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use shared_types::IndexError;

use crate::domain::types::FailureBody;

/// Error answered to an HTTP caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// HTTP status.
    pub status: StatusCode,
    /// Short description of what failed.
    pub error: String,
    /// Underlying cause, if any.
    pub details: Option<String>,
}

impl ApiError {
    /// 400 with `message`.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: message.into(),
            details: None,
        }
    }

    /// 400 for a body that is not the expected JSON object.
    pub fn malformed_body(reason: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: "Request body must be a JSON object".into(),
            details: Some(reason.into()),
        }
    }

    /// 503: no registry connected yet.
    pub fn not_connected() -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            error: "Main index API not initialized.".into(),
            details: None,
        }
    }

    /// 500: page providers not built yet.
    pub fn providers_unavailable() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: "Server not initialized. Providers are not available.".into(),
            details: None,
        }
    }

    /// Map an engine error raised while doing `action`.
    ///
    /// Validation messages are returned as-is; other errors are summarized
    /// by `action` with the cause in `details`.
    pub fn from_index(action: &str, err: IndexError) -> Self {
        match err {
            IndexError::Validation(message) => Self::bad_request(message),
            other => Self {
                status: status_for(&other),
                error: action.to_string(),
                details: Some(other.to_string()),
            },
        }
    }
}

/// HTTP status for an engine error.
pub fn status_for(err: &IndexError) -> StatusCode {
    match err {
        IndexError::Validation(_) => StatusCode::BAD_REQUEST,
        IndexError::Authorization(_) => StatusCode::FORBIDDEN,
        IndexError::NotFound(_) => StatusCode::NOT_FOUND,
        IndexError::EmptyCollection => StatusCode::CONFLICT,
        IndexError::Unavailable(_) | IndexError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
        IndexError::Submission(_) | IndexError::Storage(_) | IndexError::InvalidKeyLength { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = FailureBody {
            success: false,
            error: self.error,
            details: self.details,
        };
        (self.status, Json(body)).into_response()
    }
}

/// Gateway-level errors (startup and serving, not per request).
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Socket bind failed.
    #[error("server bind error on {addr}: {reason}")]
    Bind {
        /// Requested address.
        addr: std::net::SocketAddr,
        /// OS error.
        reason: String,
    },

    /// The server stopped with an error.
    #[error("server error: {0}")]
    Serve(String),
}
