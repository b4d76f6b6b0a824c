use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use cortex_preview::error::PreviewError;
use cortex_relay::RelayError;
use cortex_session::SessionError;
use cortex_storage::error::StorageError;

/// Unified API error type for all route handlers. Serialized as `{error}`.
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Conflict(String),
    /// The AI backend failed; the message is passed through to the caller.
    Upstream(StatusCode, String),
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Upstream(status, msg) => (status, msg),
            ApiError::Internal(msg) => {
                tracing::error!("internal error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_string())
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<RelayError> for ApiError {
    fn from(e: RelayError) -> Self {
        let status = match &e {
            RelayError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            RelayError::CreditsExhausted => StatusCode::PAYMENT_REQUIRED,
            RelayError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RelayError::Transport(_)
            | RelayError::Status { .. }
            | RelayError::EmptyResponse
            | RelayError::ResponseParse(_) => StatusCode::BAD_GATEWAY,
        };
        ApiError::Upstream(status, e.to_string())
    }
}

impl From<SessionError> for ApiError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::EmptyPrompt | SessionError::NoErrors => ApiError::BadRequest(e.to_string()),
            SessionError::Busy => ApiError::Conflict(e.to_string()),
            SessionError::Relay(e) => e.into(),
            SessionError::Preview(e) => e.into(),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::NotFound { id } => ApiError::NotFound(format!("session not found: {id}")),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<PreviewError> for ApiError {
    fn from(e: PreviewError) -> Self {
        ApiError::Internal(e.to_string())
    }
}
