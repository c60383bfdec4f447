use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::extract::ExtractionError;
use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error("Extracted text is too short ({chars} characters, minimum {min})")]
    InsufficientContent { chars: usize, min: usize },

    #[error("File size too large (max {limit} bytes)")]
    PayloadTooLarge { limit: usize },

    #[error("Remote analysis failed: {0}")]
    Remote(#[from] LlmError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Status, stable error code and client-facing message.
    pub fn describe(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Extraction(e @ ExtractionError::UnsupportedFormat(_)) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "UNSUPPORTED_FORMAT",
                e.to_string(),
            ),
            AppError::Extraction(e @ ExtractionError::CorruptDocument { .. }) => {
                (StatusCode::BAD_REQUEST, "CORRUPT_DOCUMENT", e.to_string())
            }
            AppError::Extraction(e @ ExtractionError::Encoding(_)) => {
                (StatusCode::BAD_REQUEST, "ENCODING_ERROR", e.to_string())
            }
            AppError::InsufficientContent { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "INSUFFICIENT_CONTENT",
                self.to_string(),
            ),
            AppError::PayloadTooLarge { .. } => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "PAYLOAD_TOO_LARGE",
                self.to_string(),
            ),
            AppError::Remote(e) if e.is_timeout() => (
                StatusCode::BAD_GATEWAY,
                "REMOTE_TRANSPORT_FAILURE",
                format!("AI analysis timed out: {e}"),
            ),
            AppError::Remote(e @ LlmError::Transport(_)) => (
                StatusCode::BAD_GATEWAY,
                "REMOTE_TRANSPORT_FAILURE",
                format!("AI analysis failed: {e}"),
            ),
            AppError::Remote(e) => (
                StatusCode::BAD_GATEWAY,
                "REMOTE_SERVICE_ERROR",
                format!("AI analysis failed: {e}"),
            ),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal server error occurred".to_string(),
            ),
        }
    }

    pub(crate) fn log(&self) {
        match self {
            AppError::Remote(e) if e.is_timeout() => {
                tracing::error!("Remote analysis timed out: {e}")
            }
            AppError::Remote(e) => tracing::error!("Remote analysis error: {e}"),
            AppError::Internal(e) => tracing::error!("Internal error: {e:?}"),
            other => tracing::debug!("Rejected request: {other}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();
        let (status, code, message) = self.describe();

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
