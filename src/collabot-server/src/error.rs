//! Error types for the webhook server.
//!
//! Only protocol-level failures become an `AppError`. Domain failures in
//! slash commands (provider down, unknown project, bad usage) are turned
//! into ephemeral Slack replies by the handlers instead.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::debug;

/// Application error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or invalid Slack signature.
    #[error("Unauthorized")]
    Unauthorized,

    /// Malformed request.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Get the error code string.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized => "unauthorized",
            Self::BadRequest(_) => "bad_request",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        debug!(code = self.error_code(), "Rejecting request: {}", self);
        match self {
            // Untrusted caller: no body
            Self::Unauthorized => status.into_response(),
            Self::BadRequest(message) => (status, message).into_response(),
        }
    }
}

/// Result type for the server.
pub type AppResult<T> = Result<T, AppError>;
