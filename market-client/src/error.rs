// market-client/src/error.rs

//! Client error types

use http::StatusCode;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Authentication required
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Permission denied
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Backend error with a readable message
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Superseded by a newer fetch of the same resource
    #[error("Request cancelled")]
    Cancelled,

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Http(e) if e.is_timeout() => {
                AppError::with_message(ErrorCode::TimeoutError, e.to_string())
            }
            ClientError::Http(e) => AppError::with_message(ErrorCode::NetworkError, e.to_string()),
            ClientError::InvalidResponse(msg) => AppError::upstream(msg),
            ClientError::Unauthorized(msg) => {
                AppError::with_message(ErrorCode::NotAuthenticated, msg)
            }
            ClientError::Forbidden(msg) => AppError::permission_denied(msg),
            ClientError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            ClientError::Validation(msg) => AppError::validation(msg),
            ClientError::Api { status, message } => {
                let code = StatusCode::from_u16(status)
                    .map(ErrorCode::from_http_status)
                    .unwrap_or(ErrorCode::UpstreamError);
                AppError::with_message(code, message).with_detail("status", status)
            }
            ClientError::Cancelled => AppError::cancelled(),
            ClientError::Serialization(e) => {
                AppError::with_message(ErrorCode::InvalidFormat, e.to_string())
            }
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
