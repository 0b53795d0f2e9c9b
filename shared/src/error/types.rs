//! Error types

use super::codes::ErrorCode;
use super::field::FieldErrors;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Application error with structured error code and details
///
/// This is the error every portal operation surfaces to its caller:
/// - a standardized [`ErrorCode`]
/// - a human-readable message suitable for a notification or helper text
/// - optional structured details (field-level messages, resource names)
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details (field-level errors, context, etc.)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    /// Message attached to a single form field, if any
    pub fn field_message(&self, field: &str) -> Option<&str> {
        self.details
            .as_ref()?
            .get("fields")?
            .get(field)?
            .as_str()
    }

    // ==================== Convenience constructors ====================

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// Create the "no changes detected" error reported against `field`
    pub fn no_changes(field: &str) -> Self {
        Self::from(FieldErrors::single(field, ErrorCode::NoChanges.message()))
            .with_code(ErrorCode::NoChanges)
    }

    /// Create a not found error
    pub fn not_found(resource: impl Into<String>) -> Self {
        let r = resource.into();
        Self::with_message(ErrorCode::NotFound, format!("{} not found", r))
            .with_detail("resource", r)
    }

    /// Create a not authenticated error
    pub fn not_authenticated() -> Self {
        Self::new(ErrorCode::NotAuthenticated)
    }

    /// Create a permission denied error
    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::PermissionDenied, msg)
    }

    /// Create an admin required error
    pub fn admin_required() -> Self {
        Self::new(ErrorCode::AdminRequired)
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }

    /// Create an upstream (backend) error
    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::UpstreamError, msg)
    }

    /// Create a cancelled request error
    pub fn cancelled() -> Self {
        Self::new(ErrorCode::RequestCancelled)
    }

    fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = code;
        self
    }
}

impl From<FieldErrors> for AppError {
    fn from(errors: FieldErrors) -> Self {
        let message = errors
            .first()
            .map(|(_, msg)| msg.to_string())
            .unwrap_or_else(|| ErrorCode::ValidationFailed.message().to_string());
        let fields: serde_json::Map<String, Value> = errors
            .iter()
            .map(|(field, msg)| (field.to_string(), Value::from(msg)))
            .collect();
        Self::with_message(ErrorCode::ValidationFailed, message)
            .with_detail("fields", Value::Object(fields))
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;
