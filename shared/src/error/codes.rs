//! Unified error codes for the marketplace
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Catalog (app listing) errors
//! - 4xxx: Tag errors
//! - 5xxx: Upload errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so they serialize compactly
/// and survive the trip through the JSON backend unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid format
    InvalidFormat = 6,
    /// Edit submission contained no differences
    NoChanges = 9,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Session has expired
    SessionExpired = 1005,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin role required
    AdminRequired = 2003,

    // ==================== 3xxx: Catalog ====================
    /// App listing not found
    AppNotFound = 3001,
    /// App name already exists
    AppNameExists = 3002,

    // ==================== 4xxx: Tag ====================
    /// Tag not found
    TagNotFound = 4001,
    /// Tag name already exists
    TagNameExists = 4002,
    /// Tag color is not a hex color
    InvalidTagColor = 4003,

    // ==================== 5xxx: Upload ====================
    /// File exceeds the size limit
    FileTooLarge = 5001,
    /// File format is not accepted
    UnsupportedFileFormat = 5002,
    /// File could not be read
    FileReadFailed = 5003,
    /// File is empty
    EmptyFile = 5004,

    // ==================== 9xxx: System ====================
    /// Internal error
    InternalError = 9001,
    /// Network error
    NetworkError = 9003,
    /// Request timed out
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
    /// Request superseded by a newer one
    RequestCancelled = 9006,
    /// Backend returned an unexpected failure
    UpstreamError = 9007,
}

impl ErrorCode {
    /// Get the numeric code
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check whether this is the success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Get the default message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Unknown => "Unknown error",
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::AlreadyExists => "Resource already exists",
            Self::InvalidFormat => "Invalid format",
            Self::NoChanges => "No changes detected",

            Self::NotAuthenticated => "Authentication required",
            Self::TokenExpired => "Token expired",
            Self::TokenInvalid => "Invalid token",
            Self::SessionExpired => "Session expired",

            Self::PermissionDenied => "Permission denied",
            Self::AdminRequired => "Admin role required",

            Self::AppNotFound => "App not found",
            Self::AppNameExists => "App name already exists",

            Self::TagNotFound => "Tag not found",
            Self::TagNameExists => "Tag name already exists",
            Self::InvalidTagColor => "Must be a valid hex color (e.g., #F5F5F5 or #FFF)",

            Self::FileTooLarge => "File size must not exceed 10MB",
            Self::UnsupportedFileFormat => "Only SVG files are allowed",
            Self::FileReadFailed => "Failed to read icon file",
            Self::EmptyFile => "File is empty",

            Self::InternalError => "Internal error",
            Self::NetworkError => "Network error",
            Self::TimeoutError => "Request timed out",
            Self::ConfigError => "Configuration error",
            Self::RequestCancelled => "Request cancelled",
            Self::UpstreamError => "Server error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown u16 to [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            6 => Ok(ErrorCode::InvalidFormat),
            9 => Ok(ErrorCode::NoChanges),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::SessionExpired),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2003 => Ok(ErrorCode::AdminRequired),

            // Catalog
            3001 => Ok(ErrorCode::AppNotFound),
            3002 => Ok(ErrorCode::AppNameExists),

            // Tag
            4001 => Ok(ErrorCode::TagNotFound),
            4002 => Ok(ErrorCode::TagNameExists),
            4003 => Ok(ErrorCode::InvalidTagColor),

            // Upload
            5001 => Ok(ErrorCode::FileTooLarge),
            5002 => Ok(ErrorCode::UnsupportedFileFormat),
            5003 => Ok(ErrorCode::FileReadFailed),
            5004 => Ok(ErrorCode::EmptyFile),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9003 => Ok(ErrorCode::NetworkError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),
            9006 => Ok(ErrorCode::RequestCancelled),
            9007 => Ok(ErrorCode::UpstreamError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
