//! Unified error system for the marketplace portal
//!
//! This module provides:
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with codes, messages, and details
//! - [`FieldErrors`]: Field-level messages produced by form validation
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Catalog errors
//! - 4xxx: Tag errors
//! - 5xxx: Upload errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, FieldErrors};
//!
//! let err = AppError::new(ErrorCode::AppNotFound);
//!
//! let err = AppError::validation("Missing required field")
//!     .with_detail("field", "url");
//!
//! let err: AppError = FieldErrors::single("color", "Tag color is required").into();
//! assert_eq!(err.field_message("color"), Some("Tag color is required"));
//! ```

mod category;
mod codes;
mod field;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use field::FieldErrors;
pub use types::{AppError, AppResult};
