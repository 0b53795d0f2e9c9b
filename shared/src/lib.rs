//! Shared types for the app marketplace
//!
//! Wire models, error types, and the pure catalog logic used by the client:
//! search and tag filtering, tag aggregation, and form payload builders.

pub mod catalog;
pub mod error;
pub mod form;
pub mod models;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};

pub use catalog::{extract_unique_tags, filter_and_sort};
pub use error::{AppError, AppResult, ErrorCode, FieldErrors};
pub use form::{UpdateOutcome, build_update_payload};
