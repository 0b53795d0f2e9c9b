//! Data models
//!
//! Shared between the portal store and the REST client.
//! Wire format is the backend's camelCase JSON; all ids are `i64`.

pub mod app;
pub mod serde_helpers;
pub mod tag;
pub mod user;

// Re-exports
pub use app::*;
pub use tag::*;
pub use user::*;
