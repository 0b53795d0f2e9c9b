// market-client/src/lib.rs

//! Market Client - REST client and state for the app marketplace portal
//!
//! Fetches the catalog, tags, user groups and profile from the backend,
//! keeps them in a [`PortalStore`] and exposes search, favourites and the
//! admin mutations through [`Portal`].

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod portal;
pub mod slots;
pub mod store;

pub use api::MarketplaceApi;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::{HttpClient, NetworkHttpClient};
pub use portal::Portal;
pub use slots::{RequestSlots, ResourceKind};
pub use store::{LoadState, PortalStore, Slice};

// Re-export shared types for convenience
pub use shared::error::{AppError, AppResult, ErrorCode};
pub use shared::form::{AppForm, EditOptions, IconField, IconUpload, TagForm};
pub use shared::models::{CatalogEntry, Role, Session, Tag, UserInfo};
