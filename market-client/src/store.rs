// market-client/src/store.rs

//! Portal state store
//!
//! One [`Slice`] per fetched resource. Derived views (search results,
//! tag chips, favourites) are computed on read from the pure catalog core.

use chrono::{DateTime, Utc};
use shared::catalog;
use shared::models::{CatalogEntry, Tag, UserInfo};

/// Lifecycle of one resource fetch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Success,
    Failed,
}

/// State of one resource
#[derive(Debug, Clone, PartialEq)]
pub struct Slice<T> {
    pub state: LoadState,
    pub state_message: Option<String>,
    pub error_message: Option<String>,
    pub data: Option<T>,
    /// Time of the last successful fetch
    pub updated_at: Option<DateTime<Utc>>,
}

impl<T> Default for Slice<T> {
    fn default() -> Self {
        Self {
            state: LoadState::Idle,
            state_message: None,
            error_message: None,
            data: None,
            updated_at: None,
        }
    }
}

impl<T> Slice<T> {
    /// Mark as loading; previously fetched data stays visible
    pub fn begin(&mut self, message: impl Into<String>) {
        self.state = LoadState::Loading;
        self.state_message = Some(message.into());
        self.error_message = None;
    }

    pub fn succeed(&mut self, data: T, message: impl Into<String>) {
        self.state = LoadState::Success;
        self.state_message = Some(message.into());
        self.error_message = None;
        self.data = Some(data);
        self.updated_at = Some(Utc::now());
    }

    pub fn fail(&mut self, error: impl Into<String>) {
        self.state = LoadState::Failed;
        self.state_message = Some("Failed to fetch".into());
        self.error_message = Some(error.into());
    }

    /// Back to idle, keeping data
    pub fn reset(&mut self) {
        self.state = LoadState::Idle;
        self.state_message = None;
        self.error_message = None;
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }
}

/// All client-side portal state
#[derive(Debug, Clone, Default)]
pub struct PortalStore {
    /// Full catalog (admin view)
    pub apps: Slice<Vec<CatalogEntry>>,
    /// Catalog as seen by the signed-in user, with favourite flags
    pub user_apps: Slice<Vec<CatalogEntry>>,
    pub tags: Slice<Vec<Tag>>,
    pub groups: Slice<Vec<String>>,
    pub user: Slice<UserInfo>,
    /// Outcome of the last create/update submission
    pub submit_state: Slice<()>,
}

impl PortalStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn user_entries(&self) -> &[CatalogEntry] {
        self.user_apps.data.as_deref().unwrap_or_default()
    }

    /// Search results for the home page
    pub fn visible_apps(&self, query: &str, selected_tag_ids: &[i64]) -> Vec<CatalogEntry> {
        catalog::filter_and_sort(self.user_entries(), query, selected_tag_ids)
    }

    /// Tag chips offered above the search results
    pub fn available_tags(&self) -> Vec<Tag> {
        catalog::extract_unique_tags(self.user_entries())
    }

    pub fn favourites(&self) -> Vec<CatalogEntry> {
        catalog::favourites(self.user_entries())
    }

    /// Look up a listing, preferring the admin catalog
    pub fn find_app(&self, id: i64) -> Option<&CatalogEntry> {
        [&self.apps, &self.user_apps]
            .into_iter()
            .filter_map(|slice| slice.data.as_ref())
            .flatten()
            .find(|entry| entry.id == id)
    }

    /// Set the favourite flag of one entry; no other field is touched
    ///
    /// Returns false when the entry is not loaded.
    pub fn set_favourite(&mut self, id: i64, favourite: bool) -> bool {
        let Some(entries) = self.user_apps.data.as_mut() else {
            return false;
        };
        match entries.iter_mut().find(|entry| entry.id == id) {
            Some(entry) => {
                entry.is_favourite = favourite;
                true
            }
            None => false,
        }
    }
}
