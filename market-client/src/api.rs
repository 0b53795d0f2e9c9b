// market-client/src/api.rs

//! Marketplace REST endpoints

use shared::models::{AppCreate, AppUpdate, CatalogEntry, Tag, TagCreate, UserInfo};

use crate::ClientResult;
use crate::http::HttpClient;

/// Typed wrapper over the backend endpoints
#[derive(Debug, Clone)]
pub struct MarketplaceApi<C> {
    client: C,
}

impl<C: HttpClient> MarketplaceApi<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    // ========== Apps ==========

    /// Full catalog (admin view)
    pub async fn list_apps(&self) -> ClientResult<Vec<CatalogEntry>> {
        self.client.get("apps").await
    }

    /// Catalog visible to the signed-in user, with favourite flags
    pub async fn list_user_apps(&self) -> ClientResult<Vec<CatalogEntry>> {
        self.client.get("user-apps").await
    }

    pub async fn create_app(&self, payload: &AppCreate) -> ClientResult<serde_json::Value> {
        self.client.post("apps", payload).await
    }

    pub async fn update_app(&self, id: i64, patch: &AppUpdate) -> ClientResult<serde_json::Value> {
        self.client.patch(&format!("apps/{}", id), patch).await
    }

    /// Set or clear the favourite flag; `active` goes over the wire as `1`/`0`
    pub async fn set_favourite(&self, id: i64, active: bool) -> ClientResult<serde_json::Value> {
        let query = [
            ("id", id.to_string()),
            ("active", u8::from(active).to_string()),
        ];
        self.client.patch_query("user-apps", &query).await
    }

    // ========== Tags ==========

    pub async fn list_tags(&self) -> ClientResult<Vec<Tag>> {
        self.client.get("tags").await
    }

    pub async fn create_tag(&self, payload: &TagCreate) -> ClientResult<serde_json::Value> {
        self.client.post("tags", payload).await
    }

    // ========== Users ==========

    pub async fn list_user_groups(&self) -> ClientResult<Vec<String>> {
        self.client.get("user-groups").await
    }

    pub async fn user_info(&self) -> ClientResult<UserInfo> {
        self.client.get("user-info").await
    }
}
