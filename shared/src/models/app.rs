//! Catalog Entry Model

use serde::{Deserialize, Serialize};

use super::serde_helpers;
use super::tag::Tag;

/// One listed application in the marketplace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Icon URL or data URL
    #[serde(default)]
    pub icon: String,
    /// Launch target
    pub url: String,
    #[serde(default, deserialize_with = "serde_helpers::null_as_empty")]
    pub tags: Vec<Tag>,
    /// Per-user favourite flag, `0`/`1` on the wire
    #[serde(default, with = "serde_helpers::int_bool")]
    pub is_favourite: bool,
    #[serde(default)]
    pub added_by: String,
    /// Soft-delete flag; older listings may not carry it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub version_name: String,
    /// Permitted user groups; `None` when the backend omits the list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_groups: Option<Vec<String>>,
}

impl CatalogEntry {
    /// Tag ids of this entry in stored order
    pub fn tag_ids(&self) -> Vec<i64> {
        self.tags.iter().map(|t| t.id).collect()
    }

    /// Permitted groups, treating an absent list as empty
    pub fn groups(&self) -> &[String] {
        self.user_groups.as_deref().unwrap_or_default()
    }

    pub fn has_tag(&self, tag_id: i64) -> bool {
        self.tags.iter().any(|t| t.id == tag_id)
    }
}

/// Create app payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppCreate {
    pub name: String,
    pub url: String,
    pub description: String,
    pub version_name: String,
    pub tags: Vec<i64>,
    /// Data URL of the uploaded SVG
    pub icon: String,
    pub user_groups: Vec<String>,
    pub is_active: bool,
    pub added_by: String,
}

/// Update app payload (sparse patch)
///
/// Only changed fields are present; absent fields are omitted from the JSON
/// body so the backend can tell "unchanged" from "unset".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_groups: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
}

impl AppUpdate {
    /// Names of the changed fields, excluding the `updatedBy` stamp
    pub fn changed_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.name.is_some() {
            fields.push("name");
        }
        if self.url.is_some() {
            fields.push("url");
        }
        if self.description.is_some() {
            fields.push("description");
        }
        if self.version_name.is_some() {
            fields.push("versionName");
        }
        if self.tags.is_some() {
            fields.push("tags");
        }
        if self.user_groups.is_some() {
            fields.push("userGroups");
        }
        if self.is_active.is_some() {
            fields.push("isActive");
        }
        if self.icon.is_some() {
            fields.push("icon");
        }
        fields
    }

    /// True when no entity field changed (the stamp does not count)
    pub fn is_empty(&self) -> bool {
        self.changed_fields().is_empty()
    }
}
