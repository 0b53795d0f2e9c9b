//! Sparse update payloads
//!
//! An edit form is pre-populated from the listing; on submit only the
//! fields whose value actually differs are sent. An edit with no differences
//! yields [`UpdateOutcome::NoChange`] so the caller can stop before any
//! request is made.

use super::EditOptions;
use super::icon::IconField;
use super::app_form::AppForm;
use crate::error::FieldErrors;
use crate::models::{AppUpdate, CatalogEntry};

/// Result of diffing an edit form against the original listing
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    /// At least one field changed; `updated_by` is set
    Patch(AppUpdate),
    /// Nothing changed; no request should be sent
    NoChange,
}

impl UpdateOutcome {
    pub fn into_patch(self) -> Option<AppUpdate> {
        match self {
            Self::Patch(patch) => Some(patch),
            Self::NoChange => None,
        }
    }
}

/// Trimmed `edited` when it differs from `original`
fn changed_text(edited: &str, original: &str) -> Option<String> {
    let edited = edited.trim();
    (edited != original).then(|| edited.to_string())
}

/// `edited` (in its given order) when it differs from `original` as a set
fn changed_set<T: Ord + Clone>(edited: &[T], original: &[T]) -> Option<Vec<T>> {
    let mut a = edited.to_vec();
    let mut b = original.to_vec();
    a.sort();
    b.sort();
    (a != b).then(|| edited.to_vec())
}

/// Diff `edited` against `original` using the default [`EditOptions`]
pub fn build_update_payload(
    original: &CatalogEntry,
    edited: &AppForm,
    actor: &str,
) -> Result<UpdateOutcome, FieldErrors> {
    build_update_payload_with(original, edited, actor, &EditOptions::default())
}

/// Diff `edited` against `original`
///
/// A pending icon upload is encoded here; if it cannot be read the error is
/// returned against the `icon` field and nothing else is affected.
pub fn build_update_payload_with(
    original: &CatalogEntry,
    edited: &AppForm,
    actor: &str,
    options: &EditOptions,
) -> Result<UpdateOutcome, FieldErrors> {
    let original_active = original.is_active.unwrap_or(options.missing_is_active);

    let mut patch = AppUpdate {
        name: changed_text(&edited.name, &original.name),
        url: changed_text(&edited.url, &original.url),
        description: changed_text(&edited.description, &original.description),
        version_name: changed_text(&edited.version_name, &original.version_name),
        tags: changed_set(&edited.tags, &original.tag_ids()),
        user_groups: changed_set(&edited.user_groups, original.groups()),
        is_active: (edited.is_active != original_active).then_some(edited.is_active),
        icon: None,
        updated_by: None,
    };

    if let IconField::Upload(upload) = &edited.icon {
        let data_url = upload
            .to_data_url()
            .map_err(|e| FieldErrors::single("icon", e.to_string()))?;
        patch.icon = Some(data_url);
    }

    if patch.is_empty() {
        return Ok(UpdateOutcome::NoChange);
    }

    tracing::debug!(
        app_id = original.id,
        fields = ?patch.changed_fields(),
        "Built app update payload"
    );
    patch.updated_by = Some(actor.to_string());
    Ok(UpdateOutcome::Patch(patch))
}
