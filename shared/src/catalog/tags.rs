//! Tag aggregation over a catalog snapshot

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::models::{CatalogEntry, Tag};

/// Case-insensitive name ordering with deterministic tie-breaks
///
/// Names are compared on their lower-cased form first, then case-sensitively,
/// then by id, so two tags never compare equal.
pub fn compare_tag_names(a: &Tag, b: &Tag) -> Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.id.cmp(&b.id))
}

/// Deduplicated tags referenced by `entries`, sorted by name
///
/// The first occurrence of an id wins; later copies are ignored, not merged.
pub fn extract_unique_tags(entries: &[CatalogEntry]) -> Vec<Tag> {
    let mut seen: HashMap<i64, Tag> = HashMap::new();
    for tag in entries.iter().flat_map(|entry| entry.tags.iter()) {
        seen.entry(tag.id).or_insert_with(|| tag.clone());
    }

    let mut tags: Vec<Tag> = seen.into_values().collect();
    tags.sort_by(compare_tag_names);
    tags
}
