//! Catalog search: tag filtering plus bucketed ranking
//!
//! Ranking has no relevance score. An entry is placed in the first bucket
//! whose predicate it satisfies (title, then tag name, then description) and
//! the buckets are concatenated in that order, each keeping input order.

use crate::models::CatalogEntry;

/// Match category used to rank search results, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MatchBucket {
    Title,
    Tag,
    Description,
}

/// Trim and lower-case raw search input
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Bucket an entry falls into for an already-normalized query
///
/// Returns `None` when nothing matches. An empty query matches every entry
/// by title, which callers normally short-circuit before getting here.
pub fn match_bucket(entry: &CatalogEntry, normalized: &str) -> Option<MatchBucket> {
    if entry.name.to_lowercase().contains(normalized) {
        return Some(MatchBucket::Title);
    }
    if entry
        .tags
        .iter()
        .any(|tag| tag.name.to_lowercase().contains(normalized))
    {
        return Some(MatchBucket::Tag);
    }
    if entry.description.to_lowercase().contains(normalized) {
        return Some(MatchBucket::Description);
    }
    None
}

/// Keep entries carrying at least one of the selected tags
///
/// Selection is OR across tags. An empty selection keeps everything.
pub fn filter_by_tags<'a>(
    entries: &'a [CatalogEntry],
    selected_tag_ids: &[i64],
) -> Vec<&'a CatalogEntry> {
    if selected_tag_ids.is_empty() {
        return entries.iter().collect();
    }
    entries
        .iter()
        .filter(|entry| selected_tag_ids.iter().any(|id| entry.has_tag(*id)))
        .collect()
}

/// Produce the ordered subset of entries to display
///
/// Never mutates `entries`; the result is always a fresh vector.
pub fn filter_and_sort(
    entries: &[CatalogEntry],
    query: &str,
    selected_tag_ids: &[i64],
) -> Vec<CatalogEntry> {
    let normalized = normalize_query(query);
    let filtered = filter_by_tags(entries, selected_tag_ids);

    if normalized.is_empty() {
        return filtered.into_iter().cloned().collect();
    }

    let mut title = Vec::new();
    let mut tag = Vec::new();
    let mut description = Vec::new();

    for entry in filtered {
        match match_bucket(entry, &normalized) {
            Some(MatchBucket::Title) => title.push(entry.clone()),
            Some(MatchBucket::Tag) => tag.push(entry.clone()),
            Some(MatchBucket::Description) => description.push(entry.clone()),
            None => {}
        }
    }

    title.extend(tag);
    title.extend(description);
    title
}

/// Entries the user marked as favourite, in input order
pub fn favourites(entries: &[CatalogEntry]) -> Vec<CatalogEntry> {
    entries.iter().filter(|e| e.is_favourite).cloned().collect()
}
