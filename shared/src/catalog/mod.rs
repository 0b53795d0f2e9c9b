//! Catalog query engine and tag aggregation
//!
//! Pure functions over a catalog snapshot. Nothing here mutates its input.

pub mod query;
pub mod tags;

pub use query::{
    MatchBucket, favourites, filter_and_sort, filter_by_tags, match_bucket, normalize_query,
};
pub use tags::{compare_tag_names, extract_unique_tags};
