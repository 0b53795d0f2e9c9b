//! Admin forms: typed values, validation and request payload builders

pub mod app_form;
pub mod icon;
pub mod patch;
pub mod tag_form;

pub use app_form::{AppForm, build_create_payload};
pub use icon::{IconError, IconField, IconSource, IconUpload, MAX_ICON_SIZE, SVG_CONTENT_TYPE};
pub use patch::{UpdateOutcome, build_update_payload, build_update_payload_with};
pub use tag_form::{TagForm, build_tag_payload};

/// Knobs for pre-populating and diffing edit forms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditOptions {
    /// Value assumed for a listing whose `isActive` is absent
    pub missing_is_active: bool,
}

impl Default for EditOptions {
    fn default() -> Self {
        Self {
            missing_is_active: true,
        }
    }
}
