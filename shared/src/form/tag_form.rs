//! Tag creation form

use std::sync::LazyLock;

use regex::Regex;
use validator::Validate;

use crate::error::FieldErrors;
use crate::models::{Tag, TagCreate};

static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#([A-Fa-f0-9]{6}|[A-Fa-f0-9]{3})$").unwrap());

#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct TagForm {
    #[validate(length(min = 1, message = "Tag name is required"))]
    pub name: String,
    #[validate(regex(
        path = *HEX_COLOR,
        message = "Must be a valid hex color (e.g., #F5F5F5 or #FFF)"
    ))]
    pub color: String,
}

impl TagForm {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
        }
    }

    fn trimmed(&self) -> TagForm {
        TagForm {
            name: self.name.trim().to_string(),
            color: self.color.trim().to_string(),
        }
    }

    pub fn check(&self) -> Result<(), FieldErrors> {
        let form = self.trimmed();
        let mut errors = FieldErrors::new();
        if form.color.is_empty() {
            errors.insert("color", "Tag color is required");
        }
        if let Err(e) = form.validate() {
            errors.extend(e.into());
        }
        errors.into_result(())
    }

    /// Reject a name already used by one of `existing` (case-insensitive)
    pub fn check_unique(&self, existing: &[Tag]) -> Result<(), FieldErrors> {
        let name = self.name.trim().to_lowercase();
        if existing.iter().any(|t| t.name.to_lowercase() == name) {
            return Err(FieldErrors::single("name", "Tag already exists"));
        }
        Ok(())
    }
}

/// Build the create-tag request body, stamping `added_by`
pub fn build_tag_payload(form: &TagForm, actor: &str) -> Result<TagCreate, FieldErrors> {
    form.check()?;
    let form = form.trimmed();
    Ok(TagCreate {
        name: form.name,
        color: form.color,
        added_by: actor.to_string(),
    })
}
