//! App listing form values and validation

use validator::{Validate, ValidationError};

use super::icon::IconField;
use super::EditOptions;
use crate::error::FieldErrors;
use crate::models::{AppCreate, CatalogEntry};

/// Typed values of the create/update app form
///
/// Field names double as the keys of [`FieldErrors`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppForm {
    pub name: String,
    pub description: String,
    pub url: String,
    pub version_name: String,
    pub tags: Vec<i64>,
    pub user_groups: Vec<String>,
    pub is_active: bool,
    pub icon: IconField,
}

/// Trimmed text inputs, validated with the same rules on create and update
#[derive(Debug, Validate)]
struct TextFields {
    #[validate(length(min = 2, message = "Title must be at least 2 characters"))]
    name: String,
    #[validate(custom(function = "validate_description"))]
    description: String,
    #[validate(url(message = "Must be a valid URL"))]
    url: String,
    #[validate(length(min = 1, message = "Version name must be at least 1 character"))]
    version_name: String,
}

fn validate_description(value: &str) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len < 10 {
        return Err(ValidationError::new("length")
            .with_message("Description must be at least 10 characters".into()));
    }
    if len > 100 {
        return Err(ValidationError::new("length")
            .with_message("Description must be at most 100 characters".into()));
    }
    Ok(())
}

impl AppForm {
    /// A blank create form; new listings start active
    pub fn new() -> Self {
        Self {
            is_active: true,
            ..Default::default()
        }
    }

    /// Pre-populate an edit form from an existing listing
    pub fn from_entry(entry: &CatalogEntry, options: &EditOptions) -> Self {
        Self {
            name: entry.name.clone(),
            description: entry.description.clone(),
            url: entry.url.clone(),
            version_name: entry.version_name.clone(),
            tags: entry.tag_ids(),
            user_groups: entry.groups().to_vec(),
            is_active: entry.is_active.unwrap_or(options.missing_is_active),
            icon: if entry.icon.is_empty() {
                IconField::Empty
            } else {
                IconField::Unchanged
            },
        }
    }

    fn text_fields(&self) -> TextFields {
        TextFields {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            url: self.url.trim().to_string(),
            version_name: self.version_name.trim().to_string(),
        }
    }

    fn validate_text(&self) -> FieldErrors {
        match self.text_fields().validate() {
            Ok(()) => FieldErrors::new(),
            Err(errors) => errors.into(),
        }
    }

    /// Rules of the create form: every field is required
    pub fn validate_for_create(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        for (field, value, message) in [
            ("name", &self.name, "App name is required"),
            ("description", &self.description, "App description is required"),
            ("url", &self.url, "App URL is required"),
            ("version_name", &self.version_name, "App version name is required"),
        ] {
            if value.trim().is_empty() {
                errors.insert(field, message);
            }
        }
        errors.extend(self.validate_text());

        if self.tags.is_empty() {
            errors.insert("tags", "At least one tag is required");
        }
        if self.user_groups.is_empty() {
            errors.insert("user_groups", "At least one user group is required");
        }
        match &self.icon {
            IconField::Upload(upload) => {
                if let Err(e) = upload.validate() {
                    errors.insert("icon", e.to_string());
                }
            }
            IconField::Empty | IconField::Unchanged => {
                errors.insert("icon", "App icon is required");
            }
        }

        errors.into_result(())
    }

    /// Rules of the update form: text rules apply, lists and icon are optional
    pub fn validate_for_update(&self) -> Result<(), FieldErrors> {
        let mut errors = self.validate_text();
        if let Err(e) = self.icon.validate() {
            errors.insert("icon", e.to_string());
        }
        errors.into_result(())
    }
}

/// Build the create request body, stamping `added_by`
pub fn build_create_payload(form: &AppForm, actor: &str) -> Result<AppCreate, FieldErrors> {
    form.validate_for_create()?;

    let icon = match &form.icon {
        IconField::Upload(upload) => upload
            .to_data_url()
            .map_err(|e| FieldErrors::single("icon", e.to_string()))?,
        IconField::Empty | IconField::Unchanged => {
            return Err(FieldErrors::single("icon", "App icon is required"));
        }
    };

    Ok(AppCreate {
        name: form.name.trim().to_string(),
        url: form.url.trim().to_string(),
        description: form.description.trim().to_string(),
        version_name: form.version_name.trim().to_string(),
        tags: form.tags.clone(),
        icon,
        user_groups: form.user_groups.clone(),
        is_active: form.is_active,
        added_by: actor.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::icon::{IconUpload, SVG_CONTENT_TYPE};
    use crate::models::Tag;

    fn svg_upload() -> IconField {
        IconField::Upload(IconUpload::from_bytes(
            "app.svg",
            SVG_CONTENT_TYPE,
            b"<svg/>".to_vec(),
        ))
    }

    fn valid_form() -> AppForm {
        AppForm {
            name: "  Grafana ".into(),
            description: " Dashboards for everything ".into(),
            url: "https://grafana.example.com".into(),
            version_name: "10.2".into(),
            tags: vec![3, 1],
            user_groups: vec!["engineering".into()],
            is_active: true,
            icon: svg_upload(),
        }
    }

    #[test]
    fn test_valid_create_form() {
        assert!(valid_form().validate_for_create().is_ok());
    }

    #[test]
    fn test_blank_create_form() {
        let errors = AppForm::new().validate_for_create().unwrap_err();
        assert_eq!(errors.get("name"), Some("App name is required"));
        assert_eq!(errors.get("description"), Some("App description is required"));
        assert_eq!(errors.get("url"), Some("App URL is required"));
        assert_eq!(errors.get("version_name"), Some("App version name is required"));
        assert_eq!(errors.get("tags"), Some("At least one tag is required"));
        assert_eq!(errors.get("user_groups"), Some("At least one user group is required"));
        assert_eq!(errors.get("icon"), Some("App icon is required"));
    }

    #[test]
    fn test_text_rules() {
        let form = AppForm {
            name: " G ".into(),
            description: "short".into(),
            url: "www.sample.com".into(),
            ..valid_form()
        };
        let errors = form.validate_for_create().unwrap_err();
        assert_eq!(errors.get("name"), Some("Title must be at least 2 characters"));
        assert_eq!(
            errors.get("description"),
            Some("Description must be at least 10 characters")
        );
        assert_eq!(errors.get("url"), Some("Must be a valid URL"));
        assert_eq!(errors.get("version_name"), None);

        let form = AppForm {
            description: "x".repeat(101),
            ..valid_form()
        };
        let errors = form.validate_for_create().unwrap_err();
        assert_eq!(
            errors.get("description"),
            Some("Description must be at most 100 characters")
        );
    }

    #[test]
    fn test_update_form_allows_empty_lists_and_kept_icon() {
        let form = AppForm {
            tags: vec![],
            user_groups: vec![],
            icon: IconField::Unchanged,
            ..valid_form()
        };
        assert!(form.validate_for_update().is_ok());
        assert!(form.validate_for_create().is_err());
    }

    #[test]
    fn test_update_form_rejects_bad_icon() {
        let form = AppForm {
            icon: IconField::Upload(IconUpload::from_bytes("a.png", "image/png", vec![1])),
            ..valid_form()
        };
        let errors = form.validate_for_update().unwrap_err();
        assert_eq!(errors.get("icon"), Some("Only SVG files are allowed"));
    }

    #[test]
    fn test_build_create_payload() {
        let payload = build_create_payload(&valid_form(), "admin@example.com").unwrap();
        assert_eq!(payload.name, "Grafana");
        assert_eq!(payload.description, "Dashboards for everything");
        assert_eq!(payload.tags, vec![3, 1]);
        assert_eq!(payload.added_by, "admin@example.com");
        assert!(payload.icon.starts_with("data:image/svg+xml;base64,"));
    }

    #[test]
    fn test_from_entry() {
        let entry = CatalogEntry {
            id: 4,
            name: "Figma".into(),
            description: "design tool for teams".into(),
            icon: "https://icons.example.com/figma.svg".into(),
            url: "https://figma.com".into(),
            tags: vec![Tag::new(2, "Design", "#ff00ff")],
            is_favourite: true,
            added_by: "a@example.com".into(),
            is_active: None,
            version_name: "1".into(),
            user_groups: None,
        };

        let form = AppForm::from_entry(&entry, &EditOptions::default());
        assert_eq!(form.tags, vec![2]);
        assert!(form.user_groups.is_empty());
        assert!(form.is_active);
        assert_eq!(form.icon, IconField::Unchanged);

        let form = AppForm::from_entry(&entry, &EditOptions { missing_is_active: false });
        assert!(!form.is_active);
    }
}
