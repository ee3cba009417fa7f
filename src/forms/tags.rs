use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::tag::NewTag;
use crate::forms::sanitize_inline_text;

/// Maximum allowed length for a tag name and slug.
const TAG_MAX_LEN: usize = 32;
const TAG_MAX_LEN_VALIDATOR: u64 = TAG_MAX_LEN as u64;

/// Result type returned by the tag form helpers.
pub type TagFormResult<T> = Result<T, TagFormError>;

/// Errors that can occur while processing tag forms.
#[derive(Debug, Error)]
pub enum TagFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// The provided name is empty after sanitization.
    #[error("tag name cannot be empty")]
    EmptyName,
    /// The slug contains characters outside `[-a-zA-Z0-9_]`.
    #[error("invalid slug `{0}`")]
    InvalidSlug(String),
}

/// Payload accepted when an administrator adds a tag.
#[derive(Debug, Deserialize, Validate)]
pub struct AddTagForm {
    #[validate(length(min = 1, max = TAG_MAX_LEN_VALIDATOR))]
    pub name: String,
    #[validate(length(min = 1, max = TAG_MAX_LEN_VALIDATOR))]
    pub slug: String,
}

impl AddTagForm {
    /// Validates and sanitizes the payload into a domain `NewTag`.
    pub fn into_new_tag(self) -> TagFormResult<NewTag> {
        self.validate()?;

        let sanitized_name = sanitize_inline_text(&self.name);
        if sanitized_name.is_empty() {
            return Err(TagFormError::EmptyName);
        }

        let slug = self.slug.trim();
        let valid_slug = !slug.is_empty()
            && slug
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_');
        if !valid_slug {
            return Err(TagFormError::InvalidSlug(slug.to_string()));
        }

        Ok(NewTag::new(sanitized_name, slug))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_tag_form_sanitizes_and_converts() {
        let form = AddTagForm {
            name: "  Завтрак \t дня ".to_string(),
            slug: " Breakfast ".to_string(),
        };

        let new_tag = form.into_new_tag().expect("expected conversion to succeed");

        assert_eq!(new_tag.name, "Завтрак дня");
        assert_eq!(new_tag.slug, "breakfast");
    }

    #[test]
    fn add_tag_form_rejects_empty_name() {
        let form = AddTagForm {
            name: "   ".to_string(),
            slug: "lunch".to_string(),
        };

        assert!(matches!(form.into_new_tag(), Err(TagFormError::EmptyName)));
    }

    #[test]
    fn add_tag_form_rejects_bad_slug() {
        let form = AddTagForm {
            name: "Ужин".to_string(),
            slug: "ужин".to_string(),
        };

        assert!(matches!(
            form.into_new_tag(),
            Err(TagFormError::InvalidSlug(_))
        ));
    }

    #[test]
    fn add_tag_form_enforces_length() {
        let form = AddTagForm {
            name: "x".repeat(TAG_MAX_LEN + 1),
            slug: "long".to_string(),
        };

        assert!(matches!(
            form.into_new_tag(),
            Err(TagFormError::Validation(_))
        ));
    }
}
