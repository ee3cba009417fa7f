use std::collections::HashSet;

use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::recipe::{MAX_VALUE, MIN_VALUE, NewRecipeIngredient};
use crate::forms::{sanitize_inline_text, sanitize_multiline_text};

/// Maximum allowed length for a recipe name.
const NAME_MAX_LEN: usize = 256;
const NAME_MAX_LEN_VALIDATOR: u64 = NAME_MAX_LEN as u64;

/// Result type returned by the recipe form helpers.
pub type RecipeFormResult<T> = Result<T, RecipeFormError>;

/// Errors that can occur while processing recipe payloads.
#[derive(Debug, Error)]
pub enum RecipeFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("recipe name cannot be empty")]
    EmptyName,
    #[error("recipe text cannot be empty")]
    EmptyText,
    #[error("an image is required")]
    MissingImage,
    #[error("at least one tag is required")]
    EmptyTags,
    #[error("at least one ingredient is required")]
    EmptyIngredients,
    #[error("tag {0} is listed more than once")]
    DuplicateTag(i32),
    #[error("ingredient {0} is listed more than once")]
    DuplicateIngredient(i32),
}

/// One `{id, amount}` entry of the ingredient list.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RecipeIngredientForm {
    pub id: i32,
    #[validate(range(min = MIN_VALUE, max = MAX_VALUE))]
    pub amount: i32,
}

/// JSON payload accepted when publishing a recipe.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RecipeForm {
    #[validate(nested)]
    pub ingredients: Vec<RecipeIngredientForm>,
    pub tags: Vec<i32>,
    /// Image encoded as a `data:image/<format>;base64,...` URL.
    pub image: String,
    #[validate(length(min = 1, max = NAME_MAX_LEN_VALIDATOR))]
    pub name: String,
    #[validate(length(min = 1))]
    pub text: String,
    #[validate(range(min = MIN_VALUE, max = MAX_VALUE))]
    pub cooking_time: i32,
}

/// JSON payload accepted when editing a recipe.
///
/// Tags and ingredients are mandatory because the association sets are
/// replaced as a whole; scalar fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RecipeUpdateForm {
    #[validate(nested)]
    pub ingredients: Vec<RecipeIngredientForm>,
    pub tags: Vec<i32>,
    pub image: Option<String>,
    #[validate(length(min = 1, max = NAME_MAX_LEN_VALIDATOR))]
    pub name: Option<String>,
    #[validate(length(min = 1))]
    pub text: Option<String>,
    #[validate(range(min = MIN_VALUE, max = MAX_VALUE))]
    pub cooking_time: Option<i32>,
}

/// Sanitized recipe contents ready to be checked against the catalogue.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipePayload {
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
    pub image: String,
    pub tag_ids: Vec<i32>,
    pub ingredients: Vec<NewRecipeIngredient>,
}

/// Sanitized recipe patch; `None` keeps the stored value.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipePatch {
    pub name: Option<String>,
    pub text: Option<String>,
    pub cooking_time: Option<i32>,
    pub image: Option<String>,
    pub tag_ids: Vec<i32>,
    pub ingredients: Vec<NewRecipeIngredient>,
}

impl RecipeForm {
    pub fn into_payload(self) -> RecipeFormResult<RecipePayload> {
        self.validate()?;

        let name = sanitize_inline_text(&self.name);
        if name.is_empty() {
            return Err(RecipeFormError::EmptyName);
        }

        let text = sanitize_multiline_text(&self.text);
        if text.is_empty() {
            return Err(RecipeFormError::EmptyText);
        }

        let image = self.image.trim().to_string();
        if image.is_empty() {
            return Err(RecipeFormError::MissingImage);
        }

        Ok(RecipePayload {
            name,
            text,
            cooking_time: self.cooking_time,
            image,
            tag_ids: check_tags(&self.tags)?,
            ingredients: check_ingredients(&self.ingredients)?,
        })
    }
}

impl RecipeUpdateForm {
    pub fn into_patch(self) -> RecipeFormResult<RecipePatch> {
        self.validate()?;

        let name = match self.name.as_deref().map(sanitize_inline_text) {
            Some(name) if name.is_empty() => return Err(RecipeFormError::EmptyName),
            other => other,
        };

        let text = match self.text.as_deref().map(sanitize_multiline_text) {
            Some(text) if text.is_empty() => return Err(RecipeFormError::EmptyText),
            other => other,
        };

        let image = match self.image.as_deref().map(str::trim) {
            Some("") => return Err(RecipeFormError::MissingImage),
            other => other.map(str::to_string),
        };

        Ok(RecipePatch {
            name,
            text,
            cooking_time: self.cooking_time,
            image,
            tag_ids: check_tags(&self.tags)?,
            ingredients: check_ingredients(&self.ingredients)?,
        })
    }
}

fn check_tags(tags: &[i32]) -> RecipeFormResult<Vec<i32>> {
    if tags.is_empty() {
        return Err(RecipeFormError::EmptyTags);
    }

    let mut seen = HashSet::with_capacity(tags.len());
    for tag_id in tags {
        if !seen.insert(*tag_id) {
            return Err(RecipeFormError::DuplicateTag(*tag_id));
        }
    }

    Ok(tags.to_vec())
}

// Duplicates are detected by ingredient id alone, whatever the amounts.
fn check_ingredients(
    ingredients: &[RecipeIngredientForm],
) -> RecipeFormResult<Vec<NewRecipeIngredient>> {
    if ingredients.is_empty() {
        return Err(RecipeFormError::EmptyIngredients);
    }

    let mut seen = HashSet::with_capacity(ingredients.len());
    let mut entries = Vec::with_capacity(ingredients.len());
    for entry in ingredients {
        if !seen.insert(entry.id) {
            return Err(RecipeFormError::DuplicateIngredient(entry.id));
        }
        entries.push(NewRecipeIngredient::new(entry.id, entry.amount));
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PIXEL: &str = "data:image/png;base64,iVBORw0KGgo=";

    fn ingredient(id: i32, amount: i32) -> RecipeIngredientForm {
        RecipeIngredientForm { id, amount }
    }

    fn sample_form() -> RecipeForm {
        RecipeForm {
            ingredients: vec![ingredient(1, 100), ingredient(2, 3)],
            tags: vec![1, 2],
            image: PIXEL.to_string(),
            name: "  Блины \t на молоке ".to_string(),
            text: "Смешать.\r\nЖарить.".to_string(),
            cooking_time: 30,
        }
    }

    #[test]
    fn recipe_form_builds_payload() {
        let payload = sample_form().into_payload().expect("expected valid payload");

        assert_eq!(payload.name, "Блины на молоке");
        assert_eq!(payload.text, "Смешать.\nЖарить.");
        assert_eq!(payload.tag_ids, vec![1, 2]);
        assert_eq!(
            payload.ingredients,
            vec![NewRecipeIngredient::new(1, 100), NewRecipeIngredient::new(2, 3)]
        );
    }

    #[test]
    fn recipe_form_requires_tags_and_ingredients() {
        let mut form = sample_form();
        form.tags.clear();
        assert!(matches!(form.into_payload(), Err(RecipeFormError::EmptyTags)));

        let mut form = sample_form();
        form.ingredients.clear();
        assert!(matches!(
            form.into_payload(),
            Err(RecipeFormError::EmptyIngredients)
        ));
    }

    #[test]
    fn duplicate_ingredient_ids_are_rejected_regardless_of_amount() {
        let mut form = sample_form();
        form.ingredients = vec![ingredient(5, 10), ingredient(5, 20)];

        assert!(matches!(
            form.into_payload(),
            Err(RecipeFormError::DuplicateIngredient(5))
        ));
    }

    #[test]
    fn duplicate_tags_are_rejected() {
        let mut form = sample_form();
        form.tags = vec![3, 3];

        assert!(matches!(
            form.into_payload(),
            Err(RecipeFormError::DuplicateTag(3))
        ));
    }

    #[test]
    fn amounts_and_cooking_time_are_bounded() {
        let mut form = sample_form();
        form.ingredients = vec![ingredient(1, 0)];
        assert!(matches!(
            form.into_payload(),
            Err(RecipeFormError::Validation(_))
        ));

        let mut form = sample_form();
        form.cooking_time = MAX_VALUE + 1;
        assert!(matches!(
            form.into_payload(),
            Err(RecipeFormError::Validation(_))
        ));
    }

    #[test]
    fn recipe_form_requires_image() {
        let mut form = sample_form();
        form.image = "  ".to_string();

        assert!(matches!(
            form.into_payload(),
            Err(RecipeFormError::MissingImage)
        ));
    }

    #[test]
    fn update_form_keeps_missing_scalars() {
        let form = RecipeUpdateForm {
            ingredients: vec![ingredient(7, 1)],
            tags: vec![4],
            image: None,
            name: None,
            text: Some(" Новый текст ".to_string()),
            cooking_time: None,
        };

        let patch = form.into_patch().expect("expected valid patch");

        assert_eq!(patch.name, None);
        assert_eq!(patch.text.as_deref(), Some("Новый текст"));
        assert_eq!(patch.cooking_time, None);
        assert_eq!(patch.ingredients, vec![NewRecipeIngredient::new(7, 1)]);
    }

    #[test]
    fn update_form_still_requires_association_sets() {
        let form = RecipeUpdateForm {
            ingredients: vec![ingredient(7, 1)],
            tags: Vec::new(),
            image: None,
            name: Some("Суп".to_string()),
            text: None,
            cooking_time: Some(15),
        };

        assert!(matches!(form.into_patch(), Err(RecipeFormError::EmptyTags)));
    }
}
