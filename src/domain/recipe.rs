use chrono::NaiveDateTime;
use pushkind_common::pagination::Pagination;
use serde::{Deserialize, Serialize};

use crate::domain::tag::Tag;

/// Lower bound shared by cooking time and ingredient amounts.
pub const MIN_VALUE: i32 = 1;
/// Upper bound shared by cooking time and ingredient amounts.
pub const MAX_VALUE: i32 = 32_000;

/// Domain representation of a recipe together with its association set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recipe {
    /// Unique identifier of the recipe.
    pub id: i32,
    /// Identifier of the user who published the recipe.
    pub author_id: i32,
    /// Title of the recipe.
    pub name: String,
    /// Public reference to the stored recipe image.
    pub image: Option<String>,
    /// Free-form cooking instructions.
    pub text: String,
    /// Cooking time in minutes.
    pub cooking_time: i32,
    /// Short shareable link assigned after insert.
    pub short_link: Option<String>,
    /// Canonical link to the recipe page assigned after insert.
    pub full_link: Option<String>,
    /// Ingredient rows with their amounts, in insertion order.
    pub ingredients: Vec<RecipeIngredient>,
    /// Tags attached to the recipe, ordered by tag id.
    pub tags: Vec<Tag>,
    /// Timestamp for when the recipe was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the recipe.
    pub updated_at: NaiveDateTime,
}

/// An ingredient as it appears inside a recipe.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecipeIngredient {
    /// Identifier of the catalogue ingredient.
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

/// Lightweight recipe card used by bookmarks and subscriptions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecipeSummary {
    pub id: i32,
    pub name: String,
    pub image: Option<String>,
    pub cooking_time: i32,
}

impl From<&Recipe> for RecipeSummary {
    fn from(value: &Recipe) -> Self {
        Self {
            id: value.id,
            name: value.name.clone(),
            image: value.image.clone(),
            cooking_time: value.cooking_time,
        }
    }
}

/// Requested amount of a catalogue ingredient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewRecipeIngredient {
    pub ingredient_id: i32,
    pub amount: i32,
}

impl NewRecipeIngredient {
    pub fn new(ingredient_id: i32, amount: i32) -> Self {
        Self {
            ingredient_id,
            amount,
        }
    }
}

/// Payload required to insert a recipe with its whole association set.
#[derive(Debug, Clone)]
pub struct NewRecipe {
    /// Identifier of the publishing user.
    pub author_id: i32,
    pub name: String,
    pub image: Option<String>,
    pub text: String,
    pub cooking_time: i32,
    /// Distinct tag identifiers.
    pub tag_ids: Vec<i32>,
    /// Distinct ingredient entries.
    pub ingredients: Vec<NewRecipeIngredient>,
    /// Base URL the share links are derived from once the id is known.
    pub site_url: String,
    pub updated_at: NaiveDateTime,
}

impl NewRecipe {
    /// Build a new recipe payload with the current timestamp.
    pub fn new(
        author_id: i32,
        name: impl Into<String>,
        text: impl Into<String>,
        cooking_time: i32,
    ) -> Self {
        Self {
            author_id,
            name: name.into(),
            image: None,
            text: text.into(),
            cooking_time,
            tag_ids: Vec::new(),
            ingredients: Vec::new(),
            site_url: String::new(),
            updated_at: chrono::Local::now().naive_utc(),
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn with_tags(mut self, tag_ids: Vec<i32>) -> Self {
        self.tag_ids = tag_ids;
        self
    }

    pub fn with_ingredients(mut self, ingredients: Vec<NewRecipeIngredient>) -> Self {
        self.ingredients = ingredients;
        self
    }

    pub fn with_site_url(mut self, site_url: impl Into<String>) -> Self {
        self.site_url = site_url.into();
        self
    }
}

/// Patch data applied when updating a recipe.
///
/// Scalar fields are only written when present. The association sets are
/// always replaced wholesale.
#[derive(Debug, Clone)]
pub struct UpdateRecipe {
    pub name: Option<String>,
    pub image: Option<String>,
    pub text: Option<String>,
    pub cooking_time: Option<i32>,
    pub tag_ids: Vec<i32>,
    pub ingredients: Vec<NewRecipeIngredient>,
    pub updated_at: NaiveDateTime,
}

impl UpdateRecipe {
    /// Create a patch that replaces the association sets and keeps every scalar field.
    pub fn new(tag_ids: Vec<i32>, ingredients: Vec<NewRecipeIngredient>) -> Self {
        Self {
            name: None,
            image: None,
            text: None,
            cooking_time: None,
            tag_ids,
            ingredients,
            updated_at: chrono::Local::now().naive_utc(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn cooking_time(mut self, cooking_time: i32) -> Self {
        self.cooking_time = Some(cooking_time);
        self
    }
}

/// Short link served by the redirect endpoint.
pub fn short_link(site_url: &str, recipe_id: i32) -> String {
    format!("{}/r/{recipe_id}/", site_url.trim_end_matches('/'))
}

/// Canonical link of the recipe page.
pub fn full_link(site_url: &str, recipe_id: i32) -> String {
    format!("{}/recipes/{recipe_id}/", site_url.trim_end_matches('/'))
}

/// Query definition used to list recipes, newest first.
#[derive(Debug, Clone, Default)]
pub struct RecipeListQuery {
    /// Only recipes published by this author.
    pub author_id: Option<i32>,
    /// Only recipes carrying at least one of these tag slugs.
    pub tag_slugs: Vec<String>,
    /// Viewer the bookmark filters are evaluated for.
    pub viewer_id: Option<i32>,
    /// Keep (`true`) or drop (`false`) recipes the viewer favourited.
    pub is_favorited: Option<bool>,
    /// Keep (`true`) or drop (`false`) recipes in the viewer's shopping cart.
    pub is_in_shopping_cart: Option<bool>,
    /// Optional pagination options applied to the query.
    pub pagination: Option<Pagination>,
}

impl RecipeListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn author(mut self, author_id: i32) -> Self {
        self.author_id = Some(author_id);
        self
    }

    pub fn tags(mut self, slugs: Vec<String>) -> Self {
        self.tag_slugs = slugs;
        self
    }

    pub fn viewer(mut self, viewer_id: i32) -> Self {
        self.viewer_id = Some(viewer_id);
        self
    }

    pub fn favorited(mut self, value: bool) -> Self {
        self.is_favorited = Some(value);
        self
    }

    pub fn in_shopping_cart(mut self, value: bool) -> Self {
        self.is_in_shopping_cart = Some(value);
        self
    }

    /// Apply pagination to the query with the given page number and page size.
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}
