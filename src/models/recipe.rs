use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::recipe::{
    NewRecipe as DomainNewRecipe, NewRecipeIngredient as DomainNewRecipeIngredient,
    Recipe as DomainRecipe, RecipeIngredient as DomainRecipeIngredient,
    RecipeSummary as DomainRecipeSummary, UpdateRecipe as DomainUpdateRecipe,
};
use crate::domain::tag::Tag as DomainTag;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::recipes)]
pub struct Recipe {
    pub id: i32,
    pub author_id: i32,
    pub name: String,
    pub image: Option<String>,
    pub text: String,
    pub cooking_time: i32,
    pub short_link: Option<String>,
    pub full_link: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::recipe_ingredients)]
#[diesel(belongs_to(Recipe, foreign_key = recipe_id))]
pub struct RecipeIngredient {
    pub id: i32,
    pub recipe_id: i32,
    pub ingredient_id: i32,
    pub amount: i32,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipes)]
pub struct NewRecipe<'a> {
    pub author_id: i32,
    pub name: &'a str,
    pub image: Option<&'a str>,
    pub text: &'a str,
    pub cooking_time: i32,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::recipes)]
pub struct UpdateRecipe<'a> {
    pub name: Option<&'a str>,
    pub image: Option<&'a str>,
    pub text: Option<&'a str>,
    pub cooking_time: Option<i32>,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::recipes)]
pub struct RecipeLinks<'a> {
    pub short_link: &'a str,
    pub full_link: &'a str,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipe_ingredients)]
pub struct NewRecipeIngredient {
    pub recipe_id: i32,
    pub ingredient_id: i32,
    pub amount: i32,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipe_tags)]
pub struct NewRecipeTag {
    pub recipe_id: i32,
    pub tag_id: i32,
}

impl Recipe {
    pub fn into_domain(
        self,
        ingredients: Vec<DomainRecipeIngredient>,
        tags: Vec<DomainTag>,
    ) -> DomainRecipe {
        DomainRecipe {
            id: self.id,
            author_id: self.author_id,
            name: self.name,
            image: self.image,
            text: self.text,
            cooking_time: self.cooking_time,
            short_link: self.short_link,
            full_link: self.full_link,
            ingredients,
            tags,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl From<Recipe> for DomainRecipeSummary {
    fn from(value: Recipe) -> Self {
        Self {
            id: value.id,
            name: value.name,
            image: value.image,
            cooking_time: value.cooking_time,
        }
    }
}

impl<'a> From<&'a DomainNewRecipe> for NewRecipe<'a> {
    fn from(value: &'a DomainNewRecipe) -> Self {
        Self {
            author_id: value.author_id,
            name: value.name.as_str(),
            image: value.image.as_deref(),
            text: value.text.as_str(),
            cooking_time: value.cooking_time,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainUpdateRecipe> for UpdateRecipe<'a> {
    fn from(value: &'a DomainUpdateRecipe) -> Self {
        Self {
            name: value.name.as_deref(),
            image: value.image.as_deref(),
            text: value.text.as_deref(),
            cooking_time: value.cooking_time,
            updated_at: value.updated_at,
        }
    }
}

impl NewRecipeIngredient {
    pub fn from_domain(recipe_id: i32, value: &DomainNewRecipeIngredient) -> Self {
        Self {
            recipe_id,
            ingredient_id: value.ingredient_id,
            amount: value.amount,
        }
    }
}
