use pushkind_common::db::{DbConnection, DbPool};
use pushkind_common::pagination::Pagination;

use crate::domain::{
    bookmark::BookmarkKind,
    ingredient::{Ingredient, IngredientListQuery, NewIngredient},
    recipe::{NewRecipe, Recipe, RecipeListQuery, RecipeSummary, UpdateRecipe},
    shopping_list::CartIngredient,
    subscription::Subscription,
    tag::{NewTag, Tag},
    user::{NewUser, UpdateUser, User, UserListQuery},
};

pub mod bookmark;
pub mod errors;
pub mod ingredient;
pub mod recipe;
pub mod subscription;
pub mod tag;
pub mod user;

#[cfg(test)]
pub mod mock;

pub use errors::{RepositoryError, RepositoryResult};

#[derive(Clone)]
/// Diesel-backed repository implementation that wraps an r2d2 pool.
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository using the provided connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// SQL `OFFSET` and `LIMIT` for a page. Saturates instead of overflowing on
/// absurd page numbers, which then simply select nothing.
pub(crate) fn offset_and_limit(pagination: &Pagination) -> (i64, i64) {
    let limit = i64::try_from(pagination.per_page).unwrap_or(i64::MAX);
    let offset = i64::try_from(pagination.page.max(1) - 1)
        .unwrap_or(i64::MAX)
        .saturating_mul(limit);
    (offset, limit)
}

/// Read-only operations over tags.
pub trait TagReader {
    fn get_tag_by_id(&self, id: i32) -> RepositoryResult<Option<Tag>>;
    fn get_tags_by_ids(&self, ids: &[i32]) -> RepositoryResult<Vec<Tag>>;
    fn list_tags(&self) -> RepositoryResult<Vec<Tag>>;
}

/// Write operations over tags.
pub trait TagWriter {
    fn create_tag(&self, new_tag: &NewTag) -> RepositoryResult<Tag>;
}

/// Read-only operations over the ingredient catalogue.
pub trait IngredientReader {
    fn get_ingredient_by_id(&self, id: i32) -> RepositoryResult<Option<Ingredient>>;
    fn get_ingredients_by_ids(&self, ids: &[i32]) -> RepositoryResult<Vec<Ingredient>>;
    fn list_ingredients(&self, query: IngredientListQuery) -> RepositoryResult<Vec<Ingredient>>;
}

/// Write operations over the ingredient catalogue.
pub trait IngredientWriter {
    /// Insert ingredients, skipping `(name, unit)` pairs that already exist.
    /// Returns the number of rows actually inserted.
    fn create_ingredients(&self, new_ingredients: &[NewIngredient]) -> RepositoryResult<usize>;
}

/// Read-only operations over recipes.
pub trait RecipeReader {
    fn get_recipe_by_id(&self, id: i32) -> RepositoryResult<Option<Recipe>>;
    fn list_recipes(&self, query: RecipeListQuery) -> RepositoryResult<(usize, Vec<Recipe>)>;
    /// Total number of recipes by `author_id` and up to `limit` of the newest ones.
    fn list_author_recipes(
        &self,
        author_id: i32,
        limit: Option<usize>,
    ) -> RepositoryResult<(usize, Vec<RecipeSummary>)>;
}

/// Write operations over recipes and their association sets.
pub trait RecipeWriter {
    fn create_recipe(&self, new_recipe: &NewRecipe) -> RepositoryResult<Recipe>;
    fn update_recipe(&self, recipe_id: i32, updates: &UpdateRecipe) -> RepositoryResult<Recipe>;
    fn delete_recipe(&self, recipe_id: i32) -> RepositoryResult<()>;
}

/// Read-only operations over user profiles.
pub trait UserReader {
    fn get_user_by_id(&self, id: i32) -> RepositoryResult<Option<User>>;
    fn get_user_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;
    fn get_users_by_ids(&self, ids: &[i32]) -> RepositoryResult<Vec<User>>;
    fn list_users(&self, query: UserListQuery) -> RepositoryResult<(usize, Vec<User>)>;
}

/// Write operations over user profiles.
pub trait UserWriter {
    fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
    fn update_user(&self, user_id: i32, updates: &UpdateUser) -> RepositoryResult<User>;
    fn set_user_avatar(&self, user_id: i32, avatar: Option<String>) -> RepositoryResult<User>;
}

/// Read-only operations over the follow graph.
pub trait SubscriptionReader {
    fn is_subscribed(&self, user_id: i32, author_id: i32) -> RepositoryResult<bool>;
    /// Subset of `author_ids` that `user_id` follows.
    fn list_subscribed_ids(&self, user_id: i32, author_ids: &[i32]) -> RepositoryResult<Vec<i32>>;
    /// Authors followed by `user_id`, in follow order.
    fn list_subscribed_authors(
        &self,
        user_id: i32,
        pagination: Option<Pagination>,
    ) -> RepositoryResult<(usize, Vec<User>)>;
}

/// Write operations over the follow graph.
pub trait SubscriptionWriter {
    fn create_subscription(&self, user_id: i32, author_id: i32) -> RepositoryResult<Subscription>;
    fn delete_subscription(&self, user_id: i32, author_id: i32) -> RepositoryResult<()>;
}

/// Read-only operations over favourites and shopping carts.
pub trait BookmarkReader {
    fn is_bookmarked(&self, kind: BookmarkKind, user_id: i32, recipe_id: i32)
    -> RepositoryResult<bool>;
    /// Subset of `recipe_ids` that `user_id` has bookmarked in `kind`.
    fn list_bookmarked_ids(
        &self,
        kind: BookmarkKind,
        user_id: i32,
        recipe_ids: &[i32],
    ) -> RepositoryResult<Vec<i32>>;
}

/// Write operations over favourites and shopping carts.
pub trait BookmarkWriter {
    fn create_bookmark(&self, kind: BookmarkKind, user_id: i32, recipe_id: i32)
    -> RepositoryResult<()>;
    fn delete_bookmark(&self, kind: BookmarkKind, user_id: i32, recipe_id: i32)
    -> RepositoryResult<()>;
}

/// Source rows for shopping list aggregation.
pub trait ShoppingListReader {
    /// Every ingredient row of every recipe in the user's shopping cart.
    fn list_cart_ingredients(&self, user_id: i32) -> RepositoryResult<Vec<CartIngredient>>;
}
