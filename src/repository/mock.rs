use mockall::mock;
use pushkind_common::pagination::Pagination;

use super::{
    BookmarkReader, BookmarkWriter, IngredientReader, IngredientWriter, RecipeReader,
    RecipeWriter, RepositoryResult, ShoppingListReader, SubscriptionReader, SubscriptionWriter,
    TagReader, TagWriter, UserReader, UserWriter,
};
use crate::domain::{
    bookmark::BookmarkKind,
    ingredient::{Ingredient, IngredientListQuery, NewIngredient},
    recipe::{NewRecipe, Recipe, RecipeListQuery, RecipeSummary, UpdateRecipe},
    shopping_list::CartIngredient,
    subscription::Subscription,
    tag::{NewTag, Tag},
    user::{NewUser, UpdateUser, User, UserListQuery},
};

mock! {
    pub TagReader {}

    impl TagReader for TagReader {
        fn get_tag_by_id(&self, id: i32) -> RepositoryResult<Option<Tag>>;
        fn get_tags_by_ids(&self, ids: &[i32]) -> RepositoryResult<Vec<Tag>>;
        fn list_tags(&self) -> RepositoryResult<Vec<Tag>>;
    }
}

mock! {
    pub TagWriter {}

    impl TagWriter for TagWriter {
        fn create_tag(&self, new_tag: &NewTag) -> RepositoryResult<Tag>;
    }
}

mock! {
    pub IngredientReader {}

    impl IngredientReader for IngredientReader {
        fn get_ingredient_by_id(&self, id: i32) -> RepositoryResult<Option<Ingredient>>;
        fn get_ingredients_by_ids(&self, ids: &[i32]) -> RepositoryResult<Vec<Ingredient>>;
        fn list_ingredients(&self, query: IngredientListQuery) -> RepositoryResult<Vec<Ingredient>>;
    }
}

mock! {
    pub IngredientWriter {}

    impl IngredientWriter for IngredientWriter {
        fn create_ingredients(&self, new_ingredients: &[NewIngredient]) -> RepositoryResult<usize>;
    }
}

// Recipe, profile and bookmark services need several traits at once, so
// a single mock implements the whole repository surface.
mock! {
    pub Repository {}

    impl TagReader for Repository {
        fn get_tag_by_id(&self, id: i32) -> RepositoryResult<Option<Tag>>;
        fn get_tags_by_ids(&self, ids: &[i32]) -> RepositoryResult<Vec<Tag>>;
        fn list_tags(&self) -> RepositoryResult<Vec<Tag>>;
    }

    impl IngredientReader for Repository {
        fn get_ingredient_by_id(&self, id: i32) -> RepositoryResult<Option<Ingredient>>;
        fn get_ingredients_by_ids(&self, ids: &[i32]) -> RepositoryResult<Vec<Ingredient>>;
        fn list_ingredients(&self, query: IngredientListQuery) -> RepositoryResult<Vec<Ingredient>>;
    }

    impl RecipeReader for Repository {
        fn get_recipe_by_id(&self, id: i32) -> RepositoryResult<Option<Recipe>>;
        fn list_recipes(&self, query: RecipeListQuery) -> RepositoryResult<(usize, Vec<Recipe>)>;
        fn list_author_recipes(&self, author_id: i32, limit: Option<usize>) -> RepositoryResult<(usize, Vec<RecipeSummary>)>;
    }

    impl RecipeWriter for Repository {
        fn create_recipe(&self, new_recipe: &NewRecipe) -> RepositoryResult<Recipe>;
        fn update_recipe(&self, recipe_id: i32, updates: &UpdateRecipe) -> RepositoryResult<Recipe>;
        fn delete_recipe(&self, recipe_id: i32) -> RepositoryResult<()>;
    }

    impl UserReader for Repository {
        fn get_user_by_id(&self, id: i32) -> RepositoryResult<Option<User>>;
        fn get_user_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;
        fn get_users_by_ids(&self, ids: &[i32]) -> RepositoryResult<Vec<User>>;
        fn list_users(&self, query: UserListQuery) -> RepositoryResult<(usize, Vec<User>)>;
    }

    impl UserWriter for Repository {
        fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
        fn update_user(&self, user_id: i32, updates: &UpdateUser) -> RepositoryResult<User>;
        fn set_user_avatar(&self, user_id: i32, avatar: Option<String>) -> RepositoryResult<User>;
    }

    impl SubscriptionReader for Repository {
        fn is_subscribed(&self, user_id: i32, author_id: i32) -> RepositoryResult<bool>;
        fn list_subscribed_ids(&self, user_id: i32, author_ids: &[i32]) -> RepositoryResult<Vec<i32>>;
        fn list_subscribed_authors(&self, user_id: i32, pagination: Option<Pagination>) -> RepositoryResult<(usize, Vec<User>)>;
    }

    impl SubscriptionWriter for Repository {
        fn create_subscription(&self, user_id: i32, author_id: i32) -> RepositoryResult<Subscription>;
        fn delete_subscription(&self, user_id: i32, author_id: i32) -> RepositoryResult<()>;
    }

    impl BookmarkReader for Repository {
        fn is_bookmarked(&self, kind: BookmarkKind, user_id: i32, recipe_id: i32) -> RepositoryResult<bool>;
        fn list_bookmarked_ids(&self, kind: BookmarkKind, user_id: i32, recipe_ids: &[i32]) -> RepositoryResult<Vec<i32>>;
    }

    impl BookmarkWriter for Repository {
        fn create_bookmark(&self, kind: BookmarkKind, user_id: i32, recipe_id: i32) -> RepositoryResult<()>;
        fn delete_bookmark(&self, kind: BookmarkKind, user_id: i32, recipe_id: i32) -> RepositoryResult<()>;
    }

    impl ShoppingListReader for Repository {
        fn list_cart_ingredients(&self, user_id: i32) -> RepositoryResult<Vec<CartIngredient>>;
    }
}
