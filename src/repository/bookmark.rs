use diesel::dsl::exists;
use diesel::prelude::*;
use diesel::select;

use crate::domain::bookmark::BookmarkKind;
use crate::domain::shopping_list::CartIngredient;
use crate::repository::{
    BookmarkReader, BookmarkWriter, DieselRepository, RepositoryError, RepositoryResult,
    ShoppingListReader,
};

/// Runs `$body` with `$table` bound to the schema module that stores `$kind`.
/// Both bookmark tables share the same column layout.
macro_rules! with_bookmark_table {
    ($kind:expr, $table:ident => $body:expr) => {
        match $kind {
            BookmarkKind::Favorite => {
                use crate::schema::favourites as $table;
                $body
            }
            BookmarkKind::ShoppingCart => {
                use crate::schema::shopping_carts as $table;
                $body
            }
        }
    };
}

impl BookmarkReader for DieselRepository {
    fn is_bookmarked(
        &self,
        kind: BookmarkKind,
        user_id: i32,
        recipe_id: i32,
    ) -> RepositoryResult<bool> {
        let mut conn = self.conn()?;

        let found = with_bookmark_table!(kind, bookmarks => select(exists(
            bookmarks::table
                .filter(bookmarks::user_id.eq(user_id))
                .filter(bookmarks::recipe_id.eq(recipe_id)),
        ))
        .get_result::<bool>(&mut conn)?);

        Ok(found)
    }

    fn list_bookmarked_ids(
        &self,
        kind: BookmarkKind,
        user_id: i32,
        recipe_ids: &[i32],
    ) -> RepositoryResult<Vec<i32>> {
        if recipe_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = self.conn()?;

        let ids = with_bookmark_table!(kind, bookmarks => bookmarks::table
            .filter(bookmarks::user_id.eq(user_id))
            .filter(bookmarks::recipe_id.eq_any(recipe_ids))
            .select(bookmarks::recipe_id)
            .load::<i32>(&mut conn)?);

        Ok(ids)
    }
}

impl BookmarkWriter for DieselRepository {
    fn create_bookmark(
        &self,
        kind: BookmarkKind,
        user_id: i32,
        recipe_id: i32,
    ) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        with_bookmark_table!(kind, bookmarks => diesel::insert_into(bookmarks::table)
            .values((
                bookmarks::user_id.eq(user_id),
                bookmarks::recipe_id.eq(recipe_id),
            ))
            .execute(&mut conn)?);

        Ok(())
    }

    fn delete_bookmark(
        &self,
        kind: BookmarkKind,
        user_id: i32,
        recipe_id: i32,
    ) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        let deleted = with_bookmark_table!(kind, bookmarks => diesel::delete(
            bookmarks::table
                .filter(bookmarks::user_id.eq(user_id))
                .filter(bookmarks::recipe_id.eq(recipe_id)),
        )
        .execute(&mut conn)?);

        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

impl ShoppingListReader for DieselRepository {
    fn list_cart_ingredients(&self, user_id: i32) -> RepositoryResult<Vec<CartIngredient>> {
        use crate::schema::{ingredients, recipe_ingredients, shopping_carts};

        let mut conn = self.conn()?;

        let carted = shopping_carts::table
            .filter(shopping_carts::user_id.eq(user_id))
            .select(shopping_carts::recipe_id);

        let rows = recipe_ingredients::table
            .inner_join(ingredients::table)
            .filter(recipe_ingredients::recipe_id.eq_any(carted))
            .order(recipe_ingredients::id.asc())
            .select((
                ingredients::name,
                ingredients::measurement_unit,
                recipe_ingredients::amount,
            ))
            .load::<(String, String, i32)>(&mut conn)?;

        Ok(rows
            .into_iter()
            .map(|(name, measurement_unit, amount)| {
                CartIngredient::new(name, measurement_unit, amount)
            })
            .collect())
    }
}
