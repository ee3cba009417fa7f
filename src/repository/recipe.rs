use std::collections::HashMap;

use diesel::prelude::*;
use diesel::sqlite::{Sqlite, SqliteConnection};

use crate::{
    domain::{
        recipe::{
            NewRecipe as DomainNewRecipe, NewRecipeIngredient as DomainNewRecipeIngredient,
            Recipe as DomainRecipe, RecipeIngredient as DomainRecipeIngredient, RecipeListQuery,
            RecipeSummary as DomainRecipeSummary, UpdateRecipe as DomainUpdateRecipe, full_link,
            short_link,
        },
        tag::Tag as DomainTag,
    },
    models::{
        recipe::{
            NewRecipe as DbNewRecipe, NewRecipeIngredient as DbNewRecipeIngredient,
            NewRecipeTag as DbNewRecipeTag, Recipe as DbRecipe, RecipeLinks as DbRecipeLinks,
            UpdateRecipe as DbUpdateRecipe,
        },
        tag::Tag as DbTag,
    },
    repository::{
        DieselRepository, RecipeReader, RecipeWriter, RepositoryError, RepositoryResult,
        offset_and_limit,
    },
    schema::recipes,
};

impl RecipeReader for DieselRepository {
    fn get_recipe_by_id(&self, id: i32) -> RepositoryResult<Option<DomainRecipe>> {
        let mut conn = self.conn()?;

        let recipe = recipes::table
            .filter(recipes::id.eq(id))
            .first::<DbRecipe>(&mut conn)
            .optional()?;

        match recipe {
            Some(db_recipe) => Ok(Some(load_recipe_associations(&mut conn, db_recipe)?)),
            None => Ok(None),
        }
    }

    fn list_recipes(
        &self,
        query: RecipeListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainRecipe>)> {
        let mut conn = self.conn()?;

        let total = filtered_recipes(&query)
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        let mut items = filtered_recipes(&query).order(recipes::id.desc());

        if let Some(pagination) = &query.pagination {
            let (offset, limit) = offset_and_limit(pagination);
            items = items.offset(offset).limit(limit);
        }

        let db_recipes = items.load::<DbRecipe>(&mut conn)?;

        if db_recipes.is_empty() {
            return Ok((total, Vec::new()));
        }

        let recipe_ids: Vec<i32> = db_recipes.iter().map(|recipe| recipe.id).collect();
        let mut ingredients = load_ingredients_for_recipes(&mut conn, &recipe_ids)?;
        let mut tags = load_tags_for_recipes(&mut conn, &recipe_ids)?;

        let recipes = db_recipes
            .into_iter()
            .map(|recipe| {
                let recipe_ingredients = ingredients.remove(&recipe.id).unwrap_or_default();
                let recipe_tags = tags.remove(&recipe.id).unwrap_or_default();
                recipe.into_domain(recipe_ingredients, recipe_tags)
            })
            .collect();

        Ok((total, recipes))
    }

    fn list_author_recipes(
        &self,
        author_id: i32,
        limit: Option<usize>,
    ) -> RepositoryResult<(usize, Vec<DomainRecipeSummary>)> {
        let mut conn = self.conn()?;

        let total = recipes::table
            .filter(recipes::author_id.eq(author_id))
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        let mut items = recipes::table
            .filter(recipes::author_id.eq(author_id))
            .order(recipes::id.desc())
            .into_boxed::<Sqlite>();

        if let Some(limit) = limit {
            items = items.limit(limit as i64);
        }

        let summaries = items
            .load::<DbRecipe>(&mut conn)?
            .into_iter()
            .map(Into::into)
            .collect();

        Ok((total, summaries))
    }
}

impl RecipeWriter for DieselRepository {
    fn create_recipe(&self, new_recipe: &DomainNewRecipe) -> RepositoryResult<DomainRecipe> {
        let mut conn = self.conn()?;

        conn.transaction::<DomainRecipe, RepositoryError, _>(|conn| {
            let db_new = DbNewRecipe::from(new_recipe);

            let created = diesel::insert_into(recipes::table)
                .values(&db_new)
                .get_result::<DbRecipe>(conn)?;

            let recipe_id = created.id;
            let short = short_link(&new_recipe.site_url, recipe_id);
            let full = full_link(&new_recipe.site_url, recipe_id);

            let created = diesel::update(recipes::table.filter(recipes::id.eq(recipe_id)))
                .set(&DbRecipeLinks {
                    short_link: &short,
                    full_link: &full,
                })
                .get_result::<DbRecipe>(conn)?;

            insert_associations(
                conn,
                recipe_id,
                &new_recipe.tag_ids,
                &new_recipe.ingredients,
            )?;

            load_recipe_associations(conn, created)
        })
    }

    fn update_recipe(
        &self,
        recipe_id: i32,
        updates: &DomainUpdateRecipe,
    ) -> RepositoryResult<DomainRecipe> {
        use crate::schema::{recipe_ingredients, recipe_tags};

        let mut conn = self.conn()?;

        conn.transaction::<DomainRecipe, RepositoryError, _>(|conn| {
            let db_updates = DbUpdateRecipe::from(updates);

            let updated = diesel::update(recipes::table.filter(recipes::id.eq(recipe_id)))
                .set(&db_updates)
                .get_result::<DbRecipe>(conn)?;

            diesel::delete(recipe_tags::table.filter(recipe_tags::recipe_id.eq(recipe_id)))
                .execute(conn)?;
            diesel::delete(
                recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq(recipe_id)),
            )
            .execute(conn)?;

            insert_associations(conn, recipe_id, &updates.tag_ids, &updates.ingredients)?;

            load_recipe_associations(conn, updated)
        })
    }

    fn delete_recipe(&self, recipe_id: i32) -> RepositoryResult<()> {
        use crate::schema::{favourites, recipe_ingredients, recipe_tags, shopping_carts};

        let mut conn = self.conn()?;

        conn.transaction::<(), RepositoryError, _>(|conn| {
            diesel::delete(favourites::table.filter(favourites::recipe_id.eq(recipe_id)))
                .execute(conn)?;
            diesel::delete(shopping_carts::table.filter(shopping_carts::recipe_id.eq(recipe_id)))
                .execute(conn)?;
            diesel::delete(recipe_tags::table.filter(recipe_tags::recipe_id.eq(recipe_id)))
                .execute(conn)?;
            diesel::delete(
                recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq(recipe_id)),
            )
            .execute(conn)?;

            let deleted =
                diesel::delete(recipes::table.filter(recipes::id.eq(recipe_id))).execute(conn)?;
            if deleted == 0 {
                return Err(RepositoryError::NotFound);
            }

            Ok(())
        })
    }
}

fn filtered_recipes(query: &RecipeListQuery) -> recipes::BoxedQuery<'static, Sqlite> {
    use crate::schema::{favourites, recipe_tags, shopping_carts, tags};

    let mut items = recipes::table.into_boxed::<Sqlite>();

    if let Some(author_id) = query.author_id {
        items = items.filter(recipes::author_id.eq(author_id));
    }

    if !query.tag_slugs.is_empty() {
        let tagged = recipe_tags::table
            .inner_join(tags::table)
            .filter(tags::slug.eq_any(query.tag_slugs.clone()))
            .select(recipe_tags::recipe_id);
        items = items.filter(recipes::id.eq_any(tagged));
    }

    if let Some(viewer_id) = query.viewer_id {
        if let Some(is_favorited) = query.is_favorited {
            let favorited = favourites::table
                .filter(favourites::user_id.eq(viewer_id))
                .select(favourites::recipe_id);
            items = if is_favorited {
                items.filter(recipes::id.eq_any(favorited))
            } else {
                items.filter(recipes::id.ne_all(favorited))
            };
        }

        if let Some(in_cart) = query.is_in_shopping_cart {
            let carted = shopping_carts::table
                .filter(shopping_carts::user_id.eq(viewer_id))
                .select(shopping_carts::recipe_id);
            items = if in_cart {
                items.filter(recipes::id.eq_any(carted))
            } else {
                items.filter(recipes::id.ne_all(carted))
            };
        }
    }

    items
}

fn insert_associations(
    conn: &mut SqliteConnection,
    recipe_id: i32,
    tag_ids: &[i32],
    ingredients: &[DomainNewRecipeIngredient],
) -> RepositoryResult<()> {
    use crate::schema::{recipe_ingredients, recipe_tags};

    let tag_rows: Vec<DbNewRecipeTag> = tag_ids
        .iter()
        .map(|tag_id| DbNewRecipeTag {
            recipe_id,
            tag_id: *tag_id,
        })
        .collect();

    let ingredient_rows: Vec<DbNewRecipeIngredient> = ingredients
        .iter()
        .map(|ingredient| DbNewRecipeIngredient::from_domain(recipe_id, ingredient))
        .collect();

    if !tag_rows.is_empty() {
        diesel::insert_into(recipe_tags::table)
            .values(&tag_rows)
            .execute(conn)?;
    }

    if !ingredient_rows.is_empty() {
        diesel::insert_into(recipe_ingredients::table)
            .values(&ingredient_rows)
            .execute(conn)?;
    }

    Ok(())
}

fn load_recipe_associations(
    conn: &mut SqliteConnection,
    recipe: DbRecipe,
) -> RepositoryResult<DomainRecipe> {
    let ids = [recipe.id];
    let ingredients = load_ingredients_for_recipes(conn, &ids)?
        .remove(&recipe.id)
        .unwrap_or_default();
    let tags = load_tags_for_recipes(conn, &ids)?
        .remove(&recipe.id)
        .unwrap_or_default();

    Ok(recipe.into_domain(ingredients, tags))
}

fn load_ingredients_for_recipes(
    conn: &mut SqliteConnection,
    recipe_ids: &[i32],
) -> RepositoryResult<HashMap<i32, Vec<DomainRecipeIngredient>>> {
    use crate::schema::{ingredients, recipe_ingredients};

    if recipe_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = recipe_ingredients::table
        .inner_join(ingredients::table)
        .filter(recipe_ingredients::recipe_id.eq_any(recipe_ids))
        .order(recipe_ingredients::id.asc())
        .select((
            recipe_ingredients::recipe_id,
            ingredients::id,
            ingredients::name,
            ingredients::measurement_unit,
            recipe_ingredients::amount,
        ))
        .load::<(i32, i32, String, String, i32)>(conn)?;

    let mut map: HashMap<i32, Vec<DomainRecipeIngredient>> = HashMap::new();
    for (recipe_id, id, name, measurement_unit, amount) in rows {
        map.entry(recipe_id).or_default().push(DomainRecipeIngredient {
            id,
            name,
            measurement_unit,
            amount,
        });
    }

    Ok(map)
}

fn load_tags_for_recipes(
    conn: &mut SqliteConnection,
    recipe_ids: &[i32],
) -> RepositoryResult<HashMap<i32, Vec<DomainTag>>> {
    use crate::schema::{recipe_tags, tags};

    if recipe_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = recipe_tags::table
        .inner_join(tags::table)
        .filter(recipe_tags::recipe_id.eq_any(recipe_ids))
        .order(tags::id.asc())
        .select((recipe_tags::recipe_id, DbTag::as_select()))
        .load::<(i32, DbTag)>(conn)?;

    let mut map: HashMap<i32, Vec<DomainTag>> = HashMap::new();
    for (recipe_id, tag) in rows {
        map.entry(recipe_id).or_default().push(tag.into());
    }

    Ok(map)
}
