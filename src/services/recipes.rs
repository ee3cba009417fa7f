use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::domain::bookmark::BookmarkKind;
use crate::domain::recipe::{
    NewRecipe, NewRecipeIngredient, Recipe, RecipeIngredient, RecipeListQuery, UpdateRecipe,
    full_link, short_link,
};
use crate::domain::tag::Tag;
use crate::domain::user::User;
use crate::forms::recipes::{RecipeForm, RecipeFormError, RecipeUpdateForm};
use crate::images::{ImageStore, RECIPE_IMAGES_FOLDER};
use crate::repository::{
    BookmarkReader, IngredientReader, RecipeReader, RecipeWriter, SubscriptionReader, TagReader,
    UserReader,
};
use crate::services::users::{UserView, build_user_views, discard_image};
use crate::services::{ListPage, PageQuery, ServiceError, ServiceResult};

/// Query parameters accepted by the recipe list.
///
/// `tags` may be repeated; the bookmark filters take `1`/`0` or
/// `true`/`false` and are ignored for anonymous viewers.
#[derive(Debug, Default, Deserialize)]
pub struct RecipeQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
    pub author: Option<i32>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub is_favorited: Option<String>,
    pub is_in_shopping_cart: Option<String>,
}

/// A recipe as rendered for a particular viewer.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecipeView {
    pub id: i32,
    pub tags: Vec<Tag>,
    pub author: UserView,
    pub ingredients: Vec<RecipeIngredient>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub image: Option<String>,
    pub text: String,
    pub cooking_time: i32,
}

impl RecipeView {
    fn new(recipe: Recipe, author: UserView, is_favorited: bool, is_in_shopping_cart: bool) -> Self {
        Self {
            id: recipe.id,
            tags: recipe.tags,
            author,
            ingredients: recipe.ingredients,
            is_favorited,
            is_in_shopping_cart,
            name: recipe.name,
            image: recipe.image,
            text: recipe.text,
            cooking_time: recipe.cooking_time,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ShortLinkView {
    #[serde(rename = "short-link")]
    pub short_link: String,
}

impl From<RecipeFormError> for ServiceError {
    fn from(value: RecipeFormError) -> Self {
        ServiceError::Validation(value.to_string())
    }
}

fn parse_flag(value: Option<&str>) -> Option<bool> {
    match value.map(str::trim) {
        Some("1") | Some("true") => Some(true),
        Some("0") | Some("false") => Some(false),
        _ => None,
    }
}

/// Every referenced tag and ingredient must exist in the catalogue.
fn ensure_catalogue_entries<R>(
    repo: &R,
    tag_ids: &[i32],
    ingredients: &[NewRecipeIngredient],
) -> ServiceResult<()>
where
    R: TagReader + IngredientReader + ?Sized,
{
    let known_tags: HashSet<i32> = repo
        .get_tags_by_ids(tag_ids)?
        .into_iter()
        .map(|tag| tag.id)
        .collect();
    if let Some(missing) = tag_ids.iter().find(|id| !known_tags.contains(id)) {
        return Err(ServiceError::Validation(format!("tag {missing} does not exist")));
    }

    let ingredient_ids: Vec<i32> = ingredients.iter().map(|entry| entry.ingredient_id).collect();
    let known_ingredients: HashSet<i32> = repo
        .get_ingredients_by_ids(&ingredient_ids)?
        .into_iter()
        .map(|ingredient| ingredient.id)
        .collect();
    if let Some(missing) = ingredient_ids
        .iter()
        .find(|id| !known_ingredients.contains(id))
    {
        return Err(ServiceError::Validation(format!(
            "ingredient {missing} does not exist"
        )));
    }

    Ok(())
}

/// Attach authors and the viewer's flags to `recipes`, batching the lookups.
fn build_recipe_views<R>(
    repo: &R,
    viewer: Option<&User>,
    recipes: Vec<Recipe>,
) -> ServiceResult<Vec<RecipeView>>
where
    R: UserReader + SubscriptionReader + BookmarkReader + ?Sized,
{
    if recipes.is_empty() {
        return Ok(Vec::new());
    }

    let mut author_ids: Vec<i32> = recipes.iter().map(|recipe| recipe.author_id).collect();
    author_ids.sort_unstable();
    author_ids.dedup();

    let authors = repo.get_users_by_ids(&author_ids)?;
    let authors: HashMap<i32, UserView> = build_user_views(repo, viewer, authors)?
        .into_iter()
        .map(|view| (view.id, view))
        .collect();

    let recipe_ids: Vec<i32> = recipes.iter().map(|recipe| recipe.id).collect();
    let (favorited, carted): (HashSet<i32>, HashSet<i32>) = match viewer {
        Some(viewer) => (
            repo.list_bookmarked_ids(BookmarkKind::Favorite, viewer.id, &recipe_ids)?
                .into_iter()
                .collect(),
            repo.list_bookmarked_ids(BookmarkKind::ShoppingCart, viewer.id, &recipe_ids)?
                .into_iter()
                .collect(),
        ),
        None => (HashSet::new(), HashSet::new()),
    };

    recipes
        .into_iter()
        .map(|recipe| {
            let author = authors.get(&recipe.author_id).cloned().ok_or_else(|| {
                ServiceError::Internal(format!(
                    "author {} of recipe {} is missing",
                    recipe.author_id, recipe.id
                ))
            })?;
            let is_favorited = favorited.contains(&recipe.id);
            let is_in_shopping_cart = carted.contains(&recipe.id);
            Ok(RecipeView::new(recipe, author, is_favorited, is_in_shopping_cart))
        })
        .collect()
}

fn load_recipe<R>(repo: &R, recipe_id: i32) -> ServiceResult<Recipe>
where
    R: RecipeReader + ?Sized,
{
    repo.get_recipe_by_id(recipe_id)?
        .ok_or_else(|| ServiceError::not_found("recipe"))
}

/// Recipes newest first, filtered and paginated.
pub fn list_recipes<R>(
    repo: &R,
    viewer: Option<&User>,
    query: RecipeQuery,
) -> ServiceResult<ListPage<RecipeView>>
where
    R: RecipeReader + UserReader + SubscriptionReader + BookmarkReader + ?Sized,
{
    let (page, per_page) = PageQuery {
        page: query.page,
        limit: query.limit,
    }
    .resolve();

    let mut list_query = RecipeListQuery::new().paginate(page, per_page);

    if let Some(author_id) = query.author {
        list_query = list_query.author(author_id);
    }

    let slugs: Vec<String> = query
        .tags
        .iter()
        .map(|slug| slug.trim().to_lowercase())
        .filter(|slug| !slug.is_empty())
        .collect();
    if !slugs.is_empty() {
        list_query = list_query.tags(slugs);
    }

    if let Some(viewer) = viewer {
        list_query = list_query.viewer(viewer.id);
        if let Some(value) = parse_flag(query.is_favorited.as_deref()) {
            list_query = list_query.favorited(value);
        }
        if let Some(value) = parse_flag(query.is_in_shopping_cart.as_deref()) {
            list_query = list_query.in_shopping_cart(value);
        }
    }

    let (total, recipes) = repo.list_recipes(list_query)?;
    let views = build_recipe_views(repo, viewer, recipes)?;

    Ok(ListPage::new(views, total, page, per_page))
}

pub fn get_recipe<R>(repo: &R, viewer: Option<&User>, recipe_id: i32) -> ServiceResult<RecipeView>
where
    R: RecipeReader + UserReader + SubscriptionReader + BookmarkReader + ?Sized,
{
    let recipe = load_recipe(repo, recipe_id)?;

    build_recipe_views(repo, viewer, vec![recipe])?
        .pop()
        .ok_or_else(|| ServiceError::not_found("recipe"))
}

/// Publishes a recipe with its full tag and ingredient set.
pub fn create_recipe<R, S>(
    repo: &R,
    images: &S,
    author: &User,
    form: RecipeForm,
    site_url: &str,
) -> ServiceResult<RecipeView>
where
    R: RecipeWriter + TagReader + IngredientReader + ?Sized,
    S: ImageStore + ?Sized,
{
    let payload = form.into_payload()?;
    ensure_catalogue_entries(repo, &payload.tag_ids, &payload.ingredients)?;

    let image = images.save(RECIPE_IMAGES_FOLDER, &payload.image)?;

    let new_recipe = NewRecipe::new(author.id, payload.name, payload.text, payload.cooking_time)
        .with_image(image.clone())
        .with_tags(payload.tag_ids)
        .with_ingredients(payload.ingredients)
        .with_site_url(site_url);

    let recipe = match repo.create_recipe(&new_recipe) {
        Ok(recipe) => recipe,
        Err(err) => {
            discard_image(images, &image);
            return Err(err.into());
        }
    };

    log::info!("User {} published recipe {}", author.id, recipe.id);

    let author = UserView::new(author.clone(), false);
    Ok(RecipeView::new(recipe, author, false, false))
}

/// Edits a recipe. Only its author may do so; the association sets are
/// replaced wholesale.
pub fn update_recipe<R, S>(
    repo: &R,
    images: &S,
    user: &User,
    recipe_id: i32,
    form: RecipeUpdateForm,
) -> ServiceResult<RecipeView>
where
    R: RecipeReader
        + RecipeWriter
        + TagReader
        + IngredientReader
        + UserReader
        + SubscriptionReader
        + BookmarkReader
        + ?Sized,
    S: ImageStore + ?Sized,
{
    let existing = load_recipe(repo, recipe_id)?;
    if existing.author_id != user.id {
        return Err(ServiceError::Forbidden);
    }

    let patch = form.into_patch()?;
    ensure_catalogue_entries(repo, &patch.tag_ids, &patch.ingredients)?;

    let mut updates = UpdateRecipe::new(patch.tag_ids, patch.ingredients);
    if let Some(name) = patch.name {
        updates = updates.name(name);
    }
    if let Some(text) = patch.text {
        updates = updates.text(text);
    }
    if let Some(cooking_time) = patch.cooking_time {
        updates = updates.cooking_time(cooking_time);
    }

    let new_image = match patch.image.as_deref() {
        Some(data_url) => Some(images.save(RECIPE_IMAGES_FOLDER, data_url)?),
        None => None,
    };
    if let Some(image) = &new_image {
        updates = updates.image(image.clone());
    }

    let recipe = match repo.update_recipe(recipe_id, &updates) {
        Ok(recipe) => recipe,
        Err(err) => {
            if let Some(image) = &new_image {
                discard_image(images, image);
            }
            return Err(err.into());
        }
    };

    if let (Some(_), Some(previous)) = (&new_image, existing.image.as_deref()) {
        discard_image(images, previous);
    }

    build_recipe_views(repo, Some(user), vec![recipe])?
        .pop()
        .ok_or_else(|| ServiceError::not_found("recipe"))
}

/// Deletes a recipe together with its associations and bookmarks.
pub fn delete_recipe<R, S>(repo: &R, images: &S, user: &User, recipe_id: i32) -> ServiceResult<()>
where
    R: RecipeReader + RecipeWriter + ?Sized,
    S: ImageStore + ?Sized,
{
    let existing = load_recipe(repo, recipe_id)?;
    if existing.author_id != user.id {
        return Err(ServiceError::Forbidden);
    }

    repo.delete_recipe(recipe_id)?;

    if let Some(image) = existing.image.as_deref() {
        discard_image(images, image);
    }

    log::info!("User {} deleted recipe {recipe_id}", user.id);

    Ok(())
}

pub fn get_short_link<R>(repo: &R, recipe_id: i32, site_url: &str) -> ServiceResult<ShortLinkView>
where
    R: RecipeReader + ?Sized,
{
    let recipe = load_recipe(repo, recipe_id)?;

    Ok(ShortLinkView {
        short_link: recipe
            .short_link
            .unwrap_or_else(|| short_link(site_url, recipe.id)),
    })
}

/// Target of the short link redirect.
pub fn resolve_full_link<R>(repo: &R, recipe_id: i32, site_url: &str) -> ServiceResult<String>
where
    R: RecipeReader + ?Sized,
{
    let recipe = load_recipe(repo, recipe_id)?;

    Ok(recipe
        .full_link
        .unwrap_or_else(|| full_link(site_url, recipe.id)))
}
