use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, Responder, delete, get, patch, post, web};
use pushkind_common::domain::auth::AuthenticatedUser;

use crate::config::ServerConfig;
use crate::domain::bookmark::BookmarkKind;
use crate::forms::recipes::{RecipeForm, RecipeUpdateForm};
use crate::images::FsImageStore;
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::ServiceError;
use crate::services::bookmarks::{add_bookmark, remove_bookmark};
use crate::services::recipes::{
    RecipeQuery, create_recipe, delete_recipe, get_recipe, get_short_link, list_recipes,
    update_recipe,
};
use crate::services::shopping_list::{SHOPPING_LIST_FILE_NAME, build_shopping_list};
use crate::services::users::{require_user, resolve_viewer};

#[get("/recipes")]
pub async fn show_recipes(
    req: HttpRequest,
    identity: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    // `tags` may repeat, which `web::Query` cannot express.
    let query = match serde_html_form::from_str::<RecipeQuery>(req.query_string()) {
        Ok(query) => query,
        Err(err) => {
            return error_response("list recipes", ServiceError::Validation(err.to_string()));
        }
    };

    let viewer = match resolve_viewer(repo.get_ref(), identity.as_ref()) {
        Ok(viewer) => viewer,
        Err(err) => return error_response("list recipes", err),
    };

    match list_recipes(repo.get_ref(), viewer.as_ref(), query) {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(err) => error_response("list recipes", err),
    }
}

#[post("/recipes")]
pub async fn add_recipe(
    identity: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
    images: web::Data<FsImageStore>,
    config: web::Data<ServerConfig>,
    payload: web::Json<RecipeForm>,
) -> impl Responder {
    let user = match require_user(repo.get_ref(), identity.as_ref()) {
        Ok(user) => user,
        Err(err) => return error_response("create recipe", err),
    };

    match create_recipe(
        repo.get_ref(),
        images.get_ref(),
        &user,
        payload.into_inner(),
        &config.site_url,
    ) {
        Ok(recipe) => HttpResponse::Created().json(recipe),
        Err(err) => error_response("create recipe", err),
    }
}

#[get("/recipes/{recipe_id:\\d+}")]
pub async fn show_recipe(
    path: web::Path<i32>,
    identity: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let viewer = match resolve_viewer(repo.get_ref(), identity.as_ref()) {
        Ok(viewer) => viewer,
        Err(err) => return error_response("load recipe", err),
    };

    match get_recipe(repo.get_ref(), viewer.as_ref(), path.into_inner()) {
        Ok(recipe) => HttpResponse::Ok().json(recipe),
        Err(err) => error_response("load recipe", err),
    }
}

#[patch("/recipes/{recipe_id:\\d+}")]
pub async fn edit_recipe(
    path: web::Path<i32>,
    identity: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
    images: web::Data<FsImageStore>,
    payload: web::Json<RecipeUpdateForm>,
) -> impl Responder {
    let recipe_id = path.into_inner();
    let user = match require_user(repo.get_ref(), identity.as_ref()) {
        Ok(user) => user,
        Err(err) => return error_response("update recipe", err),
    };

    match update_recipe(
        repo.get_ref(),
        images.get_ref(),
        &user,
        recipe_id,
        payload.into_inner(),
    ) {
        Ok(recipe) => HttpResponse::Ok().json(recipe),
        Err(err) => error_response("update recipe", err),
    }
}

#[delete("/recipes/{recipe_id:\\d+}")]
pub async fn destroy_recipe(
    path: web::Path<i32>,
    identity: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
    images: web::Data<FsImageStore>,
) -> impl Responder {
    let recipe_id = path.into_inner();
    let user = match require_user(repo.get_ref(), identity.as_ref()) {
        Ok(user) => user,
        Err(err) => return error_response("delete recipe", err),
    };

    match delete_recipe(repo.get_ref(), images.get_ref(), &user, recipe_id) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response("delete recipe", err),
    }
}

#[get("/recipes/{recipe_id:\\d+}/get-link")]
pub async fn show_short_link(
    path: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    match get_short_link(repo.get_ref(), path.into_inner(), &config.site_url) {
        Ok(link) => HttpResponse::Ok().json(link),
        Err(err) => error_response("load short link", err),
    }
}

fn add_to(
    kind: BookmarkKind,
    recipe_id: i32,
    identity: Option<AuthenticatedUser>,
    repo: &DieselRepository,
) -> HttpResponse {
    let action = format!("add recipe {recipe_id} to {kind}");
    let user = match require_user(repo, identity.as_ref()) {
        Ok(user) => user,
        Err(err) => return error_response(&action, err),
    };

    match add_bookmark(repo, &user, recipe_id, kind) {
        Ok(summary) => HttpResponse::Created().json(summary),
        Err(err) => error_response(&action, err),
    }
}

fn remove_from(
    kind: BookmarkKind,
    recipe_id: i32,
    identity: Option<AuthenticatedUser>,
    repo: &DieselRepository,
) -> HttpResponse {
    let action = format!("remove recipe {recipe_id} from {kind}");
    let user = match require_user(repo, identity.as_ref()) {
        Ok(user) => user,
        Err(err) => return error_response(&action, err),
    };

    match remove_bookmark(repo, &user, recipe_id, kind) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(&action, err),
    }
}

#[post("/recipes/{recipe_id:\\d+}/favorite")]
pub async fn add_favorite(
    path: web::Path<i32>,
    identity: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    add_to(BookmarkKind::Favorite, path.into_inner(), identity, repo.get_ref())
}

#[delete("/recipes/{recipe_id:\\d+}/favorite")]
pub async fn remove_favorite(
    path: web::Path<i32>,
    identity: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    remove_from(BookmarkKind::Favorite, path.into_inner(), identity, repo.get_ref())
}

#[post("/recipes/{recipe_id:\\d+}/shopping_cart")]
pub async fn add_to_shopping_cart(
    path: web::Path<i32>,
    identity: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    add_to(BookmarkKind::ShoppingCart, path.into_inner(), identity, repo.get_ref())
}

#[delete("/recipes/{recipe_id:\\d+}/shopping_cart")]
pub async fn remove_from_shopping_cart(
    path: web::Path<i32>,
    identity: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    remove_from(BookmarkKind::ShoppingCart, path.into_inner(), identity, repo.get_ref())
}

#[get("/recipes/download_shopping_cart")]
pub async fn download_shopping_cart(
    identity: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let user = match require_user(repo.get_ref(), identity.as_ref()) {
        Ok(user) => user,
        Err(err) => return error_response("download shopping list", err),
    };

    match build_shopping_list(repo.get_ref(), &user) {
        Ok(text) => HttpResponse::Ok()
            .content_type("text/plain; charset=utf-8")
            .insert_header((
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{SHOPPING_LIST_FILE_NAME}\""),
            ))
            .body(text),
        Err(err) => error_response("download shopping list", err),
    }
}
