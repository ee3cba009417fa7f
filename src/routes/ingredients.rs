use actix_multipart::form::MultipartForm;
use actix_web::{HttpResponse, Responder, get, post, web};
use pushkind_common::domain::auth::AuthenticatedUser;

use crate::forms::ingredients::UploadIngredientsForm;
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::ServiceError;
use crate::services::ingredients::{
    IngredientQuery, get_ingredient, import_ingredients, list_ingredients,
};

#[get("/ingredients")]
pub async fn show_ingredients(
    params: web::Query<IngredientQuery>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match list_ingredients(repo.get_ref(), params.into_inner()) {
        Ok(ingredients) => HttpResponse::Ok().json(ingredients),
        Err(err) => error_response("list ingredients", err),
    }
}

#[get("/ingredients/{ingredient_id:\\d+}")]
pub async fn show_ingredient(
    path: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match get_ingredient(repo.get_ref(), path.into_inner()) {
        Ok(ingredient) => HttpResponse::Ok().json(ingredient),
        Err(err) => error_response("load ingredient", err),
    }
}

#[post("/ingredients/upload")]
pub async fn upload_ingredients(
    identity: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
    MultipartForm(form): MultipartForm<UploadIngredientsForm>,
) -> impl Responder {
    let Some(identity) = identity else {
        return error_response("upload ingredients", ServiceError::Unauthorized);
    };

    match import_ingredients(repo.get_ref(), &identity, form) {
        Ok(summary) => HttpResponse::Created().json(summary),
        Err(err) => error_response("upload ingredients", err),
    }
}
