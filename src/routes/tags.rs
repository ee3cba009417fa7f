use actix_web::{HttpResponse, Responder, get, post, web};
use pushkind_common::domain::auth::AuthenticatedUser;

use crate::forms::tags::AddTagForm;
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::ServiceError;
use crate::services::tags::{create_tag, get_tag, list_tags};

#[get("/tags")]
pub async fn show_tags(repo: web::Data<DieselRepository>) -> impl Responder {
    match list_tags(repo.get_ref()) {
        Ok(tags) => HttpResponse::Ok().json(tags),
        Err(err) => error_response("list tags", err),
    }
}

#[get("/tags/{tag_id:\\d+}")]
pub async fn show_tag(path: web::Path<i32>, repo: web::Data<DieselRepository>) -> impl Responder {
    let tag_id = path.into_inner();

    match get_tag(repo.get_ref(), tag_id) {
        Ok(tag) => HttpResponse::Ok().json(tag),
        Err(err) => error_response("load tag", err),
    }
}

#[post("/tags")]
pub async fn add_tag(
    identity: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
    payload: web::Json<AddTagForm>,
) -> impl Responder {
    let Some(identity) = identity else {
        return error_response("create tag", ServiceError::Unauthorized);
    };

    match create_tag(repo.get_ref(), &identity, payload.into_inner()) {
        Ok(tag) => {
            log::info!("Tag {} created by {}", tag.slug, identity.email);
            HttpResponse::Created().json(tag)
        }
        Err(err) => error_response("create tag", err),
    }
}
