use actix_web::http::header;
use actix_web::{HttpResponse, Responder, get, web};

use crate::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::recipes::resolve_full_link;

/// Short links handed out by `get-link` land here.
#[get("/r/{recipe_id:\\d+}/")]
pub async fn follow_short_link(
    path: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    match resolve_full_link(repo.get_ref(), path.into_inner(), &config.site_url) {
        Ok(target) => HttpResponse::Found()
            .insert_header((header::LOCATION, target))
            .finish(),
        Err(err) => error_response("follow short link", err),
    }
}
