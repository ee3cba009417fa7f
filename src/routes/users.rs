use actix_web::{HttpResponse, Responder, delete, get, patch, post, put, web};
use pushkind_common::domain::auth::AuthenticatedUser;

use crate::forms::users::{AvatarForm, UpdateProfileForm};
use crate::images::FsImageStore;
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::PageQuery;
use crate::services::subscriptions::{
    SubscriptionQuery, list_subscriptions, subscribe, unsubscribe,
};
use crate::services::users::{
    delete_avatar, get_me, get_user, list_users, require_user, resolve_viewer, set_avatar,
    update_profile,
};

#[get("/users")]
pub async fn show_users(
    params: web::Query<PageQuery>,
    identity: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let viewer = match resolve_viewer(repo.get_ref(), identity.as_ref()) {
        Ok(viewer) => viewer,
        Err(err) => return error_response("list users", err),
    };

    match list_users(repo.get_ref(), viewer.as_ref(), params.into_inner()) {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(err) => error_response("list users", err),
    }
}

#[get("/users/{user_id:\\d+}")]
pub async fn show_user(
    path: web::Path<i32>,
    identity: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let viewer = match resolve_viewer(repo.get_ref(), identity.as_ref()) {
        Ok(viewer) => viewer,
        Err(err) => return error_response("load user", err),
    };

    match get_user(repo.get_ref(), viewer.as_ref(), path.into_inner()) {
        Ok(user) => HttpResponse::Ok().json(user),
        Err(err) => error_response("load user", err),
    }
}

#[get("/users/me")]
pub async fn show_me(
    identity: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match require_user(repo.get_ref(), identity.as_ref()) {
        Ok(user) => HttpResponse::Ok().json(get_me(user)),
        Err(err) => error_response("load profile", err),
    }
}

#[patch("/users/me")]
pub async fn edit_me(
    identity: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
    payload: web::Json<UpdateProfileForm>,
) -> impl Responder {
    let user = match require_user(repo.get_ref(), identity.as_ref()) {
        Ok(user) => user,
        Err(err) => return error_response("update profile", err),
    };

    match update_profile(repo.get_ref(), &user, payload.into_inner()) {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(err) => error_response("update profile", err),
    }
}

#[put("/users/me/avatar")]
pub async fn put_avatar(
    identity: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
    images: web::Data<FsImageStore>,
    payload: web::Json<AvatarForm>,
) -> impl Responder {
    let user = match require_user(repo.get_ref(), identity.as_ref()) {
        Ok(user) => user,
        Err(err) => return error_response("set avatar", err),
    };

    match set_avatar(repo.get_ref(), images.get_ref(), &user, payload.into_inner()) {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(err) => error_response("set avatar", err),
    }
}

#[delete("/users/me/avatar")]
pub async fn remove_avatar(
    identity: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
    images: web::Data<FsImageStore>,
) -> impl Responder {
    let user = match require_user(repo.get_ref(), identity.as_ref()) {
        Ok(user) => user,
        Err(err) => return error_response("delete avatar", err),
    };

    match delete_avatar(repo.get_ref(), images.get_ref(), &user) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response("delete avatar", err),
    }
}

#[get("/users/subscriptions")]
pub async fn show_subscriptions(
    params: web::Query<SubscriptionQuery>,
    identity: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let user = match require_user(repo.get_ref(), identity.as_ref()) {
        Ok(user) => user,
        Err(err) => return error_response("list subscriptions", err),
    };

    match list_subscriptions(repo.get_ref(), &user, params.into_inner()) {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(err) => error_response("list subscriptions", err),
    }
}

#[post("/users/{user_id:\\d+}/subscribe")]
pub async fn add_subscription(
    path: web::Path<i32>,
    params: web::Query<SubscriptionQuery>,
    identity: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let user = match require_user(repo.get_ref(), identity.as_ref()) {
        Ok(user) => user,
        Err(err) => return error_response("subscribe", err),
    };

    let recipes_limit = params.recipes_limit();
    match subscribe(repo.get_ref(), &user, path.into_inner(), recipes_limit) {
        Ok(view) => HttpResponse::Created().json(view),
        Err(err) => error_response("subscribe", err),
    }
}

#[delete("/users/{user_id:\\d+}/subscribe")]
pub async fn remove_subscription(
    path: web::Path<i32>,
    identity: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let user = match require_user(repo.get_ref(), identity.as_ref()) {
        Ok(user) => user,
        Err(err) => return error_response("unsubscribe", err),
    };

    match unsubscribe(repo.get_ref(), &user, path.into_inner()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response("unsubscribe", err),
    }
}
