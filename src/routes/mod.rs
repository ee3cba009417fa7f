use actix_web::error::{InternalError, JsonPayloadError, QueryPayloadError};
use actix_web::http::StatusCode;
use actix_web::{Error, HttpRequest, HttpResponse};
use serde::Serialize;

use crate::domain::bookmark::BookmarkKind;
use crate::services::{ErrorKind, ServiceError};

pub mod ingredients;
pub mod links;
pub mod recipes;
pub mod tags;
pub mod users;

/// Body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub errors: String,
    pub kind: ErrorKind,
}

fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation | ErrorKind::Conflict => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorKind::Forbidden => StatusCode::FORBIDDEN,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn user_message(err: &ServiceError) -> String {
    match err {
        ServiceError::Unauthorized => "Учетные данные не были предоставлены.".to_string(),
        ServiceError::Forbidden => "Недостаточно прав.".to_string(),
        ServiceError::Validation(message) | ServiceError::Conflict(message) => message.clone(),
        ServiceError::NotFound(_) => "Объект не найден.".to_string(),
        ServiceError::EmptyCart => "Список покупок пуст.".to_string(),
        ServiceError::SelfSubscription => "Вы не можете подписаться сами на себя.".to_string(),
        ServiceError::AlreadySubscribed => "Вы уже подписаны на этого пользователя.".to_string(),
        ServiceError::NotSubscribed => "Вы не подписаны на этого пользователя.".to_string(),
        ServiceError::AlreadyAdded(BookmarkKind::Favorite) => {
            "Рецепт уже в избранном.".to_string()
        }
        ServiceError::AlreadyAdded(BookmarkKind::ShoppingCart) => {
            "Рецепт уже в списке покупок.".to_string()
        }
        ServiceError::NotAdded(BookmarkKind::Favorite) => "Рецепта нет в избранном.".to_string(),
        ServiceError::NotAdded(BookmarkKind::ShoppingCart) => {
            "Рецепта нет в списке покупок.".to_string()
        }
        ServiceError::Internal(_) => "Внутренняя ошибка сервера.".to_string(),
    }
}

/// Render a service error as a JSON response, logging internal failures.
pub fn error_response(action: &str, err: ServiceError) -> HttpResponse {
    let kind = err.kind();

    if kind == ErrorKind::Internal {
        log::error!("Failed to {action}: {err}");
    } else {
        log::debug!("Rejected {action}: {err}");
    }

    HttpResponse::build(status_for(kind)).json(ErrorBody {
        errors: user_message(&err),
        kind,
    })
}

/// Malformed JSON bodies get the same error shape as service failures.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> Error {
    let body = ErrorBody {
        errors: err.to_string(),
        kind: ErrorKind::Validation,
    };
    let response = HttpResponse::BadRequest().json(body);
    InternalError::from_response(err, response).into()
}

/// Same for query strings that do not deserialize.
pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> Error {
    let body = ErrorBody {
        errors: err.to_string(),
        kind: ErrorKind::Validation,
    };
    let response = HttpResponse::BadRequest().json(body);
    InternalError::from_response(err, response).into()
}
