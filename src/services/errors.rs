use serde::Serialize;
use thiserror::Error;

use crate::domain::bookmark::BookmarkKind;
use crate::repository::RepositoryError;

/// Result type returned by service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Classification attached to every error rendered at the HTTP boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Unauthorized,
    Forbidden,
    Internal,
}

/// Errors returned by the service layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// No identity was supplied for an operation that needs one.
    #[error("authentication required")]
    Unauthorized,
    /// The caller is authenticated but may not perform the operation.
    #[error("insufficient permissions")]
    Forbidden,
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(String),
    /// A uniqueness constraint rejected the write.
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("shopping cart is empty")]
    EmptyCart,
    #[error("cannot subscribe to yourself")]
    SelfSubscription,
    #[error("already subscribed to this author")]
    AlreadySubscribed,
    #[error("not subscribed to this author")]
    NotSubscribed,
    #[error("recipe is already in {0}")]
    AlreadyAdded(BookmarkKind),
    #[error("recipe is not in {0}")]
    NotAdded(BookmarkKind),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::Unauthorized => ErrorKind::Unauthorized,
            ServiceError::Forbidden => ErrorKind::Forbidden,
            ServiceError::Validation(_)
            | ServiceError::EmptyCart
            | ServiceError::SelfSubscription => ErrorKind::Validation,
            ServiceError::NotFound(_) => ErrorKind::NotFound,
            ServiceError::Conflict(_)
            | ServiceError::AlreadySubscribed
            | ServiceError::NotSubscribed
            | ServiceError::AlreadyAdded(_)
            | ServiceError::NotAdded(_) => ErrorKind::Conflict,
            ServiceError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub(crate) fn not_found(entity: &str) -> Self {
        ServiceError::NotFound(entity.to_string())
    }
}

/// Shown for lost uniqueness races; the storage message names tables and columns.
const DUPLICATE_MESSAGE: &str = "Объект уже существует.";

impl From<RepositoryError> for ServiceError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::NotFound => ServiceError::not_found("record"),
            RepositoryError::ConstraintViolation(message) => {
                log::debug!("Constraint violation surfaced as conflict: {message}");
                ServiceError::Conflict(DUPLICATE_MESSAGE.to_string())
            }
            other => ServiceError::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constraint_violation_becomes_conflict() {
        let err = ServiceError::from(RepositoryError::ConstraintViolation(
            "UNIQUE constraint failed: favourites.user_id, favourites.recipe_id".to_string(),
        ));

        assert_eq!(err.kind(), ErrorKind::Conflict);
        match err {
            ServiceError::Conflict(message) => {
                assert_eq!(message, "Объект уже существует.");
                assert!(!message.contains("favourites"));
            }
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[test]
    fn repository_not_found_is_classified() {
        let err = ServiceError::from(RepositoryError::NotFound);

        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn toggle_errors_name_the_collection() {
        assert_eq!(
            ServiceError::AlreadyAdded(BookmarkKind::Favorite).to_string(),
            "recipe is already in favorites"
        );
        assert_eq!(
            ServiceError::NotAdded(BookmarkKind::ShoppingCart).to_string(),
            "recipe is not in shopping cart"
        );
    }
}
