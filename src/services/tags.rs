use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::routes::check_role;

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::tag::Tag;
use crate::forms::tags::{AddTagForm, TagFormError};
use crate::repository::{RepositoryError, TagReader, TagWriter};
use crate::services::{ServiceError, ServiceResult};

impl From<TagFormError> for ServiceError {
    fn from(value: TagFormError) -> Self {
        ServiceError::Validation(value.to_string())
    }
}

/// All tags ordered by id.
pub fn list_tags<R>(repo: &R) -> ServiceResult<Vec<Tag>>
where
    R: TagReader + ?Sized,
{
    repo.list_tags().map_err(ServiceError::from)
}

pub fn get_tag<R>(repo: &R, tag_id: i32) -> ServiceResult<Tag>
where
    R: TagReader + ?Sized,
{
    repo.get_tag_by_id(tag_id)?
        .ok_or_else(|| ServiceError::not_found("tag"))
}

/// Creates a new tag. Only administrators may extend the tag list.
pub fn create_tag<R>(repo: &R, identity: &AuthenticatedUser, form: AddTagForm) -> ServiceResult<Tag>
where
    R: TagWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &identity.roles) {
        return Err(ServiceError::Forbidden);
    }

    let new_tag = form.into_new_tag()?;

    match repo.create_tag(&new_tag) {
        Ok(tag) => Ok(tag),
        Err(RepositoryError::ConstraintViolation(_)) => Err(ServiceError::Conflict(format!(
            "tag `{}` or slug `{}` already exists",
            new_tag.name, new_tag.slug
        ))),
        Err(err) => Err(err.into()),
    }
}
