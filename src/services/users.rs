use std::collections::HashSet;

use chrono::Utc;
use pushkind_common::domain::auth::AuthenticatedUser;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::user::{NewUser, User, UserListQuery};
use crate::forms::users::{AvatarForm, UpdateProfileForm, UserFormError};
use crate::images::{AVATARS_FOLDER, ImageError, ImageStore};
use crate::repository::{RepositoryError, SubscriptionReader, UserReader, UserWriter};
use crate::services::{ListPage, PageQuery, ServiceError, ServiceResult};

/// Public profile rendered for a viewer.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UserView {
    pub id: i32,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar: Option<String>,
    /// Whether the viewer follows this user. Always `false` for anonymous viewers.
    pub is_subscribed: bool,
}

impl UserView {
    pub fn new(user: User, is_subscribed: bool) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            avatar: user.avatar,
            is_subscribed,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AvatarView {
    pub avatar: String,
}

impl From<UserFormError> for ServiceError {
    fn from(value: UserFormError) -> Self {
        ServiceError::Validation(value.to_string())
    }
}

impl From<ImageError> for ServiceError {
    fn from(value: ImageError) -> Self {
        match value {
            ImageError::Io(err) => ServiceError::Internal(format!("image storage: {err}")),
            other => ServiceError::Validation(other.to_string()),
        }
    }
}

/// How many usernames are tried before provisioning gives up.
const PROVISION_ATTEMPTS: usize = 3;

/// Resolve the local profile for an identity, creating it on first sight.
///
/// The e-mail is the preferred username. When another profile already holds
/// it, the user is provisioned under the e-mail's local part plus a random
/// suffix instead.
pub fn current_user<R>(repo: &R, identity: &AuthenticatedUser) -> ServiceResult<User>
where
    R: UserReader + UserWriter + ?Sized,
{
    if let Some(user) = repo.get_user_by_email(&identity.email)? {
        return Ok(user);
    }

    let mut new_user = NewUser::from(identity);
    for _ in 0..PROVISION_ATTEMPTS {
        match repo.create_user(&new_user) {
            Ok(user) => {
                log::info!("Provisioned user {} for {}", user.id, user.email);
                return Ok(user);
            }
            Err(RepositoryError::ConstraintViolation(_)) => {
                // Another request provisioned the same identity first.
                if let Some(user) = repo.get_user_by_email(&identity.email)? {
                    return Ok(user);
                }
                log::warn!(
                    "Username {} is taken, provisioning {} under another one",
                    new_user.username,
                    new_user.email
                );
                new_user.username = fallback_username(&new_user.email);
            }
            Err(err) => return Err(err.into()),
        }
    }

    Err(ServiceError::Conflict("user could not be provisioned".to_string()))
}

fn fallback_username(email: &str) -> String {
    let local = email.split_once('@').map_or(email, |(local, _)| local);
    let local: String = local.chars().take(100).collect();
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{local}-{}", &suffix[..8])
}

/// Like [`current_user`], but anonymous callers are rejected.
pub fn require_user<R>(repo: &R, identity: Option<&AuthenticatedUser>) -> ServiceResult<User>
where
    R: UserReader + UserWriter + ?Sized,
{
    match identity {
        Some(identity) => current_user(repo, identity),
        None => Err(ServiceError::Unauthorized),
    }
}

/// Resolve the viewer of a public endpoint; anonymous callers yield `None`.
pub fn resolve_viewer<R>(repo: &R, identity: Option<&AuthenticatedUser>) -> ServiceResult<Option<User>>
where
    R: UserReader + UserWriter + ?Sized,
{
    identity.map(|identity| current_user(repo, identity)).transpose()
}

/// Build views for `users`, resolving the viewer's follow flags in one query.
pub(crate) fn build_user_views<R>(
    repo: &R,
    viewer: Option<&User>,
    users: Vec<User>,
) -> ServiceResult<Vec<UserView>>
where
    R: SubscriptionReader + ?Sized,
{
    let followed: HashSet<i32> = match viewer {
        Some(viewer) => {
            let ids: Vec<i32> = users.iter().map(|user| user.id).collect();
            repo.list_subscribed_ids(viewer.id, &ids)?
                .into_iter()
                .collect()
        }
        None => HashSet::new(),
    };

    Ok(users
        .into_iter()
        .map(|user| {
            let is_subscribed = followed.contains(&user.id);
            UserView::new(user, is_subscribed)
        })
        .collect())
}

pub fn list_users<R>(
    repo: &R,
    viewer: Option<&User>,
    query: PageQuery,
) -> ServiceResult<ListPage<UserView>>
where
    R: UserReader + SubscriptionReader + ?Sized,
{
    let (page, per_page) = query.resolve();

    let (total, users) = repo.list_users(UserListQuery::new().paginate(page, per_page))?;
    let views = build_user_views(repo, viewer, users)?;

    Ok(ListPage::new(views, total, page, per_page))
}

pub fn get_user<R>(repo: &R, viewer: Option<&User>, user_id: i32) -> ServiceResult<UserView>
where
    R: UserReader + SubscriptionReader + ?Sized,
{
    let user = repo
        .get_user_by_id(user_id)?
        .ok_or_else(|| ServiceError::not_found("user"))?;

    let is_subscribed = match viewer {
        Some(viewer) if viewer.id != user.id => repo.is_subscribed(viewer.id, user.id)?,
        _ => false,
    };

    Ok(UserView::new(user, is_subscribed))
}

/// The caller's own profile.
pub fn get_me(user: User) -> UserView {
    UserView::new(user, false)
}

pub fn update_profile<R>(repo: &R, user: &User, form: UpdateProfileForm) -> ServiceResult<UserView>
where
    R: UserWriter + ?Sized,
{
    let updates = form.into_update_user(Utc::now().naive_utc())?;

    match repo.update_user(user.id, &updates) {
        Ok(updated) => Ok(UserView::new(updated, false)),
        Err(RepositoryError::ConstraintViolation(_)) => {
            Err(ServiceError::Conflict("username is already taken".to_string()))
        }
        Err(err) => Err(err.into()),
    }
}

/// Store a new avatar and drop the previous one.
pub fn set_avatar<R, S>(
    repo: &R,
    images: &S,
    user: &User,
    form: AvatarForm,
) -> ServiceResult<AvatarView>
where
    R: UserWriter + ?Sized,
    S: ImageStore + ?Sized,
{
    let data_url = form.into_data_url()?;
    let reference = images.save(AVATARS_FOLDER, &data_url)?;

    if let Err(err) = repo.set_user_avatar(user.id, Some(reference.clone())) {
        discard_image(images, &reference);
        return Err(err.into());
    }

    if let Some(previous) = user.avatar.as_deref() {
        discard_image(images, previous);
    }

    Ok(AvatarView { avatar: reference })
}

pub fn delete_avatar<R, S>(repo: &R, images: &S, user: &User) -> ServiceResult<()>
where
    R: UserWriter + ?Sized,
    S: ImageStore + ?Sized,
{
    let Some(previous) = user.avatar.as_deref() else {
        return Err(ServiceError::not_found("avatar"));
    };

    repo.set_user_avatar(user.id, None)?;
    discard_image(images, previous);

    Ok(())
}

/// Best-effort removal of an image that is no longer referenced.
pub(crate) fn discard_image<S>(images: &S, reference: &str)
where
    S: ImageStore + ?Sized,
{
    if let Err(err) = images.remove(reference) {
        log::warn!("Failed to remove image {reference}: {err}");
    }
}
