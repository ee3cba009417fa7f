use pushkind_common::pagination::Pagination;
use serde::{Deserialize, Serialize};

use crate::domain::recipe::RecipeSummary;
use crate::domain::user::User;
use crate::repository::{
    RecipeReader, RepositoryError, SubscriptionReader, SubscriptionWriter, UserReader,
};
use crate::services::users::UserView;
use crate::services::{ListPage, PageQuery, ServiceError, ServiceResult};

/// Query parameters of the subscription endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct SubscriptionQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
    /// Maximum number of recipes listed per author. Anything other than a
    /// positive integer is ignored.
    pub recipes_limit: Option<String>,
}

impl SubscriptionQuery {
    pub fn recipes_limit(&self) -> Option<usize> {
        self.recipes_limit
            .as_deref()
            .and_then(|value| value.trim().parse::<usize>().ok())
            .filter(|limit| *limit > 0)
    }
}

/// A followed author together with a preview of their recipes.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SubscriptionView {
    #[serde(flatten)]
    pub author: UserView,
    pub recipes: Vec<RecipeSummary>,
    pub recipes_count: usize,
}

fn subscription_view<R>(
    repo: &R,
    author: User,
    is_subscribed: bool,
    recipes_limit: Option<usize>,
) -> ServiceResult<SubscriptionView>
where
    R: RecipeReader + ?Sized,
{
    let (recipes_count, recipes) = repo.list_author_recipes(author.id, recipes_limit)?;

    Ok(SubscriptionView {
        author: UserView::new(author, is_subscribed),
        recipes,
        recipes_count,
    })
}

/// Follows `author_id`.
pub fn subscribe<R>(
    repo: &R,
    user: &User,
    author_id: i32,
    recipes_limit: Option<usize>,
) -> ServiceResult<SubscriptionView>
where
    R: UserReader + SubscriptionReader + SubscriptionWriter + RecipeReader + ?Sized,
{
    if user.id == author_id {
        return Err(ServiceError::SelfSubscription);
    }

    let author = repo
        .get_user_by_id(author_id)?
        .ok_or_else(|| ServiceError::not_found("user"))?;

    if repo.is_subscribed(user.id, author_id)? {
        return Err(ServiceError::AlreadySubscribed);
    }

    match repo.create_subscription(user.id, author_id) {
        Ok(_) => {}
        Err(RepositoryError::ConstraintViolation(_)) => {
            return Err(ServiceError::AlreadySubscribed);
        }
        Err(err) => return Err(err.into()),
    }

    subscription_view(repo, author, true, recipes_limit)
}

/// Stops following `author_id`.
pub fn unsubscribe<R>(repo: &R, user: &User, author_id: i32) -> ServiceResult<()>
where
    R: UserReader + SubscriptionWriter + ?Sized,
{
    if repo.get_user_by_id(author_id)?.is_none() {
        return Err(ServiceError::not_found("user"));
    }

    match repo.delete_subscription(user.id, author_id) {
        Ok(()) => Ok(()),
        Err(RepositoryError::NotFound) => Err(ServiceError::NotSubscribed),
        Err(err) => Err(err.into()),
    }
}

/// Authors the user follows, each with their newest recipes.
pub fn list_subscriptions<R>(
    repo: &R,
    user: &User,
    query: SubscriptionQuery,
) -> ServiceResult<ListPage<SubscriptionView>>
where
    R: SubscriptionReader + RecipeReader + ?Sized,
{
    let recipes_limit = query.recipes_limit();
    let (page, per_page) = PageQuery {
        page: query.page,
        limit: query.limit,
    }
    .resolve();

    let (total, authors) = repo.list_subscribed_authors(
        user.id,
        Some(Pagination { page, per_page }),
    )?;

    let views = authors
        .into_iter()
        .map(|author| subscription_view(repo, author, true, recipes_limit))
        .collect::<ServiceResult<Vec<_>>>()?;

    Ok(ListPage::new(views, total, page, per_page))
}
