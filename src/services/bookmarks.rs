use crate::domain::bookmark::BookmarkKind;
use crate::domain::recipe::RecipeSummary;
use crate::domain::user::User;
use crate::repository::{BookmarkReader, BookmarkWriter, RecipeReader, RepositoryError};
use crate::services::{ServiceError, ServiceResult};

/// Adds a recipe to the user's favourites or shopping cart.
pub fn add_bookmark<R>(
    repo: &R,
    user: &User,
    recipe_id: i32,
    kind: BookmarkKind,
) -> ServiceResult<RecipeSummary>
where
    R: RecipeReader + BookmarkReader + BookmarkWriter + ?Sized,
{
    let recipe = repo
        .get_recipe_by_id(recipe_id)?
        .ok_or_else(|| ServiceError::not_found("recipe"))?;

    if repo.is_bookmarked(kind, user.id, recipe_id)? {
        return Err(ServiceError::AlreadyAdded(kind));
    }

    match repo.create_bookmark(kind, user.id, recipe_id) {
        Ok(()) => Ok(RecipeSummary::from(&recipe)),
        // The unique pair was inserted concurrently.
        Err(RepositoryError::ConstraintViolation(_)) => Err(ServiceError::AlreadyAdded(kind)),
        Err(err) => Err(err.into()),
    }
}

/// Removes a recipe from the user's favourites or shopping cart.
pub fn remove_bookmark<R>(
    repo: &R,
    user: &User,
    recipe_id: i32,
    kind: BookmarkKind,
) -> ServiceResult<()>
where
    R: RecipeReader + BookmarkWriter + ?Sized,
{
    if repo.get_recipe_by_id(recipe_id)?.is_none() {
        return Err(ServiceError::not_found("recipe"));
    }

    match repo.delete_bookmark(kind, user.id, recipe_id) {
        Ok(()) => Ok(()),
        Err(RepositoryError::NotFound) => Err(ServiceError::NotAdded(kind)),
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{sample_recipe, sample_user};

    fn repo_with_recipe() -> MockRepository {
        let mut repo = MockRepository::new();
        repo.expect_get_recipe_by_id().returning(|id| {
            if id == 1 {
                Ok(Some(sample_recipe(1, 5)))
            } else {
                Ok(None)
            }
        });
        repo
    }

    #[test]
    fn add_bookmark_returns_summary() {
        let mut repo = repo_with_recipe();
        repo.expect_is_bookmarked().returning(|_, _, _| Ok(false));
        repo.expect_create_bookmark()
            .times(1)
            .withf(|kind, user_id, recipe_id| {
                *kind == BookmarkKind::ShoppingCart && *user_id == 2 && *recipe_id == 1
            })
            .returning(|_, _, _| Ok(()));

        let summary = add_bookmark(&repo, &sample_user(2, "me"), 1, BookmarkKind::ShoppingCart)
            .expect("expected summary");

        assert_eq!(summary.id, 1);
        assert_eq!(summary.name, "Recipe 1");
        assert_eq!(summary.cooking_time, 25);
    }

    #[test]
    fn favoriting_twice_is_a_conflict() {
        let mut repo = repo_with_recipe();
        repo.expect_is_bookmarked().returning(|_, _, _| Ok(true));
        repo.expect_create_bookmark().times(0);

        let result = add_bookmark(&repo, &sample_user(2, "me"), 1, BookmarkKind::Favorite);

        assert!(matches!(
            result,
            Err(ServiceError::AlreadyAdded(BookmarkKind::Favorite))
        ));
    }

    #[test]
    fn lost_race_is_reported_as_already_added() {
        let mut repo = repo_with_recipe();
        repo.expect_is_bookmarked().returning(|_, _, _| Ok(false));
        repo.expect_create_bookmark().returning(|_, _, _| {
            Err(RepositoryError::ConstraintViolation(
                "UNIQUE constraint failed".to_string(),
            ))
        });

        let result = add_bookmark(&repo, &sample_user(2, "me"), 1, BookmarkKind::Favorite);

        assert!(matches!(result, Err(ServiceError::AlreadyAdded(_))));
    }

    #[test]
    fn bookmarking_missing_recipe_is_not_found() {
        let repo = repo_with_recipe();

        let result = add_bookmark(&repo, &sample_user(2, "me"), 9, BookmarkKind::Favorite);

        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }

    #[test]
    fn removing_absent_bookmark_is_not_added() {
        let mut repo = repo_with_recipe();
        repo.expect_delete_bookmark()
            .returning(|_, _, _| Err(RepositoryError::NotFound));

        let result = remove_bookmark(&repo, &sample_user(2, "me"), 1, BookmarkKind::Favorite);

        assert!(matches!(
            result,
            Err(ServiceError::NotAdded(BookmarkKind::Favorite))
        ));
    }

    #[test]
    fn remove_bookmark_deletes_row() {
        let mut repo = repo_with_recipe();
        repo.expect_delete_bookmark()
            .times(1)
            .returning(|_, _, _| Ok(()));

        remove_bookmark(&repo, &sample_user(2, "me"), 1, BookmarkKind::ShoppingCart)
            .expect("expected removal");
    }
}
