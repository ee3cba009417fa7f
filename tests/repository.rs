use pushkind_common::pagination::Pagination;

use foodgram::domain::bookmark::BookmarkKind;
use foodgram::domain::recipe::{NewRecipe, NewRecipeIngredient, RecipeListQuery, UpdateRecipe};
use foodgram::domain::user::UserListQuery;
use foodgram::repository::{
    BookmarkReader, BookmarkWriter, RecipeReader, RecipeWriter, RepositoryError,
    ShoppingListReader, SubscriptionReader, SubscriptionWriter, UserReader,
};

mod common;

#[test]
fn test_recipe_create_update_delete() {
    let test_db = common::TestDb::new("test_recipe_create_update_delete.db");
    let repo = test_db.repo();

    let author = common::seed_user(&repo, "author");
    let breakfast = common::seed_tag(&repo, "Завтрак", "breakfast");
    let dinner = common::seed_tag(&repo, "Ужин", "dinner");
    let catalogue = common::seed_ingredients(&repo, &[("Flour", "g"), ("Milk", "ml")]);

    let recipe = repo
        .create_recipe(
            &NewRecipe::new(author.id, "Pancakes", "Mix and fry.", 20)
                .with_image("/media/recipes/images/pancakes.png")
                .with_tags(vec![breakfast.id])
                .with_ingredients(vec![
                    NewRecipeIngredient::new(catalogue[0].id, 200),
                    NewRecipeIngredient::new(catalogue[1].id, 300),
                ])
                .with_site_url("http://localhost:8080"),
        )
        .unwrap();

    assert_eq!(recipe.author_id, author.id);
    assert_eq!(recipe.tags.len(), 1);
    assert_eq!(recipe.ingredients.len(), 2);
    assert_eq!(
        recipe.short_link.as_deref(),
        Some(format!("http://localhost:8080/r/{}/", recipe.id).as_str())
    );

    let updated = repo
        .update_recipe(
            recipe.id,
            &UpdateRecipe::new(
                vec![dinner.id],
                vec![NewRecipeIngredient::new(catalogue[1].id, 500)],
            )
            .name("Crepes"),
        )
        .unwrap();

    assert_eq!(updated.name, "Crepes");
    assert_eq!(updated.text, "Mix and fry.");
    assert_eq!(updated.tags.len(), 1);
    assert_eq!(updated.tags[0].slug, "dinner");
    assert_eq!(updated.ingredients.len(), 1);
    assert_eq!(updated.ingredients[0].name, "Milk");
    assert_eq!(updated.ingredients[0].amount, 500);

    let reader = common::seed_user(&repo, "reader");
    repo.create_bookmark(BookmarkKind::Favorite, reader.id, recipe.id)
        .unwrap();
    repo.create_bookmark(BookmarkKind::ShoppingCart, reader.id, recipe.id)
        .unwrap();

    repo.delete_recipe(recipe.id).unwrap();

    assert!(repo.get_recipe_by_id(recipe.id).unwrap().is_none());
    assert!(
        !repo
            .is_bookmarked(BookmarkKind::Favorite, reader.id, recipe.id)
            .unwrap()
    );
    assert!(repo.list_cart_ingredients(reader.id).unwrap().is_empty());

    let err = repo.delete_recipe(recipe.id).unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound));
}

#[test]
fn test_recipe_list_filters() {
    let test_db = common::TestDb::new("test_recipe_list_filters.db");
    let repo = test_db.repo();

    let alice = common::seed_user(&repo, "alice");
    let bob = common::seed_user(&repo, "bob");
    let breakfast = common::seed_tag(&repo, "Завтрак", "breakfast");
    let lunch = common::seed_tag(&repo, "Обед", "lunch");
    let catalogue = common::seed_ingredients(&repo, &[("Eggs", "pcs")]);

    let make = |author_id: i32, name: &str, tag_id: i32| {
        repo.create_recipe(
            &NewRecipe::new(author_id, name, "text", 10)
                .with_tags(vec![tag_id])
                .with_ingredients(vec![NewRecipeIngredient::new(catalogue[0].id, 2)]),
        )
        .unwrap()
    };

    let omelette = make(alice.id, "Omelette", breakfast.id);
    let soup = make(alice.id, "Soup", lunch.id);
    let toast = make(bob.id, "Toast", breakfast.id);

    let (total, items) = repo.list_recipes(RecipeListQuery::new()).unwrap();
    assert_eq!(total, 3);
    // Newest first.
    assert_eq!(items[0].id, toast.id);

    let (total, items) = repo
        .list_recipes(RecipeListQuery::new().author(alice.id))
        .unwrap();
    assert_eq!(total, 2);
    assert!(items.iter().all(|r| r.author_id == alice.id));

    let (total, _) = repo
        .list_recipes(RecipeListQuery::new().tags(vec!["breakfast".to_string()]))
        .unwrap();
    assert_eq!(total, 2);

    let (total, _) = repo
        .list_recipes(
            RecipeListQuery::new().tags(vec!["breakfast".to_string(), "lunch".to_string()]),
        )
        .unwrap();
    assert_eq!(total, 3);

    repo.create_bookmark(BookmarkKind::Favorite, bob.id, soup.id)
        .unwrap();
    let (total, items) = repo
        .list_recipes(RecipeListQuery::new().viewer(bob.id).favorited(true))
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(items[0].id, soup.id);

    let (total, items) = repo
        .list_recipes(RecipeListQuery::new().paginate(2, 2))
        .unwrap();
    assert_eq!(total, 3);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, omelette.id);

    let (count, summaries) = repo.list_author_recipes(alice.id, Some(1)).unwrap();
    assert_eq!(count, 2);
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].id, soup.id);
}

#[test]
fn test_bookmarks_are_unique_per_user_and_recipe() {
    let test_db = common::TestDb::new("test_bookmarks_are_unique.db");
    let repo = test_db.repo();

    let author = common::seed_user(&repo, "author");
    let recipe = repo
        .create_recipe(&NewRecipe::new(author.id, "Tea", "Boil water.", 5))
        .unwrap();

    repo.create_bookmark(BookmarkKind::Favorite, author.id, recipe.id)
        .unwrap();
    let err = repo
        .create_bookmark(BookmarkKind::Favorite, author.id, recipe.id)
        .unwrap_err();
    assert!(matches!(err, RepositoryError::ConstraintViolation(_)));

    // The shopping cart is a separate list.
    repo.create_bookmark(BookmarkKind::ShoppingCart, author.id, recipe.id)
        .unwrap();

    let ids = repo
        .list_bookmarked_ids(BookmarkKind::Favorite, author.id, &[recipe.id, recipe.id + 1])
        .unwrap();
    assert_eq!(ids, vec![recipe.id]);

    repo.delete_bookmark(BookmarkKind::Favorite, author.id, recipe.id)
        .unwrap();
    let err = repo
        .delete_bookmark(BookmarkKind::Favorite, author.id, recipe.id)
        .unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound));
}

#[test]
fn test_subscription_constraints() {
    let test_db = common::TestDb::new("test_subscription_constraints.db");
    let repo = test_db.repo();

    let alice = common::seed_user(&repo, "alice");
    let bob = common::seed_user(&repo, "bob");

    let err = repo.create_subscription(alice.id, alice.id).unwrap_err();
    assert!(matches!(err, RepositoryError::ConstraintViolation(_)));

    repo.create_subscription(alice.id, bob.id).unwrap();
    assert!(repo.is_subscribed(alice.id, bob.id).unwrap());
    assert!(!repo.is_subscribed(bob.id, alice.id).unwrap());

    let err = repo.create_subscription(alice.id, bob.id).unwrap_err();
    assert!(matches!(err, RepositoryError::ConstraintViolation(_)));

    let (total, authors) = repo.list_subscribed_authors(alice.id, None).unwrap();
    assert_eq!(total, 1);
    assert_eq!(authors[0].id, bob.id);

    repo.delete_subscription(alice.id, bob.id).unwrap();
    let err = repo.delete_subscription(alice.id, bob.id).unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound));
}

#[test]
fn test_pages_far_past_the_end_are_empty() {
    let test_db = common::TestDb::new("test_pages_far_past_the_end.db");
    let repo = test_db.repo();

    let alice = common::seed_user(&repo, "alice");
    let bob = common::seed_user(&repo, "bob");
    repo.create_recipe(&NewRecipe::new(alice.id, "Tea", "Boil water.", 5))
        .unwrap();
    repo.create_subscription(alice.id, bob.id).unwrap();

    let (total, items) = repo
        .list_recipes(RecipeListQuery::new().paginate(usize::MAX, 10))
        .unwrap();
    assert_eq!(total, 1);
    assert!(items.is_empty());

    let (total, users) = repo
        .list_users(UserListQuery::new().paginate(usize::MAX, 10))
        .unwrap();
    assert_eq!(total, 2);
    assert!(users.is_empty());

    let (total, authors) = repo
        .list_subscribed_authors(
            alice.id,
            Some(Pagination {
                page: usize::MAX,
                per_page: 10,
            }),
        )
        .unwrap();
    assert_eq!(total, 1);
    assert!(authors.is_empty());
}
