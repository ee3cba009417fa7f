//! Shared fixtures for the integration tests.

use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use pushkind_common::db::{DbPool, establish_connection_pool};

use foodgram::domain::ingredient::{Ingredient, IngredientListQuery, NewIngredient};
use foodgram::domain::tag::{NewTag, Tag};
use foodgram::domain::user::{NewUser, User};
use foodgram::repository::{DieselRepository, IngredientReader, IngredientWriter, TagWriter, UserWriter};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// 1x1 transparent PNG.
#[allow(dead_code)]
pub const TINY_PNG: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";

/// SQLite file with every migration applied, removed again on drop.
pub struct TestDb {
    filename: String,
    pool: DbPool,
}

impl TestDb {
    pub fn new(filename: &str) -> Self {
        std::fs::remove_file(filename).ok();

        let pool = establish_connection_pool(filename).expect("open test database");
        let mut conn = pool.get().expect("check out a connection");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("apply migrations");

        TestDb {
            filename: filename.to_string(),
            pool,
        }
    }

    pub fn repo(&self) -> DieselRepository {
        DieselRepository::new(self.pool.clone())
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        std::fs::remove_file(&self.filename).ok();
        std::fs::remove_file(format!("{}-shm", &self.filename)).ok();
        std::fs::remove_file(format!("{}-wal", &self.filename)).ok();
    }
}

#[allow(dead_code)]
pub fn seed_user(repo: &DieselRepository, username: &str) -> User {
    repo.create_user(&NewUser::new(
        format!("{username}@example.com"),
        username.to_string(),
        "Test".to_string(),
        "User".to_string(),
    ))
    .expect("create user")
}

#[allow(dead_code)]
pub fn seed_tag(repo: &DieselRepository, name: &str, slug: &str) -> Tag {
    repo.create_tag(&NewTag::new(name, slug)).expect("create tag")
}

/// Loads the given `(name, unit)` pairs and returns them in the same order.
#[allow(dead_code)]
pub fn seed_ingredients(repo: &DieselRepository, rows: &[(&str, &str)]) -> Vec<Ingredient> {
    let new_ingredients: Vec<NewIngredient> = rows
        .iter()
        .map(|(name, unit)| NewIngredient::new(*name, *unit))
        .collect();
    repo.create_ingredients(&new_ingredients)
        .expect("create ingredients");

    let all = repo
        .list_ingredients(IngredientListQuery::new())
        .expect("list ingredients");
    rows.iter()
        .map(|(name, unit)| {
            all.iter()
                .find(|i| i.name == *name && i.measurement_unit == *unit)
                .cloned()
                .expect("seeded ingredient is listed")
        })
        .collect()
}
