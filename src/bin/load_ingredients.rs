//! Imports the ingredient catalogue from a CSV file of
//! `name,measurement_unit` rows.
//!
//! Usage: `load_ingredients [path]` (defaults to `data/ingredients.csv`).

use std::env;
use std::fs::File;

use dotenvy::dotenv;
use pushkind_common::db::establish_connection_pool;

use foodgram::forms::ingredients::parse_ingredients;
use foodgram::repository::{DieselRepository, IngredientWriter};

const DEFAULT_PATH: &str = "data/ingredients.csv";

fn main() {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    dotenv().ok();

    let path = env::args().nth(1).unwrap_or(DEFAULT_PATH.to_string());
    let database_url = env::var("DATABASE_URL").unwrap_or("app.db".to_string());

    let file = match File::open(&path) {
        Ok(file) => file,
        Err(e) => {
            log::error!("Failed to open {path}: {e}");
            std::process::exit(1);
        }
    };

    let ingredients = match parse_ingredients(file) {
        Ok(ingredients) => ingredients,
        Err(e) => {
            log::error!("Failed to parse {path}: {e}");
            std::process::exit(1);
        }
    };

    let pool = match establish_connection_pool(&database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };
    let repo = DieselRepository::new(pool);

    match repo.create_ingredients(&ingredients) {
        Ok(created) => log::info!(
            "Created {created} ingredients, {} already existed",
            ingredients.len() - created
        ),
        Err(e) => {
            log::error!("Failed to import ingredients: {e}");
            std::process::exit(1);
        }
    }
}
