use actix_files::Files;
use actix_identity::IdentityMiddleware;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::{App, HttpServer, middleware, web};
use dotenvy::dotenv;
use pushkind_common::db::establish_connection_pool;

use foodgram::config::ServerConfig;
use foodgram::images::FsImageStore;
use foodgram::repository::DieselRepository;
use foodgram::routes::ingredients::{show_ingredient, show_ingredients, upload_ingredients};
use foodgram::routes::{json_error_handler, query_error_handler};
use foodgram::routes::links::follow_short_link;
use foodgram::routes::recipes::{
    add_favorite, add_recipe, add_to_shopping_cart, destroy_recipe, download_shopping_cart,
    edit_recipe, remove_favorite, remove_from_shopping_cart, show_recipe, show_recipes,
    show_short_link,
};
use foodgram::routes::tags::{add_tag, show_tag, show_tags};
use foodgram::routes::users::{
    add_subscription, edit_me, put_avatar, remove_avatar, remove_subscription, show_me,
    show_subscriptions, show_user, show_users,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    dotenv().ok(); // Load .env file

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let secret_key = if config.secret.is_empty() {
        Key::generate()
    } else {
        Key::from(config.secret.as_bytes())
    };

    let pool = match establish_connection_pool(&config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };
    let repo = DieselRepository::new(pool);

    if let Err(e) = std::fs::create_dir_all(&config.media_root) {
        log::error!("Failed to create media directory {}: {e}", config.media_root);
        std::process::exit(1);
    }
    let images = FsImageStore::new(&config.media_root, &config.media_url);

    let common_config = config.common();
    let address = config.address.clone();
    let port = config.port;

    log::info!("Starting server on {address}:{port}");

    HttpServer::new(move || {
        App::new()
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .cookie_domain(Some(format!(".{}", config.domain)))
                    .build(),
            )
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .service(Files::new(&config.media_url, &config.media_root))
            .service(follow_short_link)
            .service(
                web::scope("/api")
                    .service(show_tags)
                    .service(show_tag)
                    .service(add_tag)
                    .service(show_ingredients)
                    .service(show_ingredient)
                    .service(upload_ingredients)
                    .service(download_shopping_cart)
                    .service(show_recipes)
                    .service(add_recipe)
                    .service(show_recipe)
                    .service(edit_recipe)
                    .service(destroy_recipe)
                    .service(show_short_link)
                    .service(add_favorite)
                    .service(remove_favorite)
                    .service(add_to_shopping_cart)
                    .service(remove_from_shopping_cart)
                    .service(show_users)
                    .service(show_me)
                    .service(edit_me)
                    .service(put_avatar)
                    .service(remove_avatar)
                    .service(show_subscriptions)
                    .service(show_user)
                    .service(add_subscription)
                    .service(remove_subscription),
            )
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(images.clone()))
            .app_data(web::Data::new(config.clone()))
            .app_data(web::Data::new(common_config.clone()))
    })
    .bind((address, port))?
    .run()
    .await
}
