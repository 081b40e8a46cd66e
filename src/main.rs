use actix_files::Files;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::{App, HttpServer, middleware, web};
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
use dotenvy::dotenv;
use tera::Tera;

use pushkind_hotels::config::ServerConfig;
use pushkind_hotels::db::establish_connection_pool;
use pushkind_hotels::repository::DieselRepository;
use pushkind_hotels::routes::api::api_v1_draft;
use pushkind_hotels::routes::booking::{
    apply_promo, clear_promo, save_details, show_confirmation, show_details, show_payment,
    submit_payment,
};
use pushkind_hotels::routes::form_error_handler;
use pushkind_hotels::routes::hotels::{
    add_room, decrement_room, increment_room, remove_room, show_hotel, toggle_package,
    update_packages, update_room,
};
use pushkind_hotels::routes::main::{search, show_index};
use pushkind_hotels::routes::wishlist::{show_wishlist, toggle_wishlist};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    dotenv().ok(); // Load .env file

    let server_config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let secret_key = match &server_config.secret {
        Some(key) => match Key::try_from(key.as_bytes()) {
            Ok(key) => key,
            Err(e) => {
                log::error!("SECRET_KEY must be at least 64 bytes: {e}");
                std::process::exit(1);
            }
        },
        None => {
            log::warn!("SECRET_KEY not set, sessions will not survive a restart");
            Key::generate()
        }
    };

    let pool = match establish_connection_pool(&server_config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };
    let repo = DieselRepository::new(pool);

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = match Tera::new("templates/**/*") {
        Ok(t) => t,
        Err(e) => {
            log::error!("Parsing error(s): {e}");
            std::process::exit(1);
        }
    };

    let cookie_domain = match server_config.domain.as_str() {
        "localhost" => None,
        domain => Some(format!(".{domain}")),
    };

    let address = server_config.address.clone();
    let port = server_config.port;
    log::info!("Listening on {address}:{port}");

    HttpServer::new(move || {
        App::new()
            .wrap(message_framework.clone())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(server_config.secure_cookies)
                    .cookie_domain(cookie_domain.clone())
                    .build(),
            )
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .app_data(web::FormConfig::default().error_handler(form_error_handler))
            .service(Files::new("/assets", "./assets"))
            .service(show_index)
            .service(search)
            .service(show_hotel)
            .service(add_room)
            .service(update_room)
            .service(remove_room)
            .service(increment_room)
            .service(decrement_room)
            .service(update_packages)
            .service(toggle_package)
            .service(apply_promo)
            .service(clear_promo)
            .service(show_details)
            .service(save_details)
            .service(show_payment)
            .service(submit_payment)
            .service(show_confirmation)
            .service(show_wishlist)
            .service(toggle_wishlist)
            .service(api_v1_draft)
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(server_config.clone()))
    })
    .bind((address, port))?
    .run()
    .await
}
