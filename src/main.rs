mod config;
mod db;
mod errors;
mod handlers;
mod models;
mod repo;
mod routes;
mod services;
mod state;
mod structs;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, http, middleware::Logger, web};
use dotenv::dotenv;
use env_logger::Env;

use crate::config::Config;
use crate::db::mongodb::get_database;
use crate::repo::mongo::MongoShortUrlRepo;
use crate::routes::init_routes;
use crate::services::shorturl::ShortUrlService;
use crate::state::app_state::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize the database connection
    let db = match get_database(&config.database).await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Error connecting to the database: {}", e);
            std::process::exit(1);
        }
    };

    // The unique indexes on `code` and `url` must exist before any request
    let repo = MongoShortUrlRepo::new(&db);
    if let Err(e) = repo.ensure_indexes().await {
        eprintln!("Error creating unique indexes: {}", e);
        std::process::exit(1);
    }

    // Create shared state
    let app_state = web::Data::new(AppState {
        service: ShortUrlService::new(Arc::new(repo)),
    });

    let bind_addr = (config.host.clone(), config.port);
    let cors_origins = config.cors_origins.clone();
    log::info!("Server listening on {}:{}", config.host, config.port);

    // Start the Actix Web server
    HttpServer::new(move || {
        // Create a logger with a custom format instead
        let logger = Logger::new("%a \"%r\" %s %b \"%{Referer}i\" \"%{User-Agent}i\" %D ms");
        // Enable CORS for the configured front-end origins
        let cors = cors_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
            .allowed_headers(vec![http::header::ACCEPT, http::header::CONTENT_TYPE])
            .max_age(3600);
        App::new()
            .wrap(logger)
            .wrap(cors)
            .app_data(app_state.clone())
            .configure(init_routes)
    })
    .bind(bind_addr)?
    .run()
    .await
}
