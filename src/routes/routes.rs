use actix_web::web;

use crate::handlers::health_handlers::health_check;
use crate::handlers::shorturl_handlers::{
    create_short_url, delete_short_url, get_short_url, list_short_urls, redirect_to_url,
    update_short_url,
};

/// Configure the routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/shorturls")
            .route("", web::get().to(list_short_urls))
            .route("", web::post().to(create_short_url))
            .route("/{code}", web::get().to(get_short_url))
            .route("/{code}", web::put().to(update_short_url))
            .route("/{code}", web::delete().to(delete_short_url)),
    );
    cfg.route("/healthz", web::get().to(health_check));
    // Registered last so it cannot shadow the routes above
    cfg.route("/{code}", web::get().to(redirect_to_url));
}
