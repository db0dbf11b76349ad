use actix_web::{HttpResponse, web};

use crate::state::app_state::AppState;

pub async fn health_check(app_state: web::Data<AppState>) -> HttpResponse {
    // Ping the store so a dead connection shows up here, not on a redirect
    match app_state.service.ping().await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "ok": true })),
        Err(e) => {
            log::error!("health check failed: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({ "ok": false }))
        }
    }
}
