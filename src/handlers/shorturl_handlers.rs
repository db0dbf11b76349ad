use actix_web::{HttpResponse, http, web};
use validator::Validate;

use crate::errors::ShortUrlError;
use crate::state::app_state::AppState;
use crate::structs::shorturl_request::{
    CreateShortUrlRequest, ListShortUrlsParams, ShortUrlResponse, UpdateShortUrlRequest,
};

/// Create a shortened URL
pub async fn create_short_url(
    app_state: web::Data<AppState>,
    web::Json(req): web::Json<CreateShortUrlRequest>,
) -> Result<HttpResponse, ShortUrlError> {
    // An absent or empty url is "missing"; format problems are a separate 400
    let url = match req.url.as_deref() {
        Some(url) if !url.is_empty() => url,
        _ => return Err(ShortUrlError::Validation("URL is required".to_string())),
    };
    if let Err(errors) = req.validate() {
        return Ok(HttpResponse::BadRequest().json(errors));
    }

    let record = app_state.service.create(url).await?;
    Ok(HttpResponse::Created().json(ShortUrlResponse::from(record)))
}

pub async fn get_short_url(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ShortUrlError> {
    let code = path.into_inner();
    let record = app_state.service.get(&code).await?;
    Ok(HttpResponse::Ok().json(ShortUrlResponse::from(record)))
}

pub async fn list_short_urls(
    app_state: web::Data<AppState>,
    query: web::Query<ListShortUrlsParams>,
) -> Result<HttpResponse, ShortUrlError> {
    let params = query.into_inner();
    let records = app_state
        .service
        .list(params.q, params.page, params.limit)
        .await?;

    let response: Vec<ShortUrlResponse> =
        records.into_iter().map(ShortUrlResponse::from).collect();
    Ok(HttpResponse::Ok().json(response))
}

/// Update a record by its current code; the code is reassigned either way.
pub async fn update_short_url(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
    web::Json(req): web::Json<UpdateShortUrlRequest>,
) -> Result<HttpResponse, ShortUrlError> {
    let code = path.into_inner();

    // An empty url means "keep the current target"
    let new_url = req.url.as_deref().filter(|url| !url.is_empty());
    if new_url.is_some() {
        if let Err(errors) = req.validate() {
            return Ok(HttpResponse::BadRequest().json(errors));
        }
    }

    let record = app_state.service.update(&code, new_url).await?;
    Ok(HttpResponse::Ok().json(ShortUrlResponse::from(record)))
}

pub async fn delete_short_url(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ShortUrlError> {
    let code = path.into_inner();
    app_state.service.delete(&code).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Short URL deleted" })))
}

/// Redirect to the target URL, recording the click in the same store write
pub async fn redirect_to_url(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ShortUrlError> {
    let code = path.into_inner();
    let record = app_state.service.record_click(&code).await?;

    Ok(HttpResponse::Found()
        .append_header((http::header::LOCATION, record.url))
        .finish())
}
