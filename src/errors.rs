use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;

/// Everything the code-assignment service can fail with. Each kind stays
/// distinguishable so the request boundary can map it to its own response.
#[derive(Debug, Error)]
pub enum ShortUrlError {
    #[error("{0}")]
    Validation(String),
    #[error("Short URL not found")]
    NotFound,
    #[error("Code already exists")]
    CodeCollision,
    #[error("URL already exists")]
    UrlCollision,
    #[error("Max tries reached for unique code generation")]
    GenerationExhausted,
    #[error("store error: {0}")]
    Store(anyhow::Error),
}

impl ResponseError for ShortUrlError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::CodeCollision | Self::UrlCollision => StatusCode::CONFLICT,
            // Exhaustion ships on a 200; existing clients key off the
            // `error` field in the body for this case.
            Self::GenerationExhausted => StatusCode::OK,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let Self::Store(source) = self {
            log::error!("store failure: {:#}", source);
            return HttpResponse::InternalServerError()
                .json(serde_json::json!({ "error": "Internal server error" }));
        }

        HttpResponse::build(self.status_code())
            .json(serde_json::json!({ "error": self.to_string() }))
    }
}
