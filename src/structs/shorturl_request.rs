use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::short_url::ShortUrl;

#[derive(Deserialize, Serialize, Validate)]
pub struct CreateShortUrlRequest {
    #[validate(url(message = "Invalid URL format"))]
    pub url: Option<String>,
}

#[derive(Deserialize, Serialize, Validate)]
pub struct UpdateShortUrlRequest {
    #[validate(url(message = "Invalid URL format"))]
    pub url: Option<String>,
}

#[derive(Deserialize)]
pub struct ListShortUrlsParams {
    pub q: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<i64>,
}

/// Wire shape of a record; field names follow the legacy camelCase contract.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortUrlResponse {
    pub id: Option<String>,
    pub code: String,
    pub url: String,
    pub clicks: i64,
    pub last_clicked_at: Option<i64>,
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
}

impl From<ShortUrl> for ShortUrlResponse {
    fn from(record: ShortUrl) -> Self {
        Self {
            id: record.id.map(|oid| oid.to_hex()),
            code: record.code,
            url: record.url,
            clicks: record.clicks,
            last_clicked_at: record.last_clicked_at,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}
