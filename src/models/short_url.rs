use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ShortUrl {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub code: String,
    pub url: String,
    #[serde(default)]
    pub clicks: i64, // Number of redirects served for this code
    pub last_clicked_at: Option<i64>,
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
}

impl ShortUrl {
    pub fn new(url: String, code: String) -> Self {
        let now = chrono::Utc::now().timestamp_millis();

        Self {
            id: None,
            code,
            url,
            clicks: 0,
            last_clicked_at: None,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }
}
