#[cfg(test)]
pub mod memory;
pub mod mongo;

use async_trait::async_trait;

use crate::errors::ShortUrlError;
use crate::models::short_url::ShortUrl;

/// One code reassignment, applied to a record as a single write.
pub struct ShortUrlUpdate {
    pub code: String,
    /// New target, when it changes. Changing the target also resets `clicks`
    /// and `last_clicked_at`; the click history belongs to the old URL.
    pub url: Option<String>,
    pub updated_at: i64,
}

pub struct ListQuery {
    /// Literal substring matched case-insensitively against `url` or `code`.
    pub q: Option<String>,
    pub page: u64,
    pub limit: i64,
}

/// Store operations the assignment service needs. The store's unique
/// constraints on `code` and `url` are the actual uniqueness guarantee;
/// implementations map violated writes to the collision errors.
#[async_trait]
pub trait ShortUrlRepo: Send + Sync + 'static {
    async fn find_by_code(&self, code: &str) -> Result<Option<ShortUrl>, ShortUrlError>;

    async fn find_by_url(&self, url: &str) -> Result<Option<ShortUrl>, ShortUrlError>;

    /// Insert a new record, returning it with its store-assigned id.
    async fn insert(&self, record: ShortUrl) -> Result<ShortUrl, ShortUrlError>;

    /// Apply a reassignment to the record currently holding `current_code`,
    /// atomically, returning the updated record.
    async fn apply(
        &self,
        current_code: &str,
        change: ShortUrlUpdate,
    ) -> Result<ShortUrl, ShortUrlError>;

    /// Atomically increment `clicks` and stamp `last_clicked_at`, returning
    /// the updated record, or `None` when no record holds the code.
    async fn record_click(&self, code: &str, at: i64) -> Result<Option<ShortUrl>, ShortUrlError>;

    /// Returns whether a record was actually removed.
    async fn delete_by_code(&self, code: &str) -> Result<bool, ShortUrlError>;

    /// List matching records in creation order.
    async fn list(&self, query: &ListQuery) -> Result<Vec<ShortUrl>, ShortUrlError>;

    async fn ping(&self) -> Result<(), ShortUrlError>;
}
