use std::sync::Arc;

use chrono::Utc;

use crate::errors::ShortUrlError;
use crate::models::short_url::ShortUrl;
use crate::repo::{ListQuery, ShortUrlRepo, ShortUrlUpdate};
use crate::services::codegen::generate_code;

/// Total candidates minted per update: one initial draw plus five retries.
pub const MAX_CODE_ATTEMPTS: usize = 6;

const DEFAULT_PAGE: u64 = 1;
const DEFAULT_LIMIT: i64 = 10;

/// Assigns codes and resolves their uniqueness against the record store.
#[derive(Clone)]
pub struct ShortUrlService {
    repo: Arc<dyn ShortUrlRepo>,
}

impl ShortUrlService {
    pub fn new(repo: Arc<dyn ShortUrlRepo>) -> Self {
        Self { repo }
    }

    /// Shorten a URL under a single freshly drawn code.
    ///
    /// One candidate only: a code collision fails the request instead of
    /// retrying, and shortening an already-shortened URL is refused rather
    /// than deduplicated. A concurrent writer racing past the existence
    /// checks hits the store's unique constraints and surfaces as the same
    /// conflict.
    pub async fn create(&self, url: &str) -> Result<ShortUrl, ShortUrlError> {
        self.create_with(url, generate_code).await
    }

    async fn create_with<F>(&self, url: &str, mut draw: F) -> Result<ShortUrl, ShortUrlError>
    where
        F: FnMut() -> String,
    {
        let code = draw();
        if self.repo.find_by_code(&code).await?.is_some() {
            return Err(ShortUrlError::CodeCollision);
        }
        if self.repo.find_by_url(url).await?.is_some() {
            return Err(ShortUrlError::UrlCollision);
        }
        self.repo.insert(ShortUrl::new(url.to_string(), code)).await
    }

    pub async fn get(&self, code: &str) -> Result<ShortUrl, ShortUrlError> {
        self.repo
            .find_by_code(code)
            .await?
            .ok_or(ShortUrlError::NotFound)
    }

    /// Every update mints a replacement code, whether or not the target
    /// moves. Changing the target also wipes the click history, which
    /// belongs to the old URL.
    pub async fn update(
        &self,
        code: &str,
        new_url: Option<&str>,
    ) -> Result<ShortUrl, ShortUrlError> {
        self.update_with(code, new_url, generate_code).await
    }

    async fn update_with<F>(
        &self,
        code: &str,
        new_url: Option<&str>,
        mut draw: F,
    ) -> Result<ShortUrl, ShortUrlError>
    where
        F: FnMut() -> String,
    {
        let existing = self
            .repo
            .find_by_code(code)
            .await?
            .ok_or(ShortUrlError::NotFound)?;

        let mut replacement = None;
        for _ in 0..MAX_CODE_ATTEMPTS {
            let candidate = draw();
            // the replacement must differ from the code being retired
            if candidate == code {
                continue;
            }
            if self.repo.find_by_code(&candidate).await?.is_none() {
                replacement = Some(candidate);
                break;
            }
        }
        // Exhaustion leaves the record untouched; nothing was written yet.
        let new_code = replacement.ok_or(ShortUrlError::GenerationExhausted)?;

        let url_change = match new_url {
            Some(url) if url != existing.url.as_str() => {
                if self.repo.find_by_url(url).await?.is_some() {
                    return Err(ShortUrlError::UrlCollision);
                }
                Some(url.to_string())
            }
            _ => None,
        };

        self.repo
            .apply(
                code,
                ShortUrlUpdate {
                    code: new_code,
                    url: url_change,
                    updated_at: Utc::now().timestamp_millis(),
                },
            )
            .await
    }

    /// Resolve a code to its record, counting the click in the same store
    /// write so concurrent redirects never lose an increment.
    pub async fn record_click(&self, code: &str) -> Result<ShortUrl, ShortUrlError> {
        self.repo
            .record_click(code, Utc::now().timestamp_millis())
            .await?
            .ok_or(ShortUrlError::NotFound)
    }

    pub async fn delete(&self, code: &str) -> Result<(), ShortUrlError> {
        if self.repo.delete_by_code(code).await? {
            Ok(())
        } else {
            Err(ShortUrlError::NotFound)
        }
    }

    /// List in creation order. Page and limit fall back to 1 / 10 when
    /// missing or non-positive.
    pub async fn list(
        &self,
        q: Option<String>,
        page: Option<u64>,
        limit: Option<i64>,
    ) -> Result<Vec<ShortUrl>, ShortUrlError> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT);
        let query = ListQuery {
            q: q.filter(|term| !term.is_empty()),
            page: page.unwrap_or(DEFAULT_PAGE).max(1),
            limit: if limit < 1 { DEFAULT_LIMIT } else { limit },
        };
        self.repo.list(&query).await
    }

    pub async fn ping(&self) -> Result<(), ShortUrlError> {
        self.repo.ping().await
    }
}
