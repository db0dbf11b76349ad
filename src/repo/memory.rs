//! In-memory repository backing the unit tests. Uniqueness is enforced
//! under a single lock, mirroring what the unique indexes give the real
//! store.

use std::sync::Mutex;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::errors::ShortUrlError;
use crate::models::short_url::ShortUrl;

use super::{ListQuery, ShortUrlRepo, ShortUrlUpdate};

#[derive(Default)]
pub struct MemoryShortUrlRepo {
    records: Mutex<Vec<ShortUrl>>,
}

impl MemoryShortUrlRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ShortUrlRepo for MemoryShortUrlRepo {
    async fn find_by_code(&self, code: &str) -> Result<Option<ShortUrl>, ShortUrlError> {
        let records = self.records.lock().unwrap();
        Ok(records.iter().find(|r| r.code == code).cloned())
    }

    async fn find_by_url(&self, url: &str) -> Result<Option<ShortUrl>, ShortUrlError> {
        let records = self.records.lock().unwrap();
        Ok(records.iter().find(|r| r.url == url).cloned())
    }

    async fn insert(&self, mut record: ShortUrl) -> Result<ShortUrl, ShortUrlError> {
        let mut records = self.records.lock().unwrap();
        if records.iter().any(|r| r.code == record.code) {
            return Err(ShortUrlError::CodeCollision);
        }
        if records.iter().any(|r| r.url == record.url) {
            return Err(ShortUrlError::UrlCollision);
        }
        record.id = Some(ObjectId::new());
        records.push(record.clone());
        Ok(record)
    }

    async fn apply(
        &self,
        current_code: &str,
        change: ShortUrlUpdate,
    ) -> Result<ShortUrl, ShortUrlError> {
        let mut records = self.records.lock().unwrap();
        if records
            .iter()
            .any(|r| r.code != current_code && r.code == change.code)
        {
            return Err(ShortUrlError::CodeCollision);
        }
        if let Some(url) = &change.url {
            if records
                .iter()
                .any(|r| r.code != current_code && &r.url == url)
            {
                return Err(ShortUrlError::UrlCollision);
            }
        }

        let record = records
            .iter_mut()
            .find(|r| r.code == current_code)
            .ok_or(ShortUrlError::NotFound)?;
        record.code = change.code;
        if let Some(url) = change.url {
            record.url = url;
            record.clicks = 0;
            record.last_clicked_at = None;
        }
        record.updated_at = Some(change.updated_at);
        Ok(record.clone())
    }

    async fn record_click(&self, code: &str, at: i64) -> Result<Option<ShortUrl>, ShortUrlError> {
        let mut records = self.records.lock().unwrap();
        Ok(records.iter_mut().find(|r| r.code == code).map(|record| {
            record.clicks += 1;
            record.last_clicked_at = Some(at);
            record.updated_at = Some(at);
            record.clone()
        }))
    }

    async fn delete_by_code(&self, code: &str) -> Result<bool, ShortUrlError> {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| r.code != code);
        Ok(records.len() < before)
    }

    async fn list(&self, query: &ListQuery) -> Result<Vec<ShortUrl>, ShortUrlError> {
        let records = self.records.lock().unwrap();
        let skip = ((query.page - 1) as usize).saturating_mul(query.limit as usize);
        Ok(records
            .iter()
            .filter(|r| match &query.q {
                Some(term) => {
                    let term = term.to_lowercase();
                    r.url.to_lowercase().contains(&term) || r.code.to_lowercase().contains(&term)
                }
                None => true,
            })
            .skip(skip)
            .take(query.limit as usize)
            .cloned()
            .collect())
    }

    async fn ping(&self) -> Result<(), ShortUrlError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The service pre-checks uniqueness before writing; these cover the
    // constraint backstop that catches a racer slipping past those checks.

    #[actix_web::test]
    async fn insert_refuses_duplicates_even_after_clean_prechecks() {
        let repo = MemoryShortUrlRepo::new();
        repo.insert(ShortUrl::new(
            "https://example.com".to_string(),
            "abc123".to_string(),
        ))
        .await
        .unwrap();

        let err = repo
            .insert(ShortUrl::new(
                "https://example.com".to_string(),
                "xyz789".to_string(),
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, ShortUrlError::UrlCollision));

        let err = repo
            .insert(ShortUrl::new(
                "https://example.org".to_string(),
                "abc123".to_string(),
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, ShortUrlError::CodeCollision));
    }

    #[actix_web::test]
    async fn apply_refuses_a_url_held_by_another_record() {
        let repo = MemoryShortUrlRepo::new();
        repo.insert(ShortUrl::new(
            "https://example.com".to_string(),
            "abc123".to_string(),
        ))
        .await
        .unwrap();
        repo.insert(ShortUrl::new(
            "https://example.org".to_string(),
            "xyz789".to_string(),
        ))
        .await
        .unwrap();

        let err = repo
            .apply(
                "xyz789",
                ShortUrlUpdate {
                    code: "fresh42".to_string(),
                    url: Some("https://example.com".to_string()),
                    updated_at: 0,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ShortUrlError::UrlCollision));
    }
}
