use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{Bson, doc};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{IndexOptions, ReturnDocument};
use mongodb::{Collection, Database, IndexModel};

use crate::errors::ShortUrlError;
use crate::models::short_url::ShortUrl;

use super::{ListQuery, ShortUrlRepo, ShortUrlUpdate};

const COLLECTION: &str = "shorturls";
const CODE_INDEX: &str = "code_1";
const URL_INDEX: &str = "url_1";

pub struct MongoShortUrlRepo {
    db: Database,
    collection: Collection<ShortUrl>,
}

impl MongoShortUrlRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            db: db.clone(),
            collection: db.collection::<ShortUrl>(COLLECTION),
        }
    }

    /// The unique indexes are what actually guarantees uniqueness; the
    /// pre-write existence checks in the service only produce friendlier
    /// conflicts. Must run before the server starts taking requests.
    pub async fn ensure_indexes(&self) -> anyhow::Result<()> {
        let code_index = IndexModel::builder()
            .keys(doc! { "code": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name(CODE_INDEX.to_string())
                    .build(),
            )
            .build();
        let url_index = IndexModel::builder()
            .keys(doc! { "url": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name(URL_INDEX.to_string())
                    .build(),
            )
            .build();
        self.collection
            .create_indexes([code_index, url_index])
            .await?;
        Ok(())
    }
}

/// Map a duplicate-key write (E11000) to the collision for the violated
/// index; the server names the index in the error message.
fn write_conflict(err: &mongodb::error::Error) -> Option<ShortUrlError> {
    let message = match &*err.kind {
        ErrorKind::Write(WriteFailure::WriteError(write)) if write.code == 11000 => &write.message,
        ErrorKind::Command(command) if command.code == 11000 => &command.message,
        _ => return None,
    };

    if message.contains(URL_INDEX) {
        Some(ShortUrlError::UrlCollision)
    } else if message.contains(CODE_INDEX) {
        Some(ShortUrlError::CodeCollision)
    } else {
        None
    }
}

fn store_error(err: mongodb::error::Error) -> ShortUrlError {
    match write_conflict(&err) {
        Some(conflict) => conflict,
        None => ShortUrlError::Store(err.into()),
    }
}

/// Escape regex metacharacters so the search term matches as a literal
/// substring.
fn escape_regex(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if "\\^$.|?*+()[]{}".contains(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[async_trait]
impl ShortUrlRepo for MongoShortUrlRepo {
    async fn find_by_code(&self, code: &str) -> Result<Option<ShortUrl>, ShortUrlError> {
        self.collection
            .find_one(doc! { "code": code })
            .await
            .map_err(store_error)
    }

    async fn find_by_url(&self, url: &str) -> Result<Option<ShortUrl>, ShortUrlError> {
        self.collection
            .find_one(doc! { "url": url })
            .await
            .map_err(store_error)
    }

    async fn insert(&self, mut record: ShortUrl) -> Result<ShortUrl, ShortUrlError> {
        let result = self
            .collection
            .insert_one(&record)
            .await
            .map_err(store_error)?;
        record.id = result.inserted_id.as_object_id();
        Ok(record)
    }

    async fn apply(
        &self,
        current_code: &str,
        change: ShortUrlUpdate,
    ) -> Result<ShortUrl, ShortUrlError> {
        let mut set = doc! { "code": &change.code, "updated_at": change.updated_at };
        if let Some(url) = &change.url {
            set.insert("url", url.as_str());
            set.insert("clicks", 0i64);
            set.insert("last_clicked_at", Bson::Null);
        }

        self.collection
            .find_one_and_update(doc! { "code": current_code }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await
            .map_err(store_error)?
            .ok_or(ShortUrlError::NotFound)
    }

    async fn record_click(&self, code: &str, at: i64) -> Result<Option<ShortUrl>, ShortUrlError> {
        self.collection
            .find_one_and_update(
                doc! { "code": code },
                doc! {
                    "$inc": { "clicks": 1i64 },
                    "$set": { "last_clicked_at": at, "updated_at": at },
                },
            )
            .return_document(ReturnDocument::After)
            .await
            .map_err(store_error)
    }

    async fn delete_by_code(&self, code: &str) -> Result<bool, ShortUrlError> {
        let result = self
            .collection
            .delete_one(doc! { "code": code })
            .await
            .map_err(store_error)?;
        Ok(result.deleted_count > 0)
    }

    async fn list(&self, query: &ListQuery) -> Result<Vec<ShortUrl>, ShortUrlError> {
        let filter = match &query.q {
            Some(term) => {
                let pattern = escape_regex(term);
                doc! {
                    "$or": [
                        { "url": { "$regex": &pattern, "$options": "i" } },
                        { "code": { "$regex": &pattern, "$options": "i" } },
                    ]
                }
            }
            None => doc! {},
        };

        let skip = (query.page - 1).saturating_mul(query.limit as u64);
        let cursor = self
            .collection
            .find(filter)
            .sort(doc! { "created_at": 1, "_id": 1 })
            .skip(skip)
            .limit(query.limit)
            .await
            .map_err(store_error)?;

        cursor.try_collect().await.map_err(store_error)
    }

    async fn ping(&self) -> Result<(), ShortUrlError> {
        self.db
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(store_error)?;
        Ok(())
    }
}
