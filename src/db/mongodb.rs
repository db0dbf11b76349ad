use anyhow::Result;
use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client, Database};

use crate::config::DatabaseConfig;

/// Connect and ping, so a bad connection string fails at startup instead of
/// on the first request.
pub async fn get_database(config: &DatabaseConfig) -> Result<Database> {
    let options = ClientOptions::parse(&config.connection_url).await?;
    let client = Client::with_options(options)?;
    let db = client.database(&config.database);
    db.run_command(doc! { "ping": 1 }).await?;
    Ok(db)
}
