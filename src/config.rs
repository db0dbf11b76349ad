use std::env;

use anyhow::{Context, Result};

#[derive(Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub database: DatabaseConfig,
}

#[derive(Clone)]
pub struct DatabaseConfig {
    pub connection_url: String,
    pub database: String,
}

impl Config {
    /// Read the full configuration from the environment once, at startup.
    /// Nothing else in the process reads environment variables.
    pub fn from_env() -> Result<Self> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .context("PORT must be a valid port number")?;

        let connection_url =
            env::var("MONGODB_CONNECTION_URL").context("MONGODB_CONNECTION_URL not set")?;
        let database = env::var("MONGODB_DATABASE").unwrap_or_else(|_| "shorturls".to_string());

        let cors_origins = match env::var("CORS_ORIGINS") {
            Ok(origins) => origins
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),
            // Vite dev and preview servers
            Err(_) => vec![
                "http://localhost:5173".to_string(),
                "http://localhost:4173".to_string(),
            ],
        };

        Ok(Self {
            host,
            port,
            cors_origins,
            database: DatabaseConfig {
                connection_url,
                database,
            },
        })
    }
}
