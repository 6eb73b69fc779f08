use anyhow::{Context, Result};
use receipts::ReceiptsConfig;

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub max_upload_bytes: usize,
    pub receipts: ReceiptsConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let max_upload_bytes = match std::env::var("MAX_UPLOAD_BYTES") {
            Ok(raw) => raw
                .parse()
                .context("MAX_UPLOAD_BYTES must be a number of bytes")?,
            Err(_) => DEFAULT_MAX_UPLOAD_BYTES,
        };

        Ok(Self {
            host: std::env::var("HOST").context("Cannot load HOST env variable")?,
            port: std::env::var("PORT")
                .context("PORT must be a number")?
                .parse()?,
            database_url: std::env::var("DATABASE_URL")
                .context("Cannot load DATABASE_URL env variable")?,
            max_upload_bytes,
            receipts: ReceiptsConfig::from_env()
                .context("Invalid receipt adapter configuration")?,
        })
    }
}
