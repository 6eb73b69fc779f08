use storage::error::StorageError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReceiptsError>;

#[derive(Error, Debug)]
pub enum ReceiptsError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Failed to parse JSON: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(StorageError),

    #[error("Adapter error: {0}")]
    AdapterError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Transaction not found")]
    NotFound,

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<StorageError> for ReceiptsError {
    fn from(error: StorageError) -> Self {
        match error {
            StorageError::NotFound => Self::NotFound,
            other => Self::Storage(other),
        }
    }
}
