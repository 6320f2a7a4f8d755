//! Storage error types.
//!
//! Returned by every store operation. Reads and writes both propagate, callers
//! decide their own fallback.

use thiserror::Error;

/// Errors that can occur when using the chat and session stores.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The key-value backend failed to read or write.
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Corrupt value under key '{key}': {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Failed to encode value: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Storage(e.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
