//! Persisted key-value document.
//!
//! The audit log lives in a single named document with get/set/save
//! semantics: `set` only changes the working copy, `save` flushes it.

mod json;
mod memory;

pub use json::JsonFileDocument;
pub use memory::MemoryDocument;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::PathBuf;
use thiserror::Error;

/// Document errors.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Reading or writing the backing file failed.
    #[error("document I/O on {path}: {source}")]
    Io {
        /// Backing file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The backing file is not valid JSON.
    #[error("document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A key holds a value of the wrong shape.
    #[error("unexpected value for {key}: {reason}")]
    Shape {
        /// Offending key (or `<root>`).
        key: String,
        /// What was wrong.
        reason: String,
    },

    /// The store refused the operation.
    #[error("document unavailable: {0}")]
    Unavailable(String),
}

/// A named key-value document with an explicit flush.
#[async_trait]
pub trait Document: Send + Sync {
    /// Read a key from the working copy.
    async fn get(&self, key: &str) -> Result<Option<Value>, DocumentError>;

    /// Write a key to the working copy.
    async fn set(&self, key: &str, value: Value) -> Result<(), DocumentError>;

    /// Flush the working copy to durable storage.
    async fn save(&self) -> Result<(), DocumentError>;
}

/// Read and decode a key; a missing key is `None`.
pub async fn read_key<T: DeserializeOwned>(
    document: &dyn Document,
    key: &str,
) -> Result<Option<T>, DocumentError> {
    match document.get(key).await? {
        None => Ok(None),
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|e| DocumentError::Shape {
                key: key.to_string(),
                reason: e.to_string(),
            }),
    }
}
