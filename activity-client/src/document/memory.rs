//! In-memory document for testing.
//!
//! Keeps the working copy and the last saved copy apart, so tests can
//! simulate a restart and observe only what was flushed.

use super::{Document, DocumentError};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::{Arc, Mutex, MutexGuard};

/// In-memory [`Document`].
///
/// Clones share state.
#[derive(Debug, Default)]
pub struct MemoryDocument {
    inner: Arc<Mutex<MemoryDocumentInner>>,
}

#[derive(Debug, Default)]
struct MemoryDocumentInner {
    working: Map<String, Value>,
    persisted: Map<String, Value>,
    save_count: usize,
    fail_next_get: Option<String>,
    fail_next_set: Option<String>,
    fail_next_save: Option<String>,
}

impl MemoryDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryDocumentInner> {
        self.inner.lock().unwrap()
    }

    /// Simulate a process restart: drop unsaved changes.
    pub fn reopen(&self) {
        let mut inner = self.lock();
        inner.working = inner.persisted.clone();
    }

    /// Value of `key` as last saved.
    pub fn persisted(&self, key: &str) -> Option<Value> {
        self.lock().persisted.get(key).cloned()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.lock().save_count
    }

    /// Cause the next get() to fail with the given error.
    pub fn fail_next_get(&self, error: &str) {
        self.lock().fail_next_get = Some(error.to_string());
    }

    /// Cause the next set() to fail with the given error.
    pub fn fail_next_set(&self, error: &str) {
        self.lock().fail_next_set = Some(error.to_string());
    }

    /// Cause the next save() to fail with the given error.
    pub fn fail_next_save(&self, error: &str) {
        self.lock().fail_next_save = Some(error.to_string());
    }
}

impl Clone for MemoryDocument {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl Document for MemoryDocument {
    async fn get(&self, key: &str) -> Result<Option<Value>, DocumentError> {
        let mut inner = self.lock();
        if let Some(error) = inner.fail_next_get.take() {
            return Err(DocumentError::Unavailable(error));
        }
        Ok(inner.working.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), DocumentError> {
        let mut inner = self.lock();
        if let Some(error) = inner.fail_next_set.take() {
            return Err(DocumentError::Unavailable(error));
        }
        inner.working.insert(key.to_string(), value);
        Ok(())
    }

    async fn save(&self) -> Result<(), DocumentError> {
        let mut inner = self.lock();
        if let Some(error) = inner.fail_next_save.take() {
            return Err(DocumentError::Unavailable(error));
        }
        inner.persisted = inner.working.clone();
        inner.save_count += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn reopen_drops_unsaved_changes() {
        let doc = MemoryDocument::new();
        doc.set("entries", json!(["a"])).await.unwrap();
        doc.save().await.unwrap();
        doc.set("entries", json!(["a", "b"])).await.unwrap();

        doc.reopen();

        assert_eq!(doc.get("entries").await.unwrap(), Some(json!(["a"])));
        assert_eq!(doc.save_count(), 1);
    }

    #[tokio::test]
    async fn forced_failures_apply_once() {
        let doc = MemoryDocument::new();
        doc.fail_next_save("disk full");

        assert!(matches!(doc.save().await, Err(DocumentError::Unavailable(_))));
        assert!(doc.save().await.is_ok());
    }

    #[tokio::test]
    async fn failed_set_leaves_working_copy() {
        let doc = MemoryDocument::new();
        doc.fail_next_set("read only");

        assert!(doc.set("devMode", json!(true)).await.is_err());
        assert_eq!(doc.get("devMode").await.unwrap(), None);
        assert_eq!(doc.persisted("devMode"), None);
    }
}
