//! Document backed by a JSON object file.

use super::{Document, DocumentError};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tokio::sync::{Mutex, OnceCell};

/// A JSON object on disk, loaded on first use.
///
/// The file is read once per handle; every later `get`/`set` works on the
/// in-memory copy, and `save` rewrites the whole file. Saves are serialized
/// and each writes the working copy as of when it started writing.
#[derive(Debug)]
pub struct JsonFileDocument {
    path: PathBuf,
    data: OnceCell<Mutex<Map<String, Value>>>,
    save_lock: Mutex<()>,
}

impl JsonFileDocument {
    /// Create a handle; nothing is read until the first operation.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            data: OnceCell::new(),
            save_lock: Mutex::new(()),
        }
    }

    /// Backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn data(&self) -> Result<&Mutex<Map<String, Value>>, DocumentError> {
        self.data
            .get_or_try_init(|| async { read_object(&self.path).await.map(Mutex::new) })
            .await
    }
}

async fn read_object(path: &Path) -> Result<Map<String, Value>, DocumentError> {
    let raw = match tokio::fs::read(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
        Err(e) => {
            return Err(DocumentError::Io {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };

    match serde_json::from_slice::<Value>(&raw)? {
        Value::Object(map) => Ok(map),
        other => Err(DocumentError::Shape {
            key: "<root>".to_string(),
            reason: format!("expected an object, found {other}"),
        }),
    }
}

#[async_trait]
impl Document for JsonFileDocument {
    async fn get(&self, key: &str) -> Result<Option<Value>, DocumentError> {
        Ok(self.data().await?.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), DocumentError> {
        self.data()
            .await?
            .lock()
            .await
            .insert(key.to_string(), value);
        Ok(())
    }

    async fn save(&self) -> Result<(), DocumentError> {
        let _saving = self.save_lock.lock().await;
        let snapshot = {
            let data = self.data().await?.lock().await;
            serde_json::to_vec_pretty(&*data)?
        };

        let io_err = |source| DocumentError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }

        // Atomic replace.
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &snapshot).await.map_err(io_err)?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(io_err)?;

        tracing::debug!(path = %self.path.display(), bytes = snapshot.len(), "document saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let doc = JsonFileDocument::new(dir.path().join("logs.json"));

        assert_eq!(doc.get("entries").await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_is_not_durable_until_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs.json");
        let doc = JsonFileDocument::new(&path);

        doc.set("devMode", json!(true)).await.unwrap();
        assert!(!path.exists());

        doc.save().await.unwrap();
        let reopened = JsonFileDocument::new(&path);
        assert_eq!(reopened.get("devMode").await.unwrap(), Some(json!(true)));
    }

    #[tokio::test]
    async fn save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store").join("logs.json");
        let doc = JsonFileDocument::new(&path);

        doc.set("entries", json!(["[2025/01/01 00:00:00] x"]))
            .await
            .unwrap();
        doc.save().await.unwrap();

        assert!(path.exists());
        assert_eq!(doc.path(), path.as_path());
    }

    #[tokio::test]
    async fn non_object_file_is_shape_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs.json");
        tokio::fs::write(&path, "[1, 2, 3]").await.unwrap();

        let doc = JsonFileDocument::new(&path);
        assert!(matches!(
            doc.get("entries").await,
            Err(DocumentError::Shape { .. })
        ));
    }

    #[tokio::test]
    async fn corrupt_file_is_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs.json");
        tokio::fs::write(&path, "{ not json").await.unwrap();

        let doc = JsonFileDocument::new(&path);
        assert!(matches!(doc.get("entries").await, Err(DocumentError::Json(_))));
    }

    #[tokio::test]
    async fn other_keys_survive_rewrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs.json");
        tokio::fs::write(&path, r#"{"theme":"dark","entries":[]}"#)
            .await
            .unwrap();

        let doc = JsonFileDocument::new(&path);
        doc.set("entries", json!(["line"])).await.unwrap();
        doc.save().await.unwrap();

        let reopened = JsonFileDocument::new(&path);
        assert_eq!(reopened.get("theme").await.unwrap(), Some(json!("dark")));
        assert_eq!(reopened.get("entries").await.unwrap(), Some(json!(["line"])));
    }

    #[tokio::test]
    async fn concurrent_saves_keep_latest_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs.json");
        let doc = JsonFileDocument::new(&path);

        let first = async {
            doc.set("devMode", json!(true)).await?;
            doc.save().await
        };
        let second = async {
            doc.set("entries", json!(["line"])).await?;
            doc.save().await
        };
        let (a, b) = tokio::join!(first, second);
        a.unwrap();
        b.unwrap();

        let reopened = JsonFileDocument::new(&path);
        assert_eq!(reopened.get("devMode").await.unwrap(), Some(json!(true)));
        assert_eq!(reopened.get("entries").await.unwrap(), Some(json!(["line"])));
    }
}
