//! Audit log store.
//!
//! Append-only, persisted trail of timestamped lines plus the developer
//! mode flag. The in-memory sequence is the source of truth; persistence is
//! best-effort and its failures only reach `tracing`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use campus_activity_core::{export_contents, export_file_name, LogEntry};
use chrono::Utc;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::config::DEFAULT_EXPORT_PREFIX;
use crate::document::{read_key, Document, DocumentError};
use crate::error::ClientError;

/// Document key holding the entry sequence.
pub const ENTRIES_KEY: &str = "entries";
/// Document key holding the developer mode flag.
pub const DEV_MODE_KEY: &str = "devMode";

#[derive(Debug, Default)]
struct LogState {
    entries: Vec<LogEntry>,
    dev_mode: bool,
}

/// The audit log.
pub struct LogStore {
    document: Arc<dyn Document>,
    state: Mutex<LogState>,
    export_prefix: String,
}

impl LogStore {
    /// Create an empty store over `document`. Call [`LogStore::load`] to read it.
    pub fn new(document: Arc<dyn Document>) -> Self {
        Self {
            document,
            state: Mutex::new(LogState::default()),
            export_prefix: DEFAULT_EXPORT_PREFIX.to_string(),
        }
    }

    /// Set the file name prefix used by [`LogStore::export_to_file`].
    pub fn with_export_prefix(mut self, prefix: &str) -> Self {
        self.export_prefix = prefix.to_string();
        self
    }

    /// Read entries and developer mode from the document.
    ///
    /// Never fails: an unreadable document leaves the log empty.
    pub async fn load(&self) {
        let loaded = self.read_persisted().await;
        let mut state = self.state.lock().await;
        match loaded {
            Ok((entries, dev_mode)) => {
                tracing::debug!(entries = entries.len(), "audit log loaded");
                state.entries = entries;
                if let Some(dev_mode) = dev_mode {
                    state.dev_mode = dev_mode;
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load audit log, starting empty");
                state.entries.clear();
            }
        }
    }

    async fn read_persisted(&self) -> Result<(Vec<LogEntry>, Option<bool>), DocumentError> {
        let entries: Option<Vec<LogEntry>> = read_key(self.document.as_ref(), ENTRIES_KEY).await?;
        let dev_mode: Option<bool> = read_key(self.document.as_ref(), DEV_MODE_KEY).await?;
        Ok((entries.unwrap_or_default(), dev_mode))
    }

    /// Append a timestamped line and persist the whole sequence.
    ///
    /// A persistence failure is reported to `tracing` and the line is kept.
    pub async fn add(&self, message: &str) {
        let mut state = self.state.lock().await;
        state.entries.push(LogEntry::now(message));
        if let Err(e) = self.persist_entries(&state.entries).await {
            tracing::error!(error = %e, "failed to persist audit log");
        }
    }

    /// Turn developer mode on and record the transition.
    pub async fn enable_dev_mode(&self) {
        self.state.lock().await.dev_mode = true;

        let persist = async {
            if let Err(e) = self.persist_dev_mode(true).await {
                tracing::error!(error = %e, "failed to persist developer mode");
            }
        };
        tokio::join!(persist, self.add("Developer mode enabled"));
    }

    /// Drop every entry and persist the empty sequence.
    pub async fn clear(&self) {
        let mut state = self.state.lock().await;
        state.entries.clear();
        if let Err(e) = self.persist_entries(&state.entries).await {
            tracing::error!(error = %e, "failed to persist cleared audit log");
        }
    }

    /// Write all entries, newline-joined, to a new file in `dir`.
    ///
    /// The file name carries the current time in milliseconds.
    pub async fn export_to_file(&self, dir: &Path) -> Result<PathBuf, ClientError> {
        let (contents, count) = {
            let state = self.state.lock().await;
            (export_contents(&state.entries), state.entries.len())
        };
        let path = dir.join(export_file_name(
            &self.export_prefix,
            Utc::now().timestamp_millis(),
        ));

        let export_err = |source| ClientError::Export {
            path: path.clone(),
            source,
        };
        tokio::fs::create_dir_all(dir).await.map_err(export_err)?;
        tokio::fs::write(&path, contents).await.map_err(export_err)?;

        tracing::info!(path = %path.display(), entries = count, "audit log exported");
        Ok(path)
    }

    /// Snapshot of the entries, oldest first.
    pub async fn entries(&self) -> Vec<LogEntry> {
        self.state.lock().await.entries.clone()
    }

    /// Whether developer mode is on.
    pub async fn dev_mode(&self) -> bool {
        self.state.lock().await.dev_mode
    }

    async fn persist_entries(&self, entries: &[LogEntry]) -> Result<(), DocumentError> {
        self.document
            .set(ENTRIES_KEY, serde_json::to_value(entries)?)
            .await?;
        self.document.save().await
    }

    async fn persist_dev_mode(&self, enabled: bool) -> Result<(), DocumentError> {
        self.document.set(DEV_MODE_KEY, Value::Bool(enabled)).await?;
        self.document.save().await
    }
}

impl std::fmt::Debug for LogStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogStore")
            .field("export_prefix", &self.export_prefix)
            .finish_non_exhaustive()
    }
}
