//! Application context.
//!
//! Builds the log store, session store and activity cache once, sharing one
//! backend and one log document, and hands them out by reference.

use std::path::PathBuf;
use std::sync::Arc;

use crate::backend::Backend;
use crate::cache::ActivityCache;
use crate::config::ClientConfig;
use crate::document::{Document, JsonFileDocument};
use crate::error::ClientError;
use crate::logs::LogStore;
use crate::session::SessionStore;

/// The client stores, wired together.
pub struct AppContext<B: Backend> {
    logs: Arc<LogStore>,
    session: SessionStore<B>,
    activities: ActivityCache<B>,
    export_dir: PathBuf,
}

impl<B: Backend> AppContext<B> {
    /// Wire the stores over `backend` and the log `document`.
    pub fn new(config: &ClientConfig, backend: B, document: Arc<dyn Document>) -> Self {
        let backend = Arc::new(backend);
        let logs = Arc::new(LogStore::new(document).with_export_prefix(&config.logs.export_prefix));

        Self {
            session: SessionStore::new(Arc::clone(&backend), Arc::clone(&logs)),
            activities: ActivityCache::new(backend, Arc::clone(&logs))
                .with_preview_chars(config.cache.preview_chars),
            logs,
            export_dir: config.logs.export_dir.clone(),
        }
    }

    /// Wire the stores with the log kept in the configured JSON document.
    pub fn open(config: &ClientConfig, backend: B) -> Self {
        let document = Arc::new(JsonFileDocument::new(&config.logs.document));
        Self::new(config, backend, document)
    }

    /// Load the persisted log. Never fails.
    pub async fn start(&self) {
        self.logs.load().await;
        tracing::info!("activity client started");
    }

    /// The audit log.
    pub fn logs(&self) -> &LogStore {
        &self.logs
    }

    /// The session mirror.
    pub fn session(&self) -> &SessionStore<B> {
        &self.session
    }

    /// The activity cache.
    pub fn activities(&self) -> &ActivityCache<B> {
        &self.activities
    }

    /// Export the log to the configured export directory.
    pub async fn export_logs(&self) -> Result<PathBuf, ClientError> {
        self.logs.export_to_file(&self.export_dir).await
    }
}
