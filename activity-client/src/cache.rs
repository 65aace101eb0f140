//! Activity cache.
//!
//! Holds the four activity collections, a detail map keyed by activity id,
//! one busy flag per fetch family and a single last-error slot.
//!
//! # Consistency
//!
//! The state lock is never held across a backend call. A detail fetch spans
//! two calls for a series (detail, then children), so concurrent fetches or
//! refreshes of one id are not deduplicated: each issues its own calls and
//! the last insertion wins. Only fully assembled records are inserted.
//!
//! # Errors
//!
//! Collection fetches only record failures in the error slot. Detail fetches
//! record and return them. [`ActivityCache::apply`] never fails; it reports
//! a rejection as [`ApplyOutcome::Rejected`]. [`ActivityCache::cancel_apply`]
//! returns the error to the caller.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use campus_activity_core::{preview, ActivityFilter, DetailPlan};
use campus_activity_types::{Activity, ApplyOutcome};
use tokio::sync::Mutex;

use crate::backend::{Backend, BackendError};
use crate::config::DEFAULT_PREVIEW_CHARS;
use crate::error::ClientError;
use crate::logs::LogStore;

/// One of the cached collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    /// Activities that have not ended.
    Catalog,
    /// Recommended for the user.
    Recommended,
    /// The user is registered.
    Registered,
    /// The user took part.
    Participated,
}

/// Fetch family; each has its own busy flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchFamily {
    /// [`ActivityCache::fetch_catalog`].
    Catalog,
    /// [`ActivityCache::fetch_recommended`].
    Recommended,
    /// [`ActivityCache::fetch_mine`] (registered and participated).
    Mine,
}

impl FetchFamily {
    fn label(&self) -> &'static str {
        match self {
            Self::Catalog => "catalog",
            Self::Recommended => "recommended activities",
            Self::Mine => "my activities",
        }
    }
}

#[derive(Debug, Default)]
struct CacheState {
    catalog: Vec<Activity>,
    recommended: Vec<Activity>,
    registered: Vec<Activity>,
    participated: Vec<Activity>,
    detail: HashMap<String, Activity>,
    catalog_busy: bool,
    recommended_busy: bool,
    mine_busy: bool,
    error: Option<String>,
    filter: ActivityFilter,
}

impl CacheState {
    fn busy_mut(&mut self, family: FetchFamily) -> &mut bool {
        match family {
            FetchFamily::Catalog => &mut self.catalog_busy,
            FetchFamily::Recommended => &mut self.recommended_busy,
            FetchFamily::Mine => &mut self.mine_busy,
        }
    }

    fn busy(&self, family: FetchFamily) -> bool {
        match family {
            FetchFamily::Catalog => self.catalog_busy,
            FetchFamily::Recommended => self.recommended_busy,
            FetchFamily::Mine => self.mine_busy,
        }
    }

    fn collection(&self, which: Collection) -> &Vec<Activity> {
        match which {
            Collection::Catalog => &self.catalog,
            Collection::Recommended => &self.recommended,
            Collection::Registered => &self.registered,
            Collection::Participated => &self.participated,
        }
    }
}

/// In-memory activity cache over a [`Backend`].
pub struct ActivityCache<B: Backend> {
    backend: Arc<B>,
    logs: Arc<LogStore>,
    preview_chars: usize,
    state: Mutex<CacheState>,
}

impl<B: Backend> ActivityCache<B> {
    /// Create an empty cache.
    pub fn new(backend: Arc<B>, logs: Arc<LogStore>) -> Self {
        Self {
            backend,
            logs,
            preview_chars: DEFAULT_PREVIEW_CHARS,
            state: Mutex::new(CacheState::default()),
        }
    }

    /// Set how many characters of payload go into audit-line previews.
    pub fn with_preview_chars(mut self, preview_chars: usize) -> Self {
        self.preview_chars = preview_chars;
        self
    }

    /// Replace the catalog with the backend's unended activities.
    pub async fn fetch_catalog(&self) {
        let backend = Arc::clone(&self.backend);
        self.run_fetch(
            FetchFamily::Catalog,
            async move { backend.get_unended_activities().await },
            |state, list| {
                state.catalog = list;
                state.catalog.len()
            },
        )
        .await;
    }

    /// Replace the recommended list.
    pub async fn fetch_recommended(&self) {
        let backend = Arc::clone(&self.backend);
        self.run_fetch(
            FetchFamily::Recommended,
            async move { backend.get_recommended_activities().await },
            |state, list| {
                state.recommended = list;
                state.recommended.len()
            },
        )
        .await;
    }

    /// Replace the registered and participated lists.
    ///
    /// Both calls must succeed; otherwise neither list changes.
    pub async fn fetch_mine(&self) {
        let backend = Arc::clone(&self.backend);
        self.run_fetch(
            FetchFamily::Mine,
            async move {
                let registered = backend.get_registered_activities().await?;
                let participated = backend.get_participated_activities().await?;
                Ok::<_, BackendError>((registered, participated))
            },
            |state, (registered, participated)| {
                state.registered = registered;
                state.participated = participated;
                state.registered.len() + state.participated.len()
            },
        )
        .await;
    }

    async fn run_fetch<T, F>(
        &self,
        family: FetchFamily,
        fetch: F,
        install: impl FnOnce(&mut CacheState, T) -> usize,
    ) where
        F: Future<Output = Result<T, BackendError>>,
    {
        let label = family.label();
        {
            let mut state = self.state.lock().await;
            *state.busy_mut(family) = true;
            state.error = None;
        }
        self.logs.add(&format!("Fetching {label}")).await;

        let result = fetch.await;

        let outcome = {
            let mut state = self.state.lock().await;
            *state.busy_mut(family) = false;
            match result {
                Ok(value) => Ok(install(&mut *state, value)),
                Err(e) => {
                    let message = e.to_string();
                    state.error = Some(message.clone());
                    Err(message)
                }
            }
        };

        match outcome {
            Ok(count) => {
                tracing::debug!(family = label, count, "fetch complete");
                self.logs
                    .add(&format!("Fetched {label}: {count} activities"))
                    .await;
            }
            Err(message) => {
                tracing::warn!(family = label, error = %message, "fetch failed");
                self.logs
                    .add(&format!("Failed to fetch {label}: {message}"))
                    .await;
            }
        }
    }

    /// Detail of `id`, fetched at most once.
    ///
    /// A cached record is returned without any backend call; the hit is
    /// still written to the audit log.
    pub async fn fetch_detail(&self, id: &str) -> Result<Activity, ClientError> {
        if let Some(hit) = self.cached_detail(id).await {
            tracing::debug!(activity_id = id, "detail cache hit");
            self.logs.add(&format!("Detail {id} served from cache")).await;
            return Ok(hit);
        }
        self.load_detail(id, "Fetching").await
    }

    /// Fetch the detail of `id` again, overwriting any cached record.
    pub async fn refresh_detail(&self, id: &str) -> Result<Activity, ClientError> {
        self.load_detail(id, "Refreshing").await
    }

    async fn load_detail(&self, id: &str, verb: &str) -> Result<Activity, ClientError> {
        self.logs.add(&format!("{verb} detail {id}")).await;

        match self.assemble_detail(id).await {
            Ok(detail) => {
                self.state
                    .lock()
                    .await
                    .detail
                    .insert(id.to_string(), detail.clone());
                let payload = preview(&detail, self.preview_chars);
                self.logs
                    .add(&format!("Loaded detail {id}: {payload}"))
                    .await;
                Ok(detail)
            }
            Err(e) => {
                self.state.lock().await.error = Some(e.to_string());
                tracing::warn!(activity_id = id, error = %e, "detail fetch failed");
                self.logs
                    .add(&format!("Failed to load detail {id}: {e}"))
                    .await;
                Err(e.into())
            }
        }
    }

    async fn assemble_detail(&self, id: &str) -> Result<Activity, BackendError> {
        match DetailPlan::for_detail(self.backend.get_activity_detail(id).await?) {
            DetailPlan::Complete(detail) => Ok(detail),
            plan @ DetailPlan::NeedsChildren(_) => {
                let children = self.backend.get_activity_children(id).await?;
                tracing::debug!(activity_id = id, children = children.len(), "series expanded");
                Ok(plan.attach(children))
            }
        }
    }

    /// Register for `id`. Never fails.
    ///
    /// A rejected call comes back as [`ApplyOutcome::Rejected`] carrying the
    /// backend's message, commonly a scheduling conflict.
    pub async fn apply(&self, id: &str, auto_cancel: bool) -> ApplyOutcome {
        self.logs
            .add(&format!("Applying for {id} (auto_cancel={auto_cancel})"))
            .await;

        match self.backend.register_for_activity(id, auto_cancel).await {
            Ok(registered) => {
                self.logs
                    .add(&format!("Apply {id} answered: {registered}"))
                    .await;
                ApplyOutcome::Outcome(registered)
            }
            Err(e) => {
                let message = e.to_string();
                self.logs
                    .add(&format!("Apply {id} rejected: {message}"))
                    .await;
                ApplyOutcome::Rejected(message)
            }
        }
    }

    /// Cancel the registration for `id`.
    pub async fn cancel_apply(&self, id: &str) -> Result<bool, ClientError> {
        self.logs.add(&format!("Cancelling {id}")).await;

        match self.backend.cancel_activity(id).await {
            Ok(cancelled) => {
                self.logs
                    .add(&format!("Cancel {id} answered: {cancelled}"))
                    .await;
                Ok(cancelled)
            }
            Err(e) => {
                self.logs
                    .add(&format!("Cancel {id} failed: {e}"))
                    .await;
                Err(e.into())
            }
        }
    }

    /// Snapshot of one collection.
    pub async fn collection(&self, which: Collection) -> Vec<Activity> {
        self.state.lock().await.collection(which).clone()
    }

    /// Whether a fetch of `family` is in flight.
    pub async fn is_busy(&self, family: FetchFamily) -> bool {
        self.state.lock().await.busy(family)
    }

    /// Last failure message.
    pub async fn error(&self) -> Option<String> {
        self.state.lock().await.error.clone()
    }

    /// Cached detail of `id`, if any.
    pub async fn cached_detail(&self, id: &str) -> Option<Activity> {
        self.state.lock().await.detail.get(id).cloned()
    }

    /// Drop the cached detail of `id`. Returns whether one was cached.
    pub async fn invalidate_detail(&self, id: &str) -> bool {
        self.state.lock().await.detail.remove(id).is_some()
    }

    /// Drop every cached detail.
    pub async fn clear_details(&self) {
        self.state.lock().await.detail.clear();
    }

    /// Replace the filter.
    pub async fn set_filter(&self, filter: ActivityFilter) {
        self.state.lock().await.filter = filter;
    }

    /// Edit the filter in place.
    pub async fn update_filter(&self, edit: impl FnOnce(&mut ActivityFilter)) {
        edit(&mut self.state.lock().await.filter);
    }

    /// Reset the filter to the identity.
    pub async fn clear_filter(&self) {
        self.state.lock().await.filter = ActivityFilter::new();
    }

    /// Current filter.
    pub async fn filter(&self) -> ActivityFilter {
        self.state.lock().await.filter.clone()
    }

    /// The catalog narrowed by the current filter, in catalog order.
    pub async fn filtered_catalog(&self) -> Vec<Activity> {
        let state = self.state.lock().await;
        state.filter.apply(&state.catalog)
    }
}

impl<B: Backend> std::fmt::Debug for ActivityCache<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivityCache")
            .field("preview_chars", &self.preview_chars)
            .finish_non_exhaustive()
    }
}
