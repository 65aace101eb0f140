//! # activity-client
//!
//! Client-side synchronization and caching layer for campus activities.
//!
//! This is the library a UI uses to read activity data. It sits between the
//! UI and a remote backend exposing a small RPC surface.
//!
//! ## Features
//!
//! - **Activity Cache**: catalog, recommended, registered and participated
//!   collections plus an at-most-once detail cache with series expansion
//! - **Session Mirror**: cached view of the backend-reported login state
//! - **Audit Log**: append-only, persisted, exportable diagnostic trail
//! - **Backend Abstraction**: pluggable RPC layer (named-command adapter, mock)
//!
//! ## Example
//!
//! ```ignore
//! use campus_activity_client::{AppContext, ClientConfig, MockBackend};
//!
//! let context = AppContext::open(&ClientConfig::default(), MockBackend::new());
//! context.start().await;
//!
//! context.activities().fetch_catalog().await;
//! let detail = context.activities().fetch_detail("7697fe4c").await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod cache;
pub mod config;
pub mod context;
pub mod document;
pub mod error;
pub mod logs;
pub mod session;

pub use backend::{Backend, BackendError, Invoke, MockBackend, MockCall, RpcBackend};
pub use cache::{ActivityCache, Collection, FetchFamily};
pub use config::{CacheConfig, ClientConfig, ConfigError, LogConfig};
pub use context::AppContext;
pub use document::{Document, DocumentError, JsonFileDocument, MemoryDocument};
pub use error::ClientError;
pub use logs::LogStore;
pub use session::SessionStore;
