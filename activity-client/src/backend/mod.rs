//! Backend abstraction for the activity client.
//!
//! This module provides a pluggable RPC layer that abstracts how the remote
//! backend is reached (named-command invoker, mock for testing).
//!
//! # Design
//!
//! Every call is a single-shot request/response with no streaming:
//! - collection listings return a sequence of [`Activity`]
//! - detail and children return one record or its child sequence
//! - registration and cancellation return the backend's boolean answer
//! - session calls report or change the login state
//!
//! No call carries a timeout; a hung call stays pending.
//!
//! # Example
//!
//! ```ignore
//! let backend = MockBackend::new();
//! backend.set_unended(vec![Activity::new("a1", "Concert", 26)]);
//! let catalog = backend.get_unended_activities().await?;
//! ```

mod mock;
mod rpc;

pub use mock::{MockBackend, MockCall};
pub use rpc::{Invoke, RpcBackend};

use async_trait::async_trait;
use campus_activity_types::{Activity, LoginState, UserInfo};
use serde::Deserialize;
use thiserror::Error;

/// Request names on the wire.
pub mod ops {
    /// Catalog of activities not yet ended.
    pub const GET_UNENDED_ACTIVITIES: &str = "get_unended_activities";
    /// Recommendations for the current user.
    pub const GET_RECOMMENDED_ACTIVITIES: &str = "get_recommended_activities";
    /// Activities the user is registered for.
    pub const GET_REGISTERED_ACTIVITIES: &str = "get_registered_activities";
    /// Activities the user took part in.
    pub const GET_PARTICIPATED_ACTIVITIES: &str = "get_participated_activities";
    /// Detail of one activity.
    pub const GET_ACTIVITY_DETAIL: &str = "get_activity_detail";
    /// Children of a series.
    pub const GET_ACTIVITY_CHILDREN: &str = "get_activity_children";
    /// Registration.
    pub const REGISTER_FOR_ACTIVITY: &str = "register_for_activity";
    /// Cancellation of a registration.
    pub const CANCEL_ACTIVITY: &str = "cancel_activity";
    /// Current login state.
    pub const GET_LOGIN_STATUS: &str = "get_login_status";
    /// Sign in.
    pub const LOGIN: &str = "login";
    /// Sign out.
    pub const LOGOUT: &str = "logout";
}

/// Backend errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// No session; the user must log in first.
    #[error("login required: {0}")]
    AuthRequired(String),

    /// The backend rejected the request with a coded error.
    #[error("{code}: {message}")]
    Remote {
        /// Machine-readable code.
        code: String,
        /// Human-readable message.
        message: String,
    },

    /// The backend rejected the request with a bare message.
    #[error("{0}")]
    Rejected(String),

    /// The request never got an answer.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The answer did not have the expected shape.
    #[error("malformed response: {0}")]
    Decode(String),
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    code: String,
    message: String,
}

impl BackendError {
    /// Decode an error string as the backend reports it.
    ///
    /// The backend wraps failures in a `{"code": ..., "message": ...}` JSON
    /// string; `AUTH_REQUIRED` maps to [`BackendError::AuthRequired`], other
    /// codes to [`BackendError::Remote`], anything else to
    /// [`BackendError::Rejected`] verbatim.
    pub fn from_wire(raw: &str) -> Self {
        match serde_json::from_str::<ErrorEnvelope>(raw) {
            Ok(envelope) if envelope.code == "AUTH_REQUIRED" => {
                Self::AuthRequired(envelope.message)
            }
            Ok(envelope) => Self::Remote {
                code: envelope.code,
                message: envelope.message,
            },
            Err(_) => Self::Rejected(raw.to_string()),
        }
    }
}

/// The RPC surface the client stores depend on.
///
/// Implementations decide how requests reach the backend
/// (named-command invoker, mock, etc).
#[async_trait]
pub trait Backend: Send + Sync {
    /// Catalog of activities that have not ended.
    async fn get_unended_activities(&self) -> Result<Vec<Activity>, BackendError>;

    /// Recommended activities.
    async fn get_recommended_activities(&self) -> Result<Vec<Activity>, BackendError>;

    /// Activities the user is registered for.
    async fn get_registered_activities(&self) -> Result<Vec<Activity>, BackendError>;

    /// Activities the user took part in.
    async fn get_participated_activities(&self) -> Result<Vec<Activity>, BackendError>;

    /// Detail of one activity.
    async fn get_activity_detail(&self, activity_id: &str) -> Result<Activity, BackendError>;

    /// Children of a series activity.
    async fn get_activity_children(&self, activity_id: &str)
        -> Result<Vec<Activity>, BackendError>;

    /// Register for an activity.
    ///
    /// `auto_cancel` lets the backend cancel conflicting registrations and retry.
    async fn register_for_activity(
        &self,
        activity_id: &str,
        auto_cancel: bool,
    ) -> Result<bool, BackendError>;

    /// Cancel a registration.
    async fn cancel_activity(&self, activity_id: &str) -> Result<bool, BackendError>;

    /// Current login state.
    async fn get_login_status(&self) -> Result<LoginState, BackendError>;

    /// Sign in; `save` asks the backend to store the credentials.
    async fn login(
        &self,
        username: &str,
        password: &str,
        save: bool,
    ) -> Result<UserInfo, BackendError>;

    /// Sign out.
    async fn logout(&self) -> Result<(), BackendError>;
}
