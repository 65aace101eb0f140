//! Named-command backend adapter.
//!
//! Maps each [`Backend`] operation to its request name and JSON arguments,
//! hands them to an [`Invoke`] implementation, and decodes the answer.

use async_trait::async_trait;
use campus_activity_types::{Activity, LoginState, UserInfo};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use super::{ops, Backend, BackendError};

/// Raw request/response channel to the backend.
///
/// Errors come back as the backend's own error string, decoded with
/// [`BackendError::from_wire`].
#[async_trait]
pub trait Invoke: Send + Sync {
    /// Send one named request and wait for its answer.
    async fn invoke(&self, command: &str, args: Value) -> Result<Value, String>;
}

/// [`Backend`] over a named-command channel.
#[derive(Debug, Clone)]
pub struct RpcBackend<I: Invoke> {
    invoker: I,
}

impl<I: Invoke> RpcBackend<I> {
    /// Wrap an invoker.
    pub fn new(invoker: I) -> Self {
        Self { invoker }
    }

    /// Get a reference to the underlying invoker (for testing).
    pub fn invoker(&self) -> &I {
        &self.invoker
    }

    async fn call<T: DeserializeOwned>(&self, command: &str, args: Value) -> Result<T, BackendError> {
        tracing::debug!(command, "invoking backend");
        let raw = self
            .invoker
            .invoke(command, args)
            .await
            .map_err(|e| BackendError::from_wire(&e))?;
        serde_json::from_value(raw).map_err(|e| BackendError::Decode(format!("{command}: {e}")))
    }
}

#[async_trait]
impl<I: Invoke> Backend for RpcBackend<I> {
    async fn get_unended_activities(&self) -> Result<Vec<Activity>, BackendError> {
        self.call(ops::GET_UNENDED_ACTIVITIES, json!({})).await
    }

    async fn get_recommended_activities(&self) -> Result<Vec<Activity>, BackendError> {
        self.call(ops::GET_RECOMMENDED_ACTIVITIES, json!({})).await
    }

    async fn get_registered_activities(&self) -> Result<Vec<Activity>, BackendError> {
        self.call(ops::GET_REGISTERED_ACTIVITIES, json!({})).await
    }

    async fn get_participated_activities(&self) -> Result<Vec<Activity>, BackendError> {
        self.call(ops::GET_PARTICIPATED_ACTIVITIES, json!({})).await
    }

    async fn get_activity_detail(&self, activity_id: &str) -> Result<Activity, BackendError> {
        self.call(ops::GET_ACTIVITY_DETAIL, json!({ "activity_id": activity_id }))
            .await
    }

    async fn get_activity_children(
        &self,
        activity_id: &str,
    ) -> Result<Vec<Activity>, BackendError> {
        self.call(ops::GET_ACTIVITY_CHILDREN, json!({ "activity_id": activity_id }))
            .await
    }

    async fn register_for_activity(
        &self,
        activity_id: &str,
        auto_cancel: bool,
    ) -> Result<bool, BackendError> {
        self.call(
            ops::REGISTER_FOR_ACTIVITY,
            json!({ "activity_id": activity_id, "auto_cancel": auto_cancel }),
        )
        .await
    }

    async fn cancel_activity(&self, activity_id: &str) -> Result<bool, BackendError> {
        self.call(ops::CANCEL_ACTIVITY, json!({ "activity_id": activity_id }))
            .await
    }

    async fn get_login_status(&self) -> Result<LoginState, BackendError> {
        self.call(ops::GET_LOGIN_STATUS, json!({})).await
    }

    async fn login(
        &self,
        username: &str,
        password: &str,
        save: bool,
    ) -> Result<UserInfo, BackendError> {
        self.call(
            ops::LOGIN,
            json!({ "username": username, "password": password, "save": save }),
        )
        .await
    }

    async fn logout(&self) -> Result<(), BackendError> {
        self.call(ops::LOGOUT, json!({})).await
    }
}
