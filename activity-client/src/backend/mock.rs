//! Mock backend for testing.
//!
//! Serves scripted data per operation and records every call for verification.

use super::{ops, Backend, BackendError};
use async_trait::async_trait;
use campus_activity_types::{Activity, LoginState, UserInfo};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockCall {
    /// Request name, see [`ops`].
    pub op: String,
    /// Arguments in request order. Passwords are never recorded.
    pub args: Vec<String>,
}

/// Mock backend for testing.
///
/// Clones share state, so a test can keep one handle while the stores own another.
#[derive(Debug, Default)]
pub struct MockBackend {
    inner: Arc<Mutex<MockBackendInner>>,
}

#[derive(Debug, Default)]
struct MockBackendInner {
    unended: Vec<Activity>,
    recommended: Vec<Activity>,
    registered: Vec<Activity>,
    participated: Vec<Activity>,
    details: HashMap<String, Activity>,
    children: HashMap<String, Vec<Activity>>,
    register_outcomes: VecDeque<Result<bool, BackendError>>,
    cancel_outcomes: VecDeque<Result<bool, BackendError>>,
    login_status: LoginState,
    login_user: Option<UserInfo>,
    failures: HashMap<&'static str, VecDeque<BackendError>>,
    yield_before_reply: bool,
    calls: Vec<MockCall>,
}

impl MockBackend {
    /// Create a new mock backend with empty data.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockBackendInner> {
        self.inner.lock().unwrap()
    }

    /// Set the catalog returned by `get_unended_activities`.
    pub fn set_unended(&self, activities: Vec<Activity>) {
        self.lock().unended = activities;
    }

    /// Set the list returned by `get_recommended_activities`.
    pub fn set_recommended(&self, activities: Vec<Activity>) {
        self.lock().recommended = activities;
    }

    /// Set the list returned by `get_registered_activities`.
    pub fn set_registered(&self, activities: Vec<Activity>) {
        self.lock().registered = activities;
    }

    /// Set the list returned by `get_participated_activities`.
    pub fn set_participated(&self, activities: Vec<Activity>) {
        self.lock().participated = activities;
    }

    /// Serve `activity` from `get_activity_detail`, keyed by its id.
    pub fn insert_detail(&self, activity: Activity) {
        self.lock().details.insert(activity.id.clone(), activity);
    }

    /// Serve `children` from `get_activity_children` for `parent_id`.
    pub fn set_children(&self, parent_id: &str, children: Vec<Activity>) {
        self.lock().children.insert(parent_id.to_string(), children);
    }

    /// Queue the answer to the next `register_for_activity` (default `Ok(true)`).
    pub fn queue_register(&self, outcome: Result<bool, BackendError>) {
        self.lock().register_outcomes.push_back(outcome);
    }

    /// Queue the answer to the next `cancel_activity` (default `Ok(true)`).
    pub fn queue_cancel(&self, outcome: Result<bool, BackendError>) {
        self.lock().cancel_outcomes.push_back(outcome);
    }

    /// Set the state returned by `get_login_status`.
    pub fn set_login_status(&self, status: LoginState) {
        self.lock().login_status = status;
    }

    /// Profile returned by a successful `login`; `None` rejects every login.
    pub fn set_login_user(&self, user: Option<UserInfo>) {
        self.lock().login_user = user;
    }

    /// Cause the next call to `op` to fail with `error`.
    ///
    /// Failures queue up per operation.
    pub fn fail_next(&self, op: &'static str, error: BackendError) {
        self.lock().failures.entry(op).or_default().push_back(error);
    }

    /// Yield to the scheduler before answering each call.
    ///
    /// Lets tests interleave concurrent operations at backend boundaries.
    pub fn yield_before_reply(&self, enabled: bool) {
        self.lock().yield_before_reply = enabled;
    }

    /// Get all calls that were made, in order.
    pub fn calls(&self) -> Vec<MockCall> {
        self.lock().calls.clone()
    }

    /// Number of calls made to `op`.
    pub fn call_count(&self, op: &str) -> usize {
        self.lock().calls.iter().filter(|c| c.op == op).count()
    }

    /// Clear all state (data, queues, failures, call log).
    pub fn reset(&self) {
        *self.lock() = MockBackendInner::default();
    }

    /// Record the call, then apply the forced failure or yield if configured.
    async fn enter(&self, op: &'static str, args: &[&str]) -> Result<(), BackendError> {
        let (failure, yield_first) = {
            let mut inner = self.lock();
            inner.calls.push(MockCall {
                op: op.to_string(),
                args: args.iter().map(|a| a.to_string()).collect(),
            });
            let failure = inner.failures.get_mut(op).and_then(VecDeque::pop_front);
            (failure, inner.yield_before_reply)
        };

        if yield_first {
            tokio::task::yield_now().await;
        }

        match failure {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl Clone for MockBackend {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn get_unended_activities(&self) -> Result<Vec<Activity>, BackendError> {
        self.enter(ops::GET_UNENDED_ACTIVITIES, &[]).await?;
        Ok(self.lock().unended.clone())
    }

    async fn get_recommended_activities(&self) -> Result<Vec<Activity>, BackendError> {
        self.enter(ops::GET_RECOMMENDED_ACTIVITIES, &[]).await?;
        Ok(self.lock().recommended.clone())
    }

    async fn get_registered_activities(&self) -> Result<Vec<Activity>, BackendError> {
        self.enter(ops::GET_REGISTERED_ACTIVITIES, &[]).await?;
        Ok(self.lock().registered.clone())
    }

    async fn get_participated_activities(&self) -> Result<Vec<Activity>, BackendError> {
        self.enter(ops::GET_PARTICIPATED_ACTIVITIES, &[]).await?;
        Ok(self.lock().participated.clone())
    }

    async fn get_activity_detail(&self, activity_id: &str) -> Result<Activity, BackendError> {
        self.enter(ops::GET_ACTIVITY_DETAIL, &[activity_id]).await?;
        self.lock()
            .details
            .get(activity_id)
            .cloned()
            .ok_or_else(|| BackendError::Remote {
                code: "NOT_FOUND".to_string(),
                message: format!("activity {activity_id} not found"),
            })
    }

    async fn get_activity_children(
        &self,
        activity_id: &str,
    ) -> Result<Vec<Activity>, BackendError> {
        self.enter(ops::GET_ACTIVITY_CHILDREN, &[activity_id]).await?;
        Ok(self
            .lock()
            .children
            .get(activity_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn register_for_activity(
        &self,
        activity_id: &str,
        auto_cancel: bool,
    ) -> Result<bool, BackendError> {
        let hint = auto_cancel.to_string();
        self.enter(ops::REGISTER_FOR_ACTIVITY, &[activity_id, hint.as_str()])
            .await?;
        self.lock().register_outcomes.pop_front().unwrap_or(Ok(true))
    }

    async fn cancel_activity(&self, activity_id: &str) -> Result<bool, BackendError> {
        self.enter(ops::CANCEL_ACTIVITY, &[activity_id]).await?;
        self.lock().cancel_outcomes.pop_front().unwrap_or(Ok(true))
    }

    async fn get_login_status(&self) -> Result<LoginState, BackendError> {
        self.enter(ops::GET_LOGIN_STATUS, &[]).await?;
        Ok(self.lock().login_status.clone())
    }

    async fn login(
        &self,
        username: &str,
        _password: &str,
        save: bool,
    ) -> Result<UserInfo, BackendError> {
        let save_flag = save.to_string();
        self.enter(ops::LOGIN, &[username, save_flag.as_str()]).await?;

        let mut inner = self.lock();
        let user = inner
            .login_user
            .clone()
            .ok_or_else(|| BackendError::Rejected("invalid username or password".to_string()))?;
        inner.login_status = LoginState::signed_in(username, user.clone(), save);
        Ok(user)
    }

    async fn logout(&self) -> Result<(), BackendError> {
        self.enter(ops::LOGOUT, &[]).await?;
        let mut inner = self.lock();
        inner.login_status.logged_in = false;
        inner.login_status.user = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> UserInfo {
        UserInfo {
            id: "PB1".into(),
            name: "Zhang San".into(),
            grade: "2023".into(),
            class: "23001".into(),
            college: None,
            score: None,
            avatar: None,
        }
    }

    #[tokio::test]
    async fn serves_scripted_lists() {
        let backend = MockBackend::new();
        backend.set_unended(vec![Activity::new("a1", "Concert", 26)]);

        let catalog = backend.get_unended_activities().await.unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(backend.get_recommended_activities().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn fail_next_applies_once() {
        let backend = MockBackend::new();
        backend.fail_next(
            ops::GET_UNENDED_ACTIVITIES,
            BackendError::Transport("offline".into()),
        );

        assert!(backend.get_unended_activities().await.is_err());
        assert!(backend.get_unended_activities().await.is_ok());
        assert_eq!(backend.call_count(ops::GET_UNENDED_ACTIVITIES), 2);
    }

    #[tokio::test]
    async fn missing_detail_is_not_found() {
        let backend = MockBackend::new();
        let result = backend.get_activity_detail("nope").await;
        assert!(matches!(result, Err(BackendError::Remote { ref code, .. }) if code == "NOT_FOUND"));
    }

    #[tokio::test]
    async fn register_outcomes_are_queued() {
        let backend = MockBackend::new();
        backend.queue_register(Ok(false));
        backend.queue_register(Err(BackendError::Rejected("CONFLICT".into())));

        assert_eq!(backend.register_for_activity("a1", false).await, Ok(false));
        assert!(backend.register_for_activity("a1", false).await.is_err());
        assert_eq!(backend.register_for_activity("a1", true).await, Ok(true));

        let calls = backend.calls();
        assert_eq!(calls[2].args, vec!["a1".to_string(), "true".to_string()]);
    }

    #[tokio::test]
    async fn login_updates_status_and_hides_password() {
        let backend = MockBackend::new();
        backend.set_login_user(Some(user()));

        backend.login("PB1", "secret", true).await.unwrap();
        let status = backend.get_login_status().await.unwrap();
        assert!(status.logged_in);
        assert!(status.has_stored_creds);

        let calls = backend.calls();
        assert!(calls.iter().all(|c| !c.args.iter().any(|a| a == "secret")));
    }

    #[tokio::test]
    async fn login_without_profile_is_rejected() {
        let backend = MockBackend::new();
        assert!(backend.login("PB1", "wrong", false).await.is_err());
        assert!(!backend.get_login_status().await.unwrap().logged_in);
    }

    #[tokio::test]
    async fn logout_keeps_username() {
        let backend = MockBackend::new();
        backend.set_login_user(Some(user()));
        backend.login("PB1", "secret", false).await.unwrap();

        backend.logout().await.unwrap();
        let status = backend.get_login_status().await.unwrap();
        assert!(!status.logged_in);
        assert!(status.user.is_none());
        assert_eq!(status.username.as_deref(), Some("PB1"));
    }

    #[tokio::test]
    async fn clones_share_state() {
        let backend = MockBackend::new();
        let handle = backend.clone();
        handle.set_recommended(vec![Activity::new("r1", "Run", 26)]);

        assert_eq!(backend.get_recommended_activities().await.unwrap().len(), 1);
        assert_eq!(handle.call_count(ops::GET_RECOMMENDED_ACTIVITIES), 1);

        handle.reset();
        assert!(backend.calls().is_empty());
    }
}
