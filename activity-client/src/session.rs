//! Session store.
//!
//! Thin cached mirror of the backend-reported [`LoginState`]. Every state it
//! installs is normalized, so `user` is only present while `logged_in` holds.

use std::sync::Arc;

use campus_activity_types::LoginState;
use tokio::sync::Mutex;

use crate::backend::{Backend, BackendError};
use crate::logs::LogStore;

#[derive(Debug, Default)]
struct SessionState {
    status: LoginState,
    loading: bool,
    error: Option<String>,
}

/// Cached login state.
pub struct SessionStore<B: Backend> {
    backend: Arc<B>,
    logs: Arc<LogStore>,
    state: Mutex<SessionState>,
}

impl<B: Backend> SessionStore<B> {
    /// Create a store in the logged-out state.
    pub fn new(backend: Arc<B>, logs: Arc<LogStore>) -> Self {
        Self {
            backend,
            logs,
            state: Mutex::new(SessionState::default()),
        }
    }

    /// Replace the cached state with the backend's.
    ///
    /// A failure leaves the cached state and records the message.
    pub async fn fetch_status(&self) {
        self.begin().await;
        let result = self.refresh_status().await;

        let mut state = self.state.lock().await;
        if let Err(e) = result {
            tracing::warn!(error = %e, "failed to fetch login status");
            state.error = Some(e.to_string());
        }
        state.loading = false;
    }

    async fn refresh_status(&self) -> Result<(), BackendError> {
        let status = self.backend.get_login_status().await?.normalized();
        self.state.lock().await.status = status;
        Ok(())
    }

    /// Sign in. Returns whether it worked.
    ///
    /// On success the logged-in state is built from the returned profile
    /// without asking the backend again; on failure the state is unchanged.
    pub async fn login(&self, username: &str, password: &str, save: bool) -> bool {
        self.begin().await;
        let result = self.backend.login(username, password, save).await;

        let ok = {
            let mut state = self.state.lock().await;
            state.loading = false;
            match result {
                Ok(user) => {
                    state.status = LoginState::signed_in(username, user, save).normalized();
                    Ok(())
                }
                Err(e) => {
                    state.error = Some(e.to_string());
                    Err(e)
                }
            }
        };

        match ok {
            Ok(()) => {
                self.logs.add(&format!("Logged in as {username}")).await;
                true
            }
            Err(e) => {
                self.logs.add(&format!("Login failed: {e}")).await;
                false
            }
        }
    }

    /// Sign out, then reconcile with the backend.
    ///
    /// If either step fails the state falls back to definitely logged out.
    pub async fn logout(&self) {
        let result = match self.backend.logout().await {
            Ok(()) => self.refresh_status().await,
            Err(e) => Err(e),
        };

        if let Err(e) = result {
            tracing::warn!(error = %e, "logout failed, dropping cached session");
            self.state.lock().await.status = LoginState::logged_out();
        }
        self.logs.add("Logged out").await;
    }

    /// Snapshot of the cached state.
    pub async fn status(&self) -> LoginState {
        self.state.lock().await.status.clone()
    }

    /// Whether a session is active.
    pub async fn is_logged_in(&self) -> bool {
        self.state.lock().await.status.logged_in
    }

    /// Name to show for the session.
    pub async fn display_name(&self) -> String {
        self.state.lock().await.status.display_name().to_string()
    }

    /// Whether a status fetch or login is in flight.
    pub async fn loading(&self) -> bool {
        self.state.lock().await.loading
    }

    /// Last failure message.
    pub async fn error(&self) -> Option<String> {
        self.state.lock().await.error.clone()
    }

    async fn begin(&self) {
        let mut state = self.state.lock().await;
        state.loading = true;
        state.error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{ops, MockBackend};
    use crate::document::MemoryDocument;
    use campus_activity_types::UserInfo;

    fn user() -> UserInfo {
        UserInfo {
            id: "PB23000001".into(),
            name: "Zhang San".into(),
            grade: "2023".into(),
            class: "23001".into(),
            college: Some("Physics".into()),
            score: Some(12.5),
            avatar: None,
        }
    }

    fn session(backend: &MockBackend) -> SessionStore<MockBackend> {
        let logs = Arc::new(LogStore::new(Arc::new(MemoryDocument::new())));
        SessionStore::new(Arc::new(backend.clone()), logs)
    }

    #[tokio::test]
    async fn starts_logged_out() {
        let store = session(&MockBackend::new());
        assert!(!store.is_logged_in().await);
        assert_eq!(store.display_name().await, "Not logged in");
    }

    #[tokio::test]
    async fn fetch_status_replaces_and_normalizes() {
        let backend = MockBackend::new();
        backend.set_login_status(LoginState {
            logged_in: true,
            has_stored_creds: true,
            username: Some("PB23000001".into()),
            user: Some(user()),
        });
        let store = session(&backend);

        store.fetch_status().await;

        let status = store.status().await;
        assert!(status.logged_in);
        assert!(status.user.is_some());
        assert!(!store.loading().await);
    }

    #[tokio::test]
    async fn fetch_status_drops_stale_user_when_logged_out() {
        let backend = MockBackend::new();
        backend.set_login_status(LoginState {
            logged_in: false,
            has_stored_creds: true,
            username: Some("PB23000001".into()),
            user: Some(user()),
        });
        let store = session(&backend);

        store.fetch_status().await;

        let status = store.status().await;
        assert!(!status.logged_in);
        assert!(status.user.is_none());
        assert_eq!(status.username.as_deref(), Some("PB23000001"));
        assert!(!store.is_logged_in().await);
    }

    #[tokio::test]
    async fn fetch_status_failure_keeps_state_and_records_error() {
        let backend = MockBackend::new();
        backend.fail_next(
            ops::GET_LOGIN_STATUS,
            BackendError::Transport("offline".into()),
        );
        let store = session(&backend);

        store.fetch_status().await;

        assert_eq!(store.status().await, LoginState::logged_out());
        assert_eq!(store.error().await.as_deref(), Some("transport failure: offline"));
        assert!(!store.loading().await);
    }

    #[tokio::test]
    async fn login_synthesizes_state_without_round_trip() {
        let backend = MockBackend::new();
        backend.set_login_user(Some(user()));
        let store = session(&backend);

        assert!(store.login("PB23000001", "secret", true).await);

        let status = store.status().await;
        assert!(status.logged_in);
        assert!(status.has_stored_creds);
        assert_eq!(status.username.as_deref(), Some("PB23000001"));
        assert_eq!(store.display_name().await, "Zhang San");
        assert_eq!(backend.call_count(ops::GET_LOGIN_STATUS), 0);
    }

    #[tokio::test]
    async fn failed_login_leaves_state_unchanged() {
        let backend = MockBackend::new();
        let store = session(&backend);

        assert!(!store.login("PB23000001", "wrong", false).await);

        assert_eq!(store.status().await, LoginState::logged_out());
        assert!(store.error().await.is_some());
        assert!(!store.loading().await);
    }

    #[tokio::test]
    async fn logout_reconciles_with_backend() {
        let backend = MockBackend::new();
        backend.set_login_user(Some(user()));
        let store = session(&backend);
        store.login("PB23000001", "secret", true).await;

        store.logout().await;

        let status = store.status().await;
        assert!(!status.logged_in);
        assert!(status.user.is_none());
        assert_eq!(status.username.as_deref(), Some("PB23000001"));
        assert_eq!(store.display_name().await, "PB23000001");
    }

    #[tokio::test]
    async fn failed_logout_falls_back_to_logged_out() {
        let backend = MockBackend::new();
        backend.set_login_user(Some(user()));
        let store = session(&backend);
        store.login("PB23000001", "secret", true).await;
        backend.fail_next(ops::LOGOUT, BackendError::Transport("offline".into()));

        store.logout().await;

        assert_eq!(store.status().await, LoginState::logged_out());
    }

    #[tokio::test]
    async fn failed_reconcile_after_logout_falls_back_to_logged_out() {
        let backend = MockBackend::new();
        backend.set_login_user(Some(user()));
        let store = session(&backend);
        store.login("PB23000001", "secret", true).await;
        backend.fail_next(
            ops::GET_LOGIN_STATUS,
            BackendError::Transport("offline".into()),
        );

        store.logout().await;

        assert_eq!(store.status().await, LoginState::logged_out());
    }
}
