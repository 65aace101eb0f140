//! Session view: the signed-in user and the backend-reported login state.

use serde::{Deserialize, Serialize};

use crate::de;

/// Profile of the signed-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    /// Student identifier.
    pub id: String,
    /// Display name.
    #[serde(alias = "realname")]
    pub name: String,
    /// Grade (enrolment year).
    #[serde(default)]
    pub grade: String,
    /// Class.
    #[serde(alias = "classes", default)]
    pub class: String,
    /// College, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub college: Option<String>,
    /// Score reported by the backend.
    #[serde(alias = "scientificqiValue", default, deserialize_with = "de::opt_f64", skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    /// Avatar reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Login state as reported by the backend.
///
/// `logged_in == false` implies `user.is_none()`, and `user.is_some()`
/// implies `logged_in`. States built through [`LoginState::normalized`]
/// always hold both.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoginState {
    /// Whether a session is active.
    #[serde(default)]
    pub logged_in: bool,
    /// Whether credentials are stored for automatic login.
    #[serde(default)]
    pub has_stored_creds: bool,
    /// Remembered username, kept after logout for prefill.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Profile of the signed-in user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserInfo>,
}

impl LoginState {
    /// The definite logged-out state with nothing remembered.
    pub fn logged_out() -> Self {
        Self::default()
    }

    /// State right after a successful login.
    pub fn signed_in(username: &str, user: UserInfo, has_stored_creds: bool) -> Self {
        Self {
            logged_in: true,
            has_stored_creds,
            username: Some(username.to_string()),
            user: Some(user),
        }
    }

    /// Enforce the logged-in/user invariant.
    ///
    /// `logged_in` is authoritative: a missing session drops any stale user.
    pub fn normalized(mut self) -> Self {
        if !self.logged_in {
            self.user = None;
        }
        self
    }

    /// Name to show for the session.
    pub fn display_name(&self) -> &str {
        self.user
            .as_ref()
            .map(|u| u.name.as_str())
            .filter(|name| !name.is_empty())
            .or_else(|| self.username.as_deref().filter(|name| !name.is_empty()))
            .unwrap_or("Not logged in")
    }
}
