//! Logged-in user and the application state that owns it.
//!
//! `AppState` is an ordinary value handed to whoever needs it; there is no
//! global. Keeping the session across page reloads is the host's job.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::role::{Permission, Role};

/// Registration review state of an account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl AccountStatus {
    /// Whether an admin has decided either way.
    pub fn is_decided(self) -> bool {
        !matches!(self, AccountStatus::Pending)
    }

    /// Case-insensitive lookup of the backend's status string.
    pub fn from_name(name: &str) -> Option<Self> {
        [Self::Pending, Self::Approved, Self::Rejected]
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(name.trim()))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AccountStatus::Pending => "pending",
            AccountStatus::Approved => "approved",
            AccountStatus::Rejected => "rejected",
        }
    }
}

/// A user record as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub name: String,
    pub role: Role,
    /// Free-text job title; display only, never used for access checks.
    #[serde(default)]
    pub job_title: Option<String>,
    /// Production zone the user is assigned to.
    #[serde(default)]
    pub zone: Option<String>,
    /// Profile photo as a JPEG data URI.
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub status: AccountStatus,
}

impl User {
    pub fn can(&self, permission: Permission) -> bool {
        self.role.can(permission)
    }
}

/// Client-side application state.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    user: Option<User>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `user` as the current user, replacing any previous one.
    pub fn login(&mut self, user: User) {
        info!(username = %user.username, role = %user.role, "user logged in");
        self.user = Some(user);
    }

    /// Clear the current user. Returns the user that was logged in.
    pub fn logout(&mut self) -> Option<User> {
        let user = self.user.take();
        if let Some(user) = &user {
            info!(username = %user.username, "user logged out");
        }
        user
    }

    pub fn current_user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
    }

    /// Whether the current user holds `permission`. False when logged out.
    pub fn can(&self, permission: Permission) -> bool {
        self.user.as_ref().is_some_and(|u| u.can(permission))
    }
}
