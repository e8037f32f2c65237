//! User roles and the permissions they grant.
//!
//! A role is resolved once from the backend's role field when a user logs
//! in. Every access check afterwards goes through [`Role::can`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from resolving a role name.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RoleError {
    #[error("Unknown role '{0}'")]
    Unknown(String),
}

/// Something a user may do in the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Log production counts, downtime and rejects.
    DataEntry,
    /// Open the OEE and Pareto dashboards.
    ViewAnalytics,
    /// Approve or reject pending registrations.
    ApproveUsers,
    /// Edit processes, units and defect lists.
    EditMasterData,
    ViewSystemHealth,
}

/// Account role as assigned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Role {
    Operator,
    Foreman,
    Manager,
    Admin,
}

const FLOOR: &[Permission] = &[Permission::DataEntry];

const MANAGER: &[Permission] = &[Permission::DataEntry, Permission::ViewAnalytics];

const ADMIN: &[Permission] = &[
    Permission::DataEntry,
    Permission::ViewAnalytics,
    Permission::ApproveUsers,
    Permission::EditMasterData,
    Permission::ViewSystemHealth,
];

impl Role {
    pub const ALL: [Role; 4] = [Role::Operator, Role::Foreman, Role::Manager, Role::Admin];

    /// The full permission set for this role.
    pub fn permissions(self) -> &'static [Permission] {
        match self {
            Role::Operator | Role::Foreman => FLOOR,
            Role::Manager => MANAGER,
            Role::Admin => ADMIN,
        }
    }

    #[inline]
    pub fn can(self, permission: Permission) -> bool {
        self.permissions().contains(&permission)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Operator => "operator",
            Role::Foreman => "foreman",
            Role::Manager => "manager",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = RoleError;

    /// Exact, case-insensitive match on the role name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| RoleError::Unknown(s.to_string()))
    }
}

impl TryFrom<String> for Role {
    type Error = RoleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
