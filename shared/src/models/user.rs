//! User Model

use super::{NamedRef, RecordId, RoleRef, lenient};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Account status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
    Pending,
}

impl UserStatus {
    /// Map a backend value, ignoring case. Unknown values fall back to `Active`.
    pub fn from_wire(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "inactive" | "disabled" => Self::Inactive,
            "pending" => Self::Pending,
            _ => Self::Active,
        }
    }

    pub fn as_wire(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Pending => "pending",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
            Self::Pending => "Pending",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// User as returned by `/auth/me`, `/auth/login` and `/users`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub id: Option<RecordId>,
    #[serde(default, alias = "firstName", deserialize_with = "lenient::opt_string")]
    pub first_name: Option<String>,
    #[serde(default, alias = "lastName", deserialize_with = "lenient::opt_string")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub status: Option<String>,
    #[serde(default, alias = "isActive", deserialize_with = "lenient::opt_bool")]
    pub is_active: Option<bool>,
    #[serde(default, deserialize_with = "lenient::opt_role")]
    pub role: Option<RoleRef>,
    #[serde(default, alias = "roleId", deserialize_with = "lenient::opt_id")]
    pub role_id: Option<RecordId>,
    #[serde(default, deserialize_with = "lenient::opt_named")]
    pub department: Option<NamedRef>,
    #[serde(default, alias = "departmentId", deserialize_with = "lenient::opt_id")]
    pub department_id: Option<RecordId>,
    #[serde(default, alias = "createdAt", deserialize_with = "lenient::opt_string")]
    pub created_at: Option<String>,
}

impl User {
    /// Role id from the flat column, else from the embedded role
    pub fn effective_role_id(&self) -> Option<RecordId> {
        self.role_id
            .clone()
            .or_else(|| self.role.as_ref().and_then(|r| r.id().cloned()))
    }

    /// Explicit status wins over the `is_active` flag
    pub fn effective_status(&self) -> UserStatus {
        match (&self.status, self.is_active) {
            (Some(status), _) if !status.trim().is_empty() => UserStatus::from_wire(status),
            (_, Some(false)) => UserStatus::Inactive,
            _ => UserStatus::Active,
        }
    }
}
