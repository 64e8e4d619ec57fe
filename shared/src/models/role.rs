//! Role Model

use super::{NamedRef, RecordId, lenient};
use serde::{Deserialize, Serialize};

/// Role entity (RBAC)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Role {
    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub id: Option<RecordId>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::vec_lenient")]
    pub permissions: Vec<Permission>,
}

/// Permission entity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Permission {
    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub id: Option<RecordId>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub description: Option<String>,
}

/// Role as embedded in a user record: either `{ "id": 2, "name": "agent" }`
/// or just `"agent"`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoleRef {
    Object(NamedRef),
    Name(String),
}

impl RoleRef {
    pub fn id(&self) -> Option<&RecordId> {
        match self {
            Self::Object(role) => role.id.as_ref(),
            Self::Name(_) => None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Object(role) => role.name.as_deref(),
            Self::Name(name) => Some(name.as_str()),
        }
    }
}
