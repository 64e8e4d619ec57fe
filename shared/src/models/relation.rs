//! Nested relation stubs
//!
//! Eager-loaded relations embedded in a parent record. The backend only
//! includes the handful of columns a list view needs.

use super::{RecordId, lenient};
use serde::{Deserialize, Serialize};

/// `{ "id": .., "name": .. }` relation (category, department, location, role)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamedRef {
    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub id: Option<RecordId>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
}

impl NamedRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
        }
    }
}

/// Embedded user (ticket requester, assignee, comment author)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserRef {
    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub id: Option<RecordId>,
    #[serde(default, alias = "firstName", deserialize_with = "lenient::opt_string")]
    pub first_name: Option<String>,
    #[serde(default, alias = "lastName", deserialize_with = "lenient::opt_string")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub email: Option<String>,
}
