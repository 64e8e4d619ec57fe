//! Department Model

use super::{RecordId, lenient};
use serde::{Deserialize, Serialize};

/// Hospital department a user or ticket belongs to
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Department {
    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub id: Option<RecordId>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
}

impl Department {
    /// Identity used for de-duplication: the id, or the name when the id is missing
    pub fn identity(&self) -> Option<String> {
        self.id
            .as_ref()
            .map(RecordId::key)
            .or_else(|| self.name.clone())
    }
}
