//! Location Model

use super::{RecordId, lenient};
use serde::{Deserialize, Serialize};

/// Physical location a ticket is raised from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub id: Option<RecordId>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub department_id: Option<RecordId>,
}
