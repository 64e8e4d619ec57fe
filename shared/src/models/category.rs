//! Category Model

use super::{RecordId, lenient};
use serde::{Deserialize, Serialize};

/// Ticket category (Hardware, Network, Printer, ...)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub id: Option<RecordId>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub description: Option<String>,
}
