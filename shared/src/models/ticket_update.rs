//! Ticket Update (comment thread) Model

use super::{RecordId, UserRef, lenient};
use serde::{Deserialize, Serialize};

/// One entry in a ticket's update thread
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TicketUpdate {
    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub id: Option<RecordId>,
    #[serde(default, alias = "ticketId", deserialize_with = "lenient::opt_id")]
    pub ticket_id: Option<RecordId>,
    #[serde(default, alias = "body", alias = "content", deserialize_with = "lenient::opt_string")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_object")]
    pub user: Option<UserRef>,
    #[serde(default, alias = "createdAt", deserialize_with = "lenient::opt_string")]
    pub created_at: Option<String>,
}

/// Post update payload (`POST /tickets/:id/updates`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketUpdateCreate {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_alias() {
        let update: TicketUpdate =
            serde_json::from_str(r#"{"id": 1, "ticket_id": 9, "body": "Rebooted the printer"}"#).unwrap();
        assert_eq!(update.message.as_deref(), Some("Rebooted the printer"));
        assert_eq!(update.ticket_id, Some(RecordId::Int(9)));
    }
}
