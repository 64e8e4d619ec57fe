//! Ticket Model

use super::{NamedRef, RecordId, UserRef, lenient};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ticket priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketPriority {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

impl TicketPriority {
    pub const ALL: [TicketPriority; 4] = [Self::Low, Self::Medium, Self::High, Self::Critical];

    /// Map a backend or form value, ignoring case. Unknown values fall back to `Low`.
    pub fn from_wire(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "critical" => Self::Critical,
            "high" => Self::High,
            "medium" => Self::Medium,
            _ => Self::Low,
        }
    }

    /// Value sent to the backend
    pub fn as_wire(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }

    /// High and Critical tickets need a written urgency reason
    pub fn requires_urgency_reason(&self) -> bool {
        matches!(self, Self::High | Self::Critical)
    }
}

impl fmt::Display for TicketPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ticket status
///
/// ```text
/// Open ──► In Progress ──► Resolved ──► Closed
///   │           │                          ▲
///   ├───────────┼──────────► Resolved      │
///   └───────────┴──────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    #[default]
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl TicketStatus {
    pub const ALL: [TicketStatus; 4] = [Self::Open, Self::InProgress, Self::Resolved, Self::Closed];

    /// Map a backend value or display label, ignoring case. Unknown values fall back to `Open`.
    pub fn from_wire(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "in_progress" | "in progress" | "in-progress" => Self::InProgress,
            "resolved" => Self::Resolved,
            "closed" => Self::Closed,
            _ => Self::Open,
        }
    }

    /// Value sent to the backend
    pub fn as_wire(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
        }
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::InProgress => "In Progress",
            Self::Resolved => "Resolved",
            Self::Closed => "Closed",
        }
    }

    /// Statuses in which assign/unassign/resolve may be legal
    pub fn is_actionable(&self) -> bool {
        matches!(self, Self::Open | Self::InProgress)
    }

    /// Whether the backend may move a ticket from `self` to `next`
    pub fn can_transition_to(&self, next: TicketStatus) -> bool {
        use TicketStatus::*;
        matches!(
            (self, next),
            (Open, InProgress) | (Open, Resolved) | (Open, Closed)
                | (InProgress, Resolved) | (InProgress, Closed)
                | (Resolved, Closed)
        )
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ticket as returned by `GET /tickets` and the mutation endpoints
///
/// Relations (`user`, `assignee`, `category`, ...) are present only when
/// the backend eager-loaded them; the flat `*_id` columns may be present
/// without them and vice versa.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub id: Option<RecordId>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub priority: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub status: Option<String>,

    #[serde(default, alias = "createdAt", deserialize_with = "lenient::opt_string")]
    pub created_at: Option<String>,
    #[serde(default, alias = "updatedAt", deserialize_with = "lenient::opt_string")]
    pub updated_at: Option<String>,
    #[serde(default, alias = "assignedAt", deserialize_with = "lenient::opt_string")]
    pub assigned_at: Option<String>,

    #[serde(default, alias = "userId", deserialize_with = "lenient::opt_id")]
    pub user_id: Option<RecordId>,
    #[serde(default, alias = "assigneeId", deserialize_with = "lenient::opt_id")]
    pub assignee_id: Option<RecordId>,
    #[serde(default, alias = "categoryId", deserialize_with = "lenient::opt_id")]
    pub category_id: Option<RecordId>,
    #[serde(default, alias = "departmentId", deserialize_with = "lenient::opt_id")]
    pub department_id: Option<RecordId>,
    #[serde(default, alias = "locationId", deserialize_with = "lenient::opt_id")]
    pub location_id: Option<RecordId>,

    #[serde(default, alias = "contactNumber", alias = "contact_phone", deserialize_with = "lenient::opt_string")]
    pub contact_number: Option<String>,
    #[serde(default, alias = "patientName", deserialize_with = "lenient::opt_string")]
    pub patient_name: Option<String>,
    #[serde(default, alias = "equipmentDetails", deserialize_with = "lenient::opt_string")]
    pub equipment_details: Option<String>,
    #[serde(default, alias = "urgencyReason", deserialize_with = "lenient::opt_string")]
    pub urgency_reason: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_object")]
    pub user: Option<UserRef>,
    #[serde(default, deserialize_with = "lenient::opt_object")]
    pub assignee: Option<UserRef>,
    #[serde(default, deserialize_with = "lenient::opt_named")]
    pub category: Option<NamedRef>,
    #[serde(default, deserialize_with = "lenient::opt_named")]
    pub department: Option<NamedRef>,
    #[serde(default, deserialize_with = "lenient::opt_named")]
    pub location: Option<NamedRef>,
}

/// Create ticket payload (`POST /tickets`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketCreate {
    pub title: String,
    pub description: String,
    pub category_id: i64,
    pub location_id: i64,
    pub department_id: i64,
    pub priority: TicketPriority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_number: Option<String>,
    pub patient_name: Option<String>,
    pub equipment_details: Option<String>,
    pub urgency_reason: Option<String>,
}

/// Unassign payload (`POST /tickets/:id/unassign`)
///
/// `expected_assignee_id` lets the backend reject the call with 409 when
/// the ticket was reassigned after the caller last saw it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnassignRequest {
    pub expected_assignee_id: Option<RecordId>,
}
