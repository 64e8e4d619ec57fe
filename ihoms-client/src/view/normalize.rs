//! Adapter boundary: raw backend records -> view records
//!
//! Everything downstream (filters, paginator, permission gate, dispatcher)
//! works on [`TicketView`] and [`UserView`] only. Normalization is total:
//! any raw record, however sparse, yields a view with every display field
//! set. Missing text becomes `""`, missing identifiers become `None`.

use shared::models::{
    NamedRef, RecordId, Ticket, TicketPriority, TicketStatus, User, UserRef, UserStatus,
};

/// Shown for a person record that carries neither a name nor an email
pub const UNNAMED_PERSON: &str = "Unassigned";

/// "First Last", else the email, else [`UNNAMED_PERSON`]
pub fn person_name(first: Option<&str>, last: Option<&str>, email: Option<&str>) -> String {
    let first = first.unwrap_or_default().trim();
    let last = last.unwrap_or_default().trim();
    let name = format!("{} {}", first, last).trim().to_string();
    if !name.is_empty() {
        return name;
    }
    match email.map(str::trim) {
        Some(email) if !email.is_empty() => email.to_string(),
        _ => UNNAMED_PERSON.to_string(),
    }
}

/// Display name of an embedded user; `""` when the relation is absent
fn user_ref_name(user: Option<&UserRef>) -> String {
    user.map(|u| person_name(u.first_name.as_deref(), u.last_name.as_deref(), u.email.as_deref()))
        .unwrap_or_default()
}

fn relation_name(relation: Option<&NamedRef>) -> Option<String> {
    relation.and_then(|r| r.name.clone())
}

fn id_key(id: Option<&RecordId>) -> Option<String> {
    id.map(RecordId::key).filter(|key| !key.is_empty())
}

/// Ticket ready for display and permission checks
#[derive(Debug, Clone, PartialEq)]
pub struct TicketView {
    /// `""` only when the backend sent no id at all
    pub id: String,
    pub title: String,
    pub description: String,
    pub requester: String,
    pub department: String,
    pub category: String,
    /// Location name, else the department name
    pub location: String,
    pub priority: TicketPriority,
    pub status: TicketStatus,
    pub created_at: Option<String>,
    /// Falls back to `created_at`
    pub updated_at: Option<String>,

    /// Assignee display name; `None` when nobody is assigned
    pub assigned_to: Option<String>,
    pub assignee_id: Option<String>,
    pub assigned_at: Option<String>,

    pub user_id: Option<String>,
    pub category_id: Option<String>,
    pub department_id: Option<String>,
    pub location_id: Option<String>,
    pub contact_number: String,
    pub patient_name: String,
    pub equipment_details: String,
    pub urgency_reason: String,

    /// Source record, kept for anything the view does not carry
    pub raw: Ticket,
}

impl TicketView {
    pub fn is_assigned(&self) -> bool {
        self.assignee_id.is_some() || self.assigned_to.is_some()
    }

    /// Rebuild a wire record carrying this view's values.
    ///
    /// `normalize_ticket(view.to_wire())` reproduces every display field.
    pub fn to_wire(&self) -> Ticket {
        fn non_empty(value: &str) -> Option<String> {
            (!value.is_empty()).then(|| value.to_string())
        }
        fn named(value: &str) -> Option<NamedRef> {
            non_empty(value).map(NamedRef::named)
        }

        Ticket {
            id: non_empty(&self.id).map(RecordId::from),
            title: Some(self.title.clone()),
            description: Some(self.description.clone()),
            priority: Some(self.priority.as_wire().to_string()),
            status: Some(self.status.as_wire().to_string()),
            created_at: self.created_at.clone(),
            updated_at: self.updated_at.clone(),
            assigned_at: self.assigned_at.clone(),
            user_id: self.user_id.clone().map(RecordId::from),
            assignee_id: self.assignee_id.clone().map(RecordId::from),
            category_id: self.category_id.clone().map(RecordId::from),
            department_id: self.department_id.clone().map(RecordId::from),
            location_id: self.location_id.clone().map(RecordId::from),
            contact_number: non_empty(&self.contact_number),
            patient_name: non_empty(&self.patient_name),
            equipment_details: non_empty(&self.equipment_details),
            urgency_reason: non_empty(&self.urgency_reason),
            user: non_empty(&self.requester).map(|name| UserRef {
                first_name: Some(name),
                ..UserRef::default()
            }),
            assignee: self.assigned_to.clone().map(|name| UserRef {
                id: self.assignee_id.clone().map(RecordId::from),
                first_name: Some(name),
                ..UserRef::default()
            }),
            category: named(&self.category),
            department: named(&self.department),
            location: named(&self.location),
        }
    }
}

/// Normalize one raw ticket
pub fn normalize_ticket(raw: Ticket) -> TicketView {
    let department = relation_name(raw.department.as_ref()).unwrap_or_default();
    let location = relation_name(raw.location.as_ref()).unwrap_or_else(|| department.clone());
    let assignee_id = id_key(raw.assignee.as_ref().and_then(|a| a.id.as_ref()))
        .or_else(|| id_key(raw.assignee_id.as_ref()));

    TicketView {
        id: raw.id.as_ref().map(RecordId::key).unwrap_or_default(),
        title: raw.title.clone().unwrap_or_default(),
        description: raw.description.clone().unwrap_or_default(),
        requester: user_ref_name(raw.user.as_ref()),
        category: relation_name(raw.category.as_ref()).unwrap_or_default(),
        department,
        location,
        priority: raw
            .priority
            .as_deref()
            .map(TicketPriority::from_wire)
            .unwrap_or_default(),
        status: raw
            .status
            .as_deref()
            .map(TicketStatus::from_wire)
            .unwrap_or_default(),
        created_at: raw.created_at.clone(),
        updated_at: raw.updated_at.clone().or_else(|| raw.created_at.clone()),
        assigned_to: raw.assignee.as_ref().map(|a| user_ref_name(Some(a))),
        assignee_id,
        assigned_at: raw.assigned_at.clone(),
        user_id: id_key(raw.user_id.as_ref()),
        category_id: id_key(raw.category_id.as_ref()),
        department_id: id_key(raw.department_id.as_ref()),
        location_id: id_key(raw.location_id.as_ref()),
        contact_number: raw.contact_number.clone().unwrap_or_default(),
        patient_name: raw.patient_name.clone().unwrap_or_default(),
        equipment_details: raw.equipment_details.clone().unwrap_or_default(),
        urgency_reason: raw.urgency_reason.clone().unwrap_or_default(),
        raw,
    }
}

pub fn normalize_tickets(raw: Vec<Ticket>) -> Vec<TicketView> {
    raw.into_iter().map(normalize_ticket).collect()
}

/// User ready for the user-management table
#[derive(Debug, Clone, PartialEq)]
pub struct UserView {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub email: String,
    /// Role name as the backend spells it ("Administrator", "agent", ...)
    pub role: String,
    pub role_id: Option<String>,
    pub department: String,
    pub department_id: Option<String>,
    pub status: UserStatus,
    pub created_at: Option<String>,
    pub raw: User,
}

impl UserView {
    pub fn is_admin(&self) -> bool {
        matches!(self.role.trim().to_lowercase().as_str(), "admin" | "administrator")
    }
}

/// Normalize one raw user
pub fn normalize_user(raw: User) -> UserView {
    UserView {
        id: raw.id.as_ref().map(RecordId::key).unwrap_or_default(),
        first_name: raw.first_name.as_deref().unwrap_or_default().trim().to_string(),
        last_name: raw.last_name.as_deref().unwrap_or_default().trim().to_string(),
        full_name: person_name(
            raw.first_name.as_deref(),
            raw.last_name.as_deref(),
            raw.email.as_deref(),
        ),
        email: raw.email.clone().unwrap_or_default(),
        role: raw
            .role
            .as_ref()
            .and_then(|r| r.name())
            .unwrap_or_default()
            .trim()
            .to_string(),
        role_id: id_key(raw.effective_role_id().as_ref()),
        department: relation_name(raw.department.as_ref()).unwrap_or_default(),
        department_id: id_key(
            raw.department_id
                .as_ref()
                .or_else(|| raw.department.as_ref().and_then(|d| d.id.as_ref())),
        ),
        status: raw.effective_status(),
        created_at: raw.created_at.clone(),
        raw,
    }
}

pub fn normalize_users(raw: Vec<User>) -> Vec<UserView> {
    raw.into_iter().map(normalize_user).collect()
}
