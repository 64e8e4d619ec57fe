//! Filter/search engine
//!
//! A filter is a free-text query OR'd across a fixed set of text fields,
//! AND'd with any number of facets. Filtering is stable: survivors keep
//! their input order.

use super::normalize::{TicketView, UserView};
use shared::models::{TicketPriority, TicketStatus, UserStatus};
use std::str::FromStr;

/// One categorical filter dimension
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Facet<T> {
    /// No restriction
    All,
    /// Exact match on this value
    Only(T),
}

impl<T> Default for Facet<T> {
    fn default() -> Self {
        Self::All
    }
}

impl<T: PartialEq> Facet<T> {
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == value,
        }
    }
}

impl<T> Facet<T> {
    /// `"all"` (any case) or a blank value means no restriction
    pub fn from_param(param: &str, parse: impl FnOnce(&str) -> T) -> Self {
        let param = param.trim();
        if param.is_empty() || param.eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::Only(parse(param))
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl Facet<String> {
    /// Case-insensitive text facet
    pub fn text(param: &str) -> Self {
        Self::from_param(param, str::to_lowercase)
    }

    pub fn admits_text(&self, value: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => value.trim().to_lowercase() == *wanted,
        }
    }
}

/// Predicate over one kind of record
pub trait RecordFilter<R> {
    fn matches(&self, record: &R) -> bool;
}

/// Records admitted by `filter`, in input order
pub fn filter_records<'a, R, F>(records: &'a [R], filter: &F) -> Vec<&'a R>
where
    F: RecordFilter<R>,
{
    records.iter().filter(|r| filter.matches(r)).collect()
}

/// Case-insensitive substring match of `query` against any of `fields`.
/// A blank query matches everything.
fn text_matches(query: &str, fields: &[&str]) -> bool {
    let query = query.trim().to_lowercase();
    query.is_empty() || fields.iter().any(|f| f.to_lowercase().contains(&query))
}

// =============================================================================
// Tickets
// =============================================================================

/// Dashboard tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TicketTab {
    All,
    #[default]
    Open,
    /// Tickets that have an assignee
    Assigned,
}

impl FromStr for TicketTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "open" => Ok(Self::Open),
            "assigned" => Ok(Self::Assigned),
            other => Err(format!("unknown tab '{}' (expected all, open or assigned)", other)),
        }
    }
}

/// Ticket list filter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TicketFilter {
    /// Matched against title, description and requester
    pub query: String,
    pub status: Facet<TicketStatus>,
    pub assigned_only: bool,
    pub priority: Facet<TicketPriority>,
    /// Category name, lower-cased
    pub category: Facet<String>,
}

impl TicketFilter {
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Apply a dashboard tab (status facet plus the assigned-only flag)
    pub fn with_tab(mut self, tab: TicketTab) -> Self {
        let (status, assigned_only) = match tab {
            TicketTab::All => (Facet::All, false),
            TicketTab::Open => (Facet::Only(TicketStatus::Open), false),
            TicketTab::Assigned => (Facet::All, true),
        };
        self.status = status;
        self.assigned_only = assigned_only;
        self
    }

    pub fn with_status(mut self, status: Facet<TicketStatus>) -> Self {
        self.status = status;
        self
    }

    pub fn with_priority(mut self, priority: Facet<TicketPriority>) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = Facet::text(category);
        self
    }
}

impl RecordFilter<TicketView> for TicketFilter {
    fn matches(&self, ticket: &TicketView) -> bool {
        text_matches(
            &self.query,
            &[&ticket.title, &ticket.description, &ticket.requester],
        ) && self.status.admits(&ticket.status)
            && (!self.assigned_only || ticket.is_assigned())
            && self.priority.admits(&ticket.priority)
            && self.category.admits_text(&ticket.category)
    }
}

// =============================================================================
// Users
// =============================================================================

/// User-management filter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserFilter {
    /// Matched against first name, last name, email and department
    pub search: String,
    /// Role name, lower-cased
    pub role: Facet<String>,
    pub status: Facet<UserStatus>,
}

impl UserFilter {
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_role(mut self, role: &str) -> Self {
        self.role = Facet::text(role);
        self
    }

    pub fn with_status(mut self, status: Facet<UserStatus>) -> Self {
        self.status = status;
        self
    }
}

impl RecordFilter<UserView> for UserFilter {
    fn matches(&self, user: &UserView) -> bool {
        text_matches(
            &self.search,
            &[&user.first_name, &user.last_name, &user.email, &user.department],
        ) && self.role.admits_text(&user.role)
            && self.status.admits(&user.status)
    }
}
