//! Summary counters for dashboard headers

use super::normalize::{TicketView, UserView};
use shared::models::{TicketStatus, UserStatus};

/// Ticket counters. `open` counts everything still being worked on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TicketStats {
    pub total: usize,
    /// Open + In Progress
    pub open: usize,
    pub in_progress: usize,
    pub resolved: usize,
}

impl TicketStats {
    pub fn from_tickets<'a>(tickets: impl IntoIterator<Item = &'a TicketView>) -> Self {
        tickets.into_iter().fold(Self::default(), |mut stats, ticket| {
            stats.total += 1;
            match ticket.status {
                TicketStatus::Open => stats.open += 1,
                TicketStatus::InProgress => {
                    stats.open += 1;
                    stats.in_progress += 1;
                }
                TicketStatus::Resolved => stats.resolved += 1,
                TicketStatus::Closed => {}
            }
            stats
        })
    }
}

/// User-management counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserStats {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    pub admins: usize,
}

impl UserStats {
    pub fn from_users<'a>(users: impl IntoIterator<Item = &'a UserView>) -> Self {
        users.into_iter().fold(Self::default(), |mut stats, user| {
            stats.total += 1;
            match user.status {
                UserStatus::Active => stats.active += 1,
                UserStatus::Inactive => stats.inactive += 1,
                UserStatus::Pending => {}
            }
            if user.is_admin() {
                stats.admins += 1;
            }
            stats
        })
    }
}
