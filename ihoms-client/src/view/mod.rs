//! View state
//!
//! Pure projections of backend records: normalization, filtering,
//! pagination, permission gating and summary counters. Nothing here
//! performs I/O.

pub mod filter;
pub mod gate;
pub mod normalize;
pub mod paginate;
pub mod stats;

pub use filter::{Facet, RecordFilter, TicketFilter, TicketTab, UserFilter, filter_records};
pub use gate::{ActionSet, Capability, RolePolicy, TicketAction, compute_actions};
pub use normalize::{
    TicketView, UserView, normalize_ticket, normalize_tickets, normalize_user, normalize_users,
};
pub use paginate::{ListState, Page, paginate, total_pages};
pub use stats::{TicketStats, UserStats};
