//! Data models
//!
//! Raw records as the backend sends them. Every field is optional because
//! the backend omits relations it did not eager-load and sometimes sends
//! scalars with a different JSON type than documented. Identifiers arrive
//! as either numbers or strings and are wrapped in [`RecordId`].

pub mod category;
pub mod department;
pub mod id;
pub mod location;
pub mod relation;
pub mod role;
pub mod ticket;
pub mod ticket_update;
pub mod user;

mod lenient;

// Re-exports
pub use category::*;
pub use department::*;
pub use id::*;
pub use location::*;
pub use relation::*;
pub use role::*;
pub use ticket::*;
pub use ticket_update::*;
pub use user::*;
