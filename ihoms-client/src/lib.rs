//! IHOMS Client - helpdesk client for the IHOMS REST backend
//!
//! Talks to the backend over HTTP (or in memory, with `in-process`) and
//! projects its records into view state: normalized records, filtered and
//! paginated lists, and the actions the current viewer may take on each.

pub mod api;
pub mod client;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod forms;
pub mod loader;
pub mod routes;
pub mod session;
pub mod time;
pub mod view;

pub use api::IhomsApi;
pub use client::{HttpClient, NetworkHttpClient};
#[cfg(feature = "in-process")]
pub use client::OneshotHttpClient;
pub use config::ClientConfig;
pub use dispatcher::{ActionDispatcher, ActionKind, ActionResult, Notice, TicketBoard};
pub use error::{ClientError, ClientResult, ErrorKind};
pub use loader::LoaderOutcome;
pub use routes::Route;
pub use session::{Session, SessionError, SessionStore, Viewer};
pub use view::{
    ActionSet, Capability, Facet, ListState, Page, RolePolicy, TicketAction, TicketFilter,
    TicketStats, TicketTab, TicketView, UserFilter, UserStats, UserView,
};

// Re-export shared types for convenience
pub use shared::client::{LoginRequest, LoginResponse, MeResponse};
pub use shared::models::{RecordId, TicketPriority, TicketStatus, UserStatus};
