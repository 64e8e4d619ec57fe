//! Shared types for the IHOMS helpdesk
//!
//! Wire-level types exchanged with the helpdesk REST backend: raw records,
//! request payloads and the response envelopes the backend wraps them in.
//! Nothing here interprets a record for display; that happens in
//! `ihoms-client`'s adapter layer.

pub mod client;
pub mod models;
pub mod response;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use models::RecordId;
pub use response::{ErrorBody, ListPayload, RecordPayload};
