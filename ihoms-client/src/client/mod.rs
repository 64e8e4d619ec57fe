//! Transport layer
//!
//! [`HttpClient`] is the seam between the typed API and the wire. The
//! network implementation uses reqwest; the in-process one drives an axum
//! `Router` directly and is what the integration tests run against.

pub mod http;
#[cfg(feature = "in-process")]
pub mod http_oneshot;

pub use http::{HttpClient, NetworkHttpClient};
#[cfg(feature = "in-process")]
pub use http_oneshot::OneshotHttpClient;
