//! Client error types

use http::StatusCode;
use shared::ErrorBody;
use std::collections::BTreeMap;
use thiserror::Error;

pub const MSG_VALIDATION: &str = "Please check your input and try again.";
pub const MSG_SESSION_EXPIRED: &str = "Your session has expired. Please log in again.";
pub const MSG_FORBIDDEN: &str = "You are not permitted to perform this action.";
pub const MSG_SERVER: &str = "Server error occurred. Please try again later.";
pub const MSG_NETWORK: &str = "Network error. Please check your connection and try again.";
pub const MSG_UNEXPECTED: &str = "An unexpected error occurred. Please try again.";

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed before a response arrived
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Authentication required (401)
    #[error("Authentication required")]
    Unauthorized,

    /// Permission denied (403)
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Record changed concurrently (409)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Field-level validation failure (422)
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        errors: BTreeMap<String, Vec<String>>,
    },

    /// Backend failure (5xx)
    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    /// Any other non-2xx response
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Error taxonomy the view layer branches on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// User-correctable, field-scoped
    Validation,
    /// Session missing or expired
    Unauthorized,
    /// Authenticated but not allowed
    Forbidden,
    /// Concurrent state change
    Conflict,
    /// Transport failure
    Network,
    /// 5xx
    Server,
    Unknown,
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Http(_) => ErrorKind::Network,
            Self::Unauthorized => ErrorKind::Unauthorized,
            Self::Forbidden(_) => ErrorKind::Forbidden,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Server { .. } => ErrorKind::Server,
            Self::InvalidResponse(_)
            | Self::NotFound(_)
            | Self::Api { .. }
            | Self::Internal(_)
            | Self::Serialization(_) => ErrorKind::Unknown,
        }
    }

    /// Message the backend attached to the error response, if any
    pub fn server_message(&self) -> Option<&str> {
        let message = match self {
            Self::Forbidden(m) | Self::NotFound(m) | Self::Conflict(m) => m,
            Self::Validation { message, .. }
            | Self::Server { message, .. }
            | Self::Api { message, .. } => message,
            _ => return None,
        };
        (!message.trim().is_empty()).then_some(message.as_str())
    }

    /// Field errors of a 422 response
    pub fn field_errors(&self) -> Option<&BTreeMap<String, Vec<String>>> {
        match self {
            Self::Validation { errors, .. } => Some(errors),
            _ => None,
        }
    }

    /// Text shown to the user.
    ///
    /// Validation, session, server and network failures have fixed texts.
    /// Anything else shows the backend's message, else `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self.kind() {
            ErrorKind::Validation => MSG_VALIDATION.to_string(),
            ErrorKind::Unauthorized => MSG_SESSION_EXPIRED.to_string(),
            ErrorKind::Server => MSG_SERVER.to_string(),
            ErrorKind::Network => MSG_NETWORK.to_string(),
            ErrorKind::Forbidden | ErrorKind::Conflict | ErrorKind::Unknown => self
                .server_message()
                .map(str::to_string)
                .unwrap_or_else(|| fallback.to_string()),
        }
    }
}

/// Map a non-2xx response to an error.
///
/// The body is parsed as the backend's `{ message, errors }` shape when
/// possible; otherwise the raw text becomes the message.
pub(crate) fn error_from_status(status: StatusCode, body: &[u8]) -> ClientError {
    let parsed = serde_json::from_slice::<ErrorBody>(body).unwrap_or_default();
    let message = parsed
        .message
        .clone()
        .unwrap_or_else(|| String::from_utf8_lossy(body).trim().to_string());

    match status {
        StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
        StatusCode::FORBIDDEN => ClientError::Forbidden(message),
        StatusCode::NOT_FOUND => ClientError::NotFound(message),
        StatusCode::CONFLICT => ClientError::Conflict(message),
        StatusCode::UNPROCESSABLE_ENTITY => ClientError::Validation {
            message,
            errors: parsed.field_errors(),
        },
        s if s.is_server_error() => ClientError::Server {
            status: s.as_u16(),
            message,
        },
        s => ClientError::Api {
            status: s.as_u16(),
            message,
        },
    }
}
