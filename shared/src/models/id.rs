//! Record identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier as sent by the backend, numeric or textual.
///
/// Equality between identifiers of different JSON types goes through
/// [`same_id`], never through the derived `PartialEq`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl RecordId {
    /// String form used for comparisons and URL paths
    pub fn key(&self) -> String {
        match self {
            Self::Int(n) => n.to_string(),
            Self::Text(s) => s.trim().to_string(),
        }
    }

    /// Numeric value, if the identifier is numeric in either representation
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Whether this identifier denotes the same record as `other`
    pub fn matches(&self, other: &str) -> bool {
        same_id(&self.key(), other)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

/// Canonical integer text (`"7"`, `"-3"`) becomes `Int`; anything else,
/// including zero-padded keys like `"007"`, stays `Text`.
impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        match value.parse::<i64>() {
            Ok(n) if n.to_string() == value => Self::Int(n),
            _ => Self::Text(value.to_string()),
        }
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

/// Compare two identifier keys.
///
/// `"42"`, `" 42 "` and `"042"` all denote record 42; non-numeric keys
/// compare as trimmed strings. Empty keys never match anything.
pub fn same_id(a: &str, b: &str) -> bool {
    let (a, b) = (a.trim(), b.trim());
    if a.is_empty() || b.is_empty() {
        return false;
    }
    match (a.parse::<i64>(), b.parse::<i64>()) {
        (Ok(x), Ok(y)) => x == y,
        _ => a == b,
    }
}
