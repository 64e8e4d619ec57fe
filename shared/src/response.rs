//! API Response types
//!
//! The helpdesk backend is not consistent about envelopes. Depending on the
//! endpoint a list arrives as a bare array, as `{ "data": [...] }`, as
//! `{ "success": true, "data": [...] }` or as `{ "tickets": [...] }`, and a
//! single record arrives either bare or wrapped in `{ "data": {...} }`.
//! The types here absorb all of those shapes so callers only ever see the
//! payload.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A list payload in any of the shapes the backend uses.
///
/// Rows that do not decode as `T` are skipped rather than failing the
/// whole list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged, bound(deserialize = "T: DeserializeOwned"))]
pub enum ListPayload<T> {
    /// `[ ... ]`
    Bare(#[serde(deserialize_with = "rows")] Vec<T>),
    /// `{ "success": .., "data": [ ... ] }`, `{ "data": [ ... ] }` or `{ "tickets": [ ... ] }`
    Wrapped {
        #[serde(default)]
        success: Option<bool>,
        #[serde(default, deserialize_with = "opt_rows")]
        data: Option<Vec<T>>,
        #[serde(default, deserialize_with = "opt_rows")]
        tickets: Option<Vec<T>>,
    },
}

fn decode_rows<T: DeserializeOwned>(rows: Vec<Value>) -> Vec<T> {
    rows.into_iter()
        .filter_map(|row| serde_json::from_value(row).ok())
        .collect()
}

fn rows<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Vec::<Value>::deserialize(deserializer).map(decode_rows)
}

fn opt_rows<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(rows)) => Some(decode_rows(rows)),
        _ => None,
    })
}

impl<T> ListPayload<T> {
    /// Unwrap into the item list.
    ///
    /// An explicit `"success": false` yields an empty list, as does an
    /// envelope with neither `data` nor `tickets`.
    pub fn into_items(self) -> Vec<T> {
        match self {
            Self::Bare(items) => items,
            Self::Wrapped {
                success: Some(false),
                ..
            } => Vec::new(),
            Self::Wrapped { data, tickets, .. } => data.or(tickets).unwrap_or_default(),
        }
    }
}

/// A single record, bare or wrapped in `{ "data": ... }`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RecordPayload<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> RecordPayload<T> {
    pub fn into_record(self) -> T {
        match self {
            Self::Wrapped { data } => data,
            Self::Bare(record) => record,
        }
    }
}

/// Messages attached to one form field in a 422 response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldMessages {
    Many(Vec<String>),
    One(String),
}

impl FieldMessages {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::Many(messages) => messages,
            Self::One(message) => vec![message],
        }
    }
}

/// Error body returned on non-2xx responses
///
/// ```json
/// {
///     "message": "The given data was invalid.",
///     "errors": { "title": ["The title field is required."] }
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Option<BTreeMap<String, FieldMessages>>,
}

impl ErrorBody {
    /// Field errors flattened to `field -> messages`
    pub fn field_errors(self) -> BTreeMap<String, Vec<String>> {
        self.errors
            .unwrap_or_default()
            .into_iter()
            .map(|(field, messages)| (field, messages.into_vec()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_payload_shapes() {
        let bare: ListPayload<i32> = serde_json::from_str("[1, 2, 3]").unwrap();
        assert_eq!(bare.into_items(), vec![1, 2, 3]);

        let data: ListPayload<i32> = serde_json::from_str(r#"{"data": [4]}"#).unwrap();
        assert_eq!(data.into_items(), vec![4]);

        let success: ListPayload<i32> =
            serde_json::from_str(r#"{"success": true, "data": [5, 6]}"#).unwrap();
        assert_eq!(success.into_items(), vec![5, 6]);

        let tickets: ListPayload<i32> = serde_json::from_str(r#"{"tickets": [7]}"#).unwrap();
        assert_eq!(tickets.into_items(), vec![7]);
    }

    #[test]
    fn test_list_payload_failure_is_empty() {
        let failed: ListPayload<i32> =
            serde_json::from_str(r#"{"success": false, "data": [1]}"#).unwrap();
        assert!(failed.into_items().is_empty());

        let nothing: ListPayload<i32> = serde_json::from_str(r#"{"message": "ok"}"#).unwrap();
        assert!(nothing.into_items().is_empty());
    }

    #[test]
    fn test_list_payload_skips_rows_it_cannot_decode() {
        let mixed: ListPayload<i32> = serde_json::from_str(r#"[1, "two", null, 3]"#).unwrap();
        assert_eq!(mixed.into_items(), vec![1, 3]);

        let wrapped: ListPayload<i32> =
            serde_json::from_str(r#"{"success": true, "data": [4, {"x": 1}, 5]}"#).unwrap();
        assert_eq!(wrapped.into_items(), vec![4, 5]);

        let not_a_list: ListPayload<i32> = serde_json::from_str(r#"{"data": {"id": 1}}"#).unwrap();
        assert!(not_a_list.into_items().is_empty());
    }

    #[test]
    fn test_record_payload_unwraps_data() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Item {
            id: i64,
        }

        let wrapped: RecordPayload<Item> = serde_json::from_str(r#"{"data": {"id": 7}}"#).unwrap();
        assert_eq!(wrapped.into_record(), Item { id: 7 });

        let bare: RecordPayload<Item> = serde_json::from_str(r#"{"id": 8}"#).unwrap();
        assert_eq!(bare.into_record(), Item { id: 8 });
    }

    #[test]
    fn test_error_body_field_errors() {
        let body: ErrorBody = serde_json::from_str(
            r#"{"message": "invalid", "errors": {"title": ["required"], "priority": "bad"}}"#,
        )
        .unwrap();
        let fields = body.field_errors();
        assert_eq!(fields["title"], vec!["required".to_string()]);
        assert_eq!(fields["priority"], vec!["bad".to_string()]);
    }
}
