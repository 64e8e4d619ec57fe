//! Lenient field decoding
//!
//! Text fields such as `contact_number` come back as JSON numbers for some
//! rows, ids arrive as strings, integers or floats, and a relation may be a
//! flat name instead of an object. Every helper here accepts any JSON value
//! and maps shapes it cannot use to `None`, so one odd row never fails the
//! list it arrives in.

use super::{NamedRef, RecordId, RoleRef};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Number, Value};

pub(crate) fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        // Arrays and objects have no sensible text form
        Some(_) => None,
    })
}

pub(crate) fn opt_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(b)) => Some(b),
        Some(Value::Number(n)) => n.as_i64().map(|n| n != 0),
        Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => Some(true),
            "0" | "false" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    })
}

fn number_id(n: &Number) -> Option<RecordId> {
    if let Some(i) = n.as_i64() {
        return Some(RecordId::Int(i));
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Some(RecordId::Int(f as i64)),
        Some(_) => Some(RecordId::Text(n.to_string())),
        None => None,
    }
}

fn id_from_value(value: Value) -> Option<RecordId> {
    match value {
        Value::Number(n) => number_id(&n),
        Value::String(s) if !s.trim().is_empty() => Some(RecordId::Text(s)),
        _ => None,
    }
}

pub(crate) fn opt_id<'de, D>(deserializer: D) -> Result<Option<RecordId>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(id_from_value))
}

/// Relation object, or a bare name or id standing in for one
pub(crate) fn opt_named<'de, D>(deserializer: D) -> Result<Option<NamedRef>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(name)) if !name.trim().is_empty() => Some(NamedRef::named(name)),
        Some(Value::Number(n)) => number_id(&n).map(|id| NamedRef {
            id: Some(id),
            name: None,
        }),
        Some(object @ Value::Object(_)) => serde_json::from_value(object).ok(),
        _ => None,
    })
}

/// Role object or role name
pub(crate) fn opt_role<'de, D>(deserializer: D) -> Result<Option<RoleRef>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(name)) if !name.trim().is_empty() => Some(RoleRef::Name(name)),
        Some(Value::Number(n)) => number_id(&n).map(|id| {
            RoleRef::Object(NamedRef {
                id: Some(id),
                name: None,
            })
        }),
        Some(object @ Value::Object(_)) => serde_json::from_value(object).ok().map(RoleRef::Object),
        _ => None,
    })
}

/// Embedded object; anything that is not an object is dropped
pub(crate) fn opt_object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(object @ Value::Object(_)) => serde_json::from_value(object).ok(),
        _ => None,
    })
}

/// Array of objects. `null` and non-arrays are empty; unusable entries are skipped.
pub(crate) fn vec_lenient<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Fields {
        #[serde(default, deserialize_with = "super::opt_string")]
        text: Option<String>,
        #[serde(default, deserialize_with = "super::opt_bool")]
        flag: Option<bool>,
        #[serde(default, deserialize_with = "super::opt_id")]
        id: Option<RecordId>,
        #[serde(default, deserialize_with = "super::opt_named")]
        category: Option<NamedRef>,
        #[serde(default, deserialize_with = "super::opt_role")]
        role: Option<RoleRef>,
        #[serde(default, deserialize_with = "super::vec_lenient")]
        tags: Vec<NamedRef>,
    }

    fn fields(json: &str) -> Fields {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_numbers_become_text() {
        let f = fields(r#"{"text": 5551234, "flag": 1}"#);
        assert_eq!(f.text.as_deref(), Some("5551234"));
        assert_eq!(f.flag, Some(true));
    }

    #[test]
    fn test_missing_and_null_are_none() {
        let f = fields(r#"{"text": null, "id": null, "category": null, "tags": null}"#);
        assert!(f.text.is_none());
        assert!(f.flag.is_none());
        assert!(f.id.is_none());
        assert!(f.category.is_none());
        assert!(f.tags.is_empty());
    }

    #[test]
    fn test_id_shapes() {
        assert_eq!(fields(r#"{"id": 7}"#).id, Some(RecordId::Int(7)));
        assert_eq!(fields(r#"{"id": 7.0}"#).id, Some(RecordId::Int(7)));
        assert_eq!(fields(r#"{"id": 2.5}"#).id, Some(RecordId::Text("2.5".into())));
        assert_eq!(fields(r#"{"id": "007"}"#).id, Some(RecordId::Text("007".into())));
        assert!(fields(r#"{"id": ""}"#).id.is_none());
        assert!(fields(r#"{"id": {"nested": 1}}"#).id.is_none());
        assert!(fields(r#"{"id": true}"#).id.is_none());
    }

    #[test]
    fn test_relation_shapes() {
        let flat = fields(r#"{"category": "Printer"}"#).category.unwrap();
        assert_eq!(flat.name.as_deref(), Some("Printer"));

        let by_id = fields(r#"{"category": 4}"#).category.unwrap();
        assert_eq!(by_id.id, Some(RecordId::Int(4)));

        let object = fields(r#"{"category": {"id": "4", "name": "Network"}}"#).category.unwrap();
        assert_eq!(object.name.as_deref(), Some("Network"));

        assert!(fields(r#"{"category": [1, 2]}"#).category.is_none());
        assert!(fields(r#"{"category": false}"#).category.is_none());
    }

    #[test]
    fn test_role_shapes() {
        assert_eq!(fields(r#"{"role": "admin"}"#).role.unwrap().name(), Some("admin"));
        assert_eq!(fields(r#"{"role": 3}"#).role.unwrap().id(), Some(&RecordId::Int(3)));
        let object = fields(r#"{"role": {"id": 2, "name": "Agent"}}"#).role.unwrap();
        assert_eq!(object.name(), Some("Agent"));
        assert!(fields(r#"{"role": []}"#).role.is_none());
    }

    #[test]
    fn test_arrays_skip_unusable_entries() {
        let f = fields(r#"{"tags": [{"id": 1, "name": "a"}, "junk", 5, {"name": "b"}]}"#);
        let names: Vec<_> = f.tags.iter().filter_map(|t| t.name.as_deref()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(fields(r#"{"tags": "none"}"#).tags.is_empty());
    }
}
