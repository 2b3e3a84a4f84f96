//! Response envelopes shared by the resource endpoints
//!
//! Most endpoints answer `{ success, data }`, a few answer with the bare
//! object. Mutations answer with a loosely shaped acknowledgement.

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Either `{ "success": .., "data": T }` or a bare `T`
///
/// A body carrying `data` is read as the wrapped form first. When neither
/// form fits, the error from `data` is reported so the offending field is
/// named.
#[derive(Debug, Clone)]
pub enum Envelope<T> {
    Wrapped { success: Option<bool>, data: T },
    Bare(T),
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Envelope<T> {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = JsonValue::deserialize(deserializer)?;
        let Some(data) = value.get("data") else {
            return T::deserialize(&value).map(Envelope::Bare).map_err(de::Error::custom);
        };

        match T::deserialize(data) {
            Ok(data) => Ok(Envelope::Wrapped {
                success: value.get("success").and_then(JsonValue::as_bool),
                data,
            }),
            Err(wrapped) => T::deserialize(&value)
                .map(Envelope::Bare)
                .map_err(|_| de::Error::custom(format_args!("data: {}", wrapped))),
        }
    }
}

impl<T> Envelope<T> {
    pub fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data, .. } => data,
            Envelope::Bare(data) => data,
        }
    }
}

/// Acknowledgement returned by create, update and delete calls
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Mutation {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<JsonValue>,
}

impl Mutation {
    /// Id of the record the server created or touched, when it says so
    ///
    /// Looks at `data.id` first, then one level deeper (`data.child.id`,
    /// `data.record.id`, ...).
    pub fn record_id(&self) -> Option<String> {
        let data = self.data.as_ref()?;
        if let Some(id) = id_of(data) {
            return Some(id);
        }
        data.as_object()?.values().find_map(id_of)
    }
}

fn id_of(value: &JsonValue) -> Option<String> {
    match value.get("id")? {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: String,
    }

    #[test]
    fn test_envelope_accepts_both_shapes() {
        let wrapped: Envelope<Item> =
            serde_json::from_str(r#"{"success":true,"data":{"id":"a"}}"#).unwrap();
        assert_eq!(wrapped.into_inner(), Item { id: "a".into() });

        let bare: Envelope<Item> = serde_json::from_str(r#"{"id":"b"}"#).unwrap();
        assert_eq!(bare.into_inner(), Item { id: "b".into() });
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Payload {
        id: String,
        data: u32,
    }

    #[test]
    fn test_envelope_bare_object_with_data_field() {
        let bare: Envelope<Payload> = serde_json::from_str(r#"{"id":"p","data":7}"#).unwrap();
        assert!(matches!(bare, Envelope::Bare(_)));
        assert_eq!(bare.into_inner(), Payload { id: "p".into(), data: 7 });
    }

    #[test]
    fn test_envelope_error_names_the_field() {
        let err = serde_json::from_str::<Envelope<Item>>(r#"{"success":true,"data":{"name":"x"}}"#)
            .unwrap_err()
            .to_string();
        assert!(err.contains("data: missing field `id`"), "{}", err);

        let err = serde_json::from_str::<Envelope<Item>>(r#"{"id":12}"#)
            .unwrap_err()
            .to_string();
        assert!(err.contains("invalid type"), "{}", err);
    }

    #[test]
    fn test_mutation_record_id() {
        let m: Mutation =
            serde_json::from_str(r#"{"success":true,"data":{"id":"c-1"}}"#).unwrap();
        assert_eq!(m.record_id(), Some("c-1".to_string()));

        let nested: Mutation =
            serde_json::from_str(r#"{"data":{"child":{"id":42}}}"#).unwrap();
        assert_eq!(nested.record_id(), Some("42".to_string()));

        let empty: Mutation = serde_json::from_str(r#"{"message":"Deleted"}"#).unwrap();
        assert_eq!(empty.record_id(), None);
    }
}
