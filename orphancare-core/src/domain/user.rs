//! User domain model

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// Represents an authenticated user
///
/// Only `id` and `email` are interpreted. Anything else the auth server
/// returns (role, metadata, timestamps) is carried in `extra` so that the
/// stored user record round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl User {
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            extra: Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_creation() {
        let user = User::new("user-123", "test@example.com");
        assert_eq!(user.id, "user-123");
        assert_eq!(user.email, "test@example.com");
        assert!(user.extra.is_empty());
    }

    #[test]
    fn test_user_keeps_unknown_fields() {
        let raw = r#"{"id":"u1","email":"a@b.cd","role":"authenticated","aud":"authenticated"}"#;
        let user: User = serde_json::from_str(raw).unwrap();
        assert_eq!(user.extra.get("role").and_then(|v| v.as_str()), Some("authenticated"));

        let back = serde_json::to_value(&user).unwrap();
        assert_eq!(back["aud"], "authenticated");
        assert_eq!(back["email"], "a@b.cd");
    }
}
