use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The backend's user record, kept opaque.
///
/// Only a handful of fields are ever read on the client; everything else is
/// carried through untouched so it round-trips through the session blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct User(pub Value);

impl User {
    /// Returns the user's id whether the backend sent `id`, `Id` or `_id`,
    /// as a string or a number.
    pub fn id(&self) -> Option<String> {
        ["id", "Id", "_id"]
            .iter()
            .filter_map(|key| self.0.get(*key))
            .find_map(|v| match v {
                Value::String(s) if !s.is_empty() => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
    }

    pub fn email(&self) -> Option<&str> {
        self.str_field("email")
    }

    /// `full_name` if present, otherwise `firstName lastName`.
    pub fn display_name(&self) -> Option<String> {
        if let Some(full) = self.str_field("full_name") {
            return Some(full.to_string());
        }
        let parts: Vec<&str> = [self.str_field("firstName"), self.str_field("lastName")]
            .into_iter()
            .flatten()
            .collect();
        (!parts.is_empty()).then(|| parts.join(" "))
    }

    /// A record counts as an identity only if it is a non-empty object.
    pub fn is_present(&self) -> bool {
        self.0.as_object().is_some_and(|o| !o.is_empty())
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
    }
}
