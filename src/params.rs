//! Raw changeset input.
//!
//! `Params` is a JSON object of untyped input values. Decoding the wire
//! format is the caller's concern; anything that deserializes into a JSON
//! object can be cast.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// Raw input keyed by field name
///
/// # Example
///
/// ```
/// use castguard::Params;
/// use serde_json::json;
///
/// let params = Params::try_from(json!({"name": "Luffy", "address": {"street": "Grove"}})).unwrap();
/// assert!(params.exists("name"));
/// assert!(params.get_params("address").is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params(Map<String, JsonValue>);

impl Params {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the input carries the field, null included.
    #[must_use]
    pub fn exists(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&JsonValue> {
        self.0.get(field)
    }

    /// Nested object input for a one-to-one association.
    #[must_use]
    pub fn get_params(&self, field: &str) -> Option<Params> {
        match self.0.get(field)? {
            JsonValue::Object(map) => Some(Params(map.clone())),
            _ => None,
        }
    }

    /// Nested array-of-objects input for a one-to-many association.
    ///
    /// Returns `None` when the value is not an array or any element is not an object.
    #[must_use]
    pub fn get_params_slice(&self, field: &str) -> Option<Vec<Params>> {
        match self.0.get(field)? {
            JsonValue::Array(items) => items
                .iter()
                .map(|item| match item {
                    JsonValue::Object(map) => Some(Params(map.clone())),
                    _ => None,
                })
                .collect(),
            _ => None,
        }
    }

    pub fn insert(&mut self, field: impl Into<String>, value: JsonValue) -> Option<JsonValue> {
        self.0.insert(field.into(), value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, JsonValue>> for Params {
    fn from(map: Map<String, JsonValue>) -> Self {
        Params(map)
    }
}

impl TryFrom<JsonValue> for Params {
    /// Non-object input is handed back unchanged.
    type Error = JsonValue;

    fn try_from(value: JsonValue) -> Result<Self, Self::Error> {
        match value {
            JsonValue::Object(map) => Ok(Params(map)),
            other => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_exists_includes_null() {
        let params = Params::try_from(json!({"a": null, "b": 1})).unwrap();
        assert!(params.exists("a"));
        assert!(params.exists("b"));
        assert!(!params.exists("c"));
        assert_eq!(params.get("b"), Some(&json!(1)));
    }

    #[test]
    fn test_nested_params() {
        let params = Params::try_from(json!({
            "address": {"street": "Grove Street"},
            "transactions": [{"item": "Sword"}, {"item": "Shield"}],
            "tags": ["a", "b"],
        }))
        .unwrap();

        let address = params.get_params("address").unwrap();
        assert_eq!(address.get("street"), Some(&json!("Grove Street")));
        assert!(params.get_params("transactions").is_none());

        let transactions = params.get_params_slice("transactions").unwrap();
        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[1].get("item"), Some(&json!("Shield")));
        assert!(params.get_params_slice("tags").is_none());
    }

    #[test]
    fn test_try_from_rejects_non_objects() {
        assert_eq!(Params::try_from(json!([1, 2])), Err(json!([1, 2])));
    }

    #[test]
    fn test_deserialize_transparent() {
        let params: Params = serde_json::from_str(r#"{"name": "Luffy"}"#).unwrap();
        assert_eq!(params.len(), 1);
    }
}
