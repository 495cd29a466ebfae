use super::{Change, Changeset};
use crate::config::messages;
use crate::options::Options;
use crate::value::{Cardinality, FieldType};
use sea_query::Value;

impl Changeset {
    /// Store a change, bypassing the allow-list and baseline comparison.
    pub fn put_change(&mut self, field: &str, value: impl Into<Value>) {
        self.put_change_with(field, value, Options::new());
    }

    pub fn put_change_with(&mut self, field: &str, value: impl Into<Value>, opts: Options) {
        match self.typed(field, value.into()) {
            Some(value) => {
                self.changes.insert(field.to_string(), Change::Value(value));
            }
            None => self.invalid(field, &opts, &messages().put_change),
        }
    }

    /// Store a change only if the input did not supply the field, nothing
    /// is pending for it and the record holds the zero value.
    ///
    /// Without params, an explicit zero on the record is indistinguishable
    /// from an unset field.
    pub fn put_default(&mut self, field: &str, value: impl Into<Value>) {
        self.put_default_with(field, value, Options::new());
    }

    pub fn put_default_with(&mut self, field: &str, value: impl Into<Value>, opts: Options) {
        let Some(value) = self.typed(field, value.into()) else {
            self.invalid(field, &opts, &messages().put_default);
            return;
        };

        let supplied = self.params.as_ref().is_some_and(|params| params.exists(field));
        if supplied || self.changes.contains_key(field) {
            return;
        }

        let zero = match (self.values.get(field), self.types.get(field)) {
            (Some(baseline), Some(ty)) => ty.is_zero(baseline),
            _ => true,
        };
        if zero {
            self.changes.insert(field.to_string(), Change::Value(value));
        }
    }

    /// Store nested changeset(s) for an association as-is.
    ///
    /// The change's shape must match the association: one changeset for a
    /// one-to-one field, a list for a one-to-many field.
    pub fn put_assoc(&mut self, field: &str, change: impl Into<Change>) {
        self.put_assoc_with(field, change, Options::new());
    }

    pub fn put_assoc_with(&mut self, field: &str, change: impl Into<Change>, opts: Options) {
        let change = change.into();
        let fits = matches!(
            (self.types.get(field).and_then(FieldType::cardinality), &change),
            (Some(Cardinality::One), Change::One(_)) | (Some(Cardinality::Many), Change::Many(_))
        );

        if fits {
            self.changes.insert(field.to_string(), change);
        } else {
            self.invalid(field, &opts, &messages().put_assoc);
        }
    }

    /// The value converted to the field's declared scalar type.
    fn typed(&self, field: &str, value: Value) -> Option<Value> {
        self.types
            .get(field)
            .filter(|ty| ty.is_persistable())
            .and_then(|ty| ty.convert(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Params;
    use serde_json::json;

    fn changeset() -> Changeset {
        let mut changeset = Changeset::new();
        changeset.types.insert("field1".to_string(), FieldType::Int);
        changeset.types.insert("field2".to_string(), FieldType::String);
        changeset.types.insert("address".to_string(), FieldType::Assoc(Cardinality::One));
        changeset.types.insert("transactions".to_string(), FieldType::Assoc(Cardinality::Many));
        changeset
    }

    #[test]
    fn test_put_change() {
        let mut changeset = changeset();
        changeset.put_change("field1", 10);

        assert!(changeset.errors().is_none());
        assert_eq!(changeset.get("field1"), Some(&Change::Value(Value::Int(Some(10)))));
    }

    #[test]
    fn test_put_change_converts_integer_width() {
        let mut changeset = changeset();
        changeset.put_change("field1", 10i64);
        assert_eq!(changeset.get("field1"), Some(&Change::Value(Value::Int(Some(10)))));
    }

    #[test]
    fn test_put_change_null() {
        let mut changeset = changeset();
        changeset.put_change("field2", Value::Int(None));
        assert_eq!(changeset.get("field2"), Some(&Change::Value(Value::String(None))));
    }

    #[test]
    fn test_put_change_invalid() {
        let mut changeset = changeset();
        changeset.put_change("field1", "10");
        changeset.put_change("unknown", 10);

        let errors = changeset.errors().unwrap();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].message, "field1 is invalid");
        assert_eq!(errors[1].field, "unknown");
        assert!(changeset.get("field1").is_none());
    }

    #[test]
    fn test_put_change_custom_message() {
        let mut changeset = changeset();
        changeset.put_change_with("field1", true, Options::new().message("{field} must be a number"));
        assert_eq!(changeset.error().unwrap().message, "field1 must be a number");
    }

    #[test]
    fn test_put_default_on_zero_baseline() {
        let mut changeset = changeset();
        changeset.values.insert("field1".to_string(), Value::Int(Some(0)));
        changeset.put_default("field1", 5);
        changeset.put_default("field2", "guest");

        assert_eq!(changeset.get("field1"), Some(&Change::Value(Value::Int(Some(5)))));
        assert_eq!(
            changeset.get("field2"),
            Some(&Change::Value(Value::String(Some("guest".to_string()))))
        );
    }

    #[test]
    fn test_put_default_is_noop_when_supplied() {
        let mut changeset = changeset();
        changeset.params = Some(Params::try_from(json!({"field1": 0})).unwrap());
        changeset.put_default("field1", 5);
        assert!(changeset.get("field1").is_none());

        changeset.values.insert("field2".to_string(), Value::String(Some("admin".to_string())));
        changeset.put_default("field2", "guest");
        assert!(changeset.get("field2").is_none());

        changeset.put_change("field2", "owner");
        changeset.put_default("field2", "guest");
        assert_eq!(
            changeset.fetch("field2"),
            Some(&Value::String(Some("owner".to_string())))
        );
        assert!(changeset.errors().is_none());
    }

    #[test]
    fn test_put_default_type_mismatch() {
        let mut changeset = changeset();
        changeset.put_default("field1", "five");
        assert_eq!(changeset.error().unwrap().field, "field1");
    }

    #[test]
    fn test_put_assoc() {
        let mut changeset = changeset();
        let mut address = Changeset::new();
        address.types.insert("street".to_string(), FieldType::String);
        address.put_change("street", "Grove Street");

        changeset.put_assoc("address", address.clone());
        changeset.put_assoc("transactions", vec![Changeset::new(), Changeset::new()]);

        assert!(changeset.errors().is_none());
        assert_eq!(changeset.get("address"), Some(&Change::One(Box::new(address))));
        assert!(matches!(changeset.get("transactions"), Some(Change::Many(items)) if items.len() == 2));
    }

    #[test]
    fn test_put_assoc_cardinality_mismatch() {
        let mut changeset = changeset();
        changeset.put_assoc("address", vec![Changeset::new()]);
        changeset.put_assoc("transactions", Changeset::new());
        changeset.put_assoc("field1", Changeset::new());

        assert_eq!(changeset.errors().map(<[_]>::len), Some(3));
        assert!(changeset.changes().is_empty());
    }
}
