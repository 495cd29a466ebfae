//! Records that describe their fields at runtime

use castguard::{
    cast, infer_fields, is_cached, CustomSchema, Document, FieldDescriptor, FieldType,
    FieldValue, Mutation, Params, Schema, Value, ValueType,
};
use chrono::{DateTime, Utc};
use serde_json::json;
use std::collections::BTreeMap;

#[derive(Default)]
struct Listing {
    uuid: String,
    price: i32,
    created_at: DateTime<Utc>,
}

impl CustomSchema for Listing {
    fn fields(&self) -> BTreeMap<String, usize> {
        BTreeMap::from([
            ("_uuid".to_string(), 0),
            ("_price".to_string(), 1),
            ("created_at".to_string(), 2),
        ])
    }

    fn types(&self) -> Vec<FieldType> {
        vec![FieldType::String, FieldType::Int, FieldType::Timestamp]
    }

    fn values(&self) -> Vec<FieldValue<'_>> {
        vec![
            FieldValue::Scalar(Value::String(Some(self.uuid.clone()))),
            FieldValue::Scalar(Value::Int(Some(self.price))),
            FieldValue::Scalar(self.created_at.into_value()),
        ]
    }
}

impl Schema for Listing {
    fn describe() -> Vec<FieldDescriptor> {
        Vec::new()
    }

    fn write_field(&mut self, position: usize, value: &Value) -> bool {
        match position {
            0 => String::from_value(value.clone()).map(|v| self.uuid = v).is_some(),
            1 => i32::from_value(value.clone()).map(|v| self.price = v).is_some(),
            2 => DateTime::<Utc>::from_value(value.clone())
                .map(|v| self.created_at = v)
                .is_some(),
            _ => false,
        }
    }

    fn custom_schema(&self) -> Option<&dyn CustomSchema> {
        Some(self)
    }
}

#[test]
fn test_cast_custom_schema() {
    let listing = Listing {
        uuid: "3top4".to_string(),
        price: 100,
        ..Listing::default()
    };
    let params = Params::try_from(json!({"_uuid": "3top4", "_price": "120"})).expect("params object");

    let changeset = cast(&listing, &params, &["_uuid", "_price"]);

    assert!(changeset.error().is_none());
    assert!(changeset.get("_uuid").is_none());
    assert_eq!(changeset.fetch("_uuid"), Some(&Value::String(Some("3top4".to_string()))));
    assert_eq!(
        changeset.get("_price").and_then(|c| c.as_value()),
        Some(&Value::Int(Some(120)))
    );
}

#[test]
fn test_custom_schema_document_values() {
    let listing = Listing {
        uuid: "3top4".to_string(),
        price: 100,
        ..Listing::default()
    };

    assert_eq!(listing.value("_uuid"), Some(Value::String(Some("3top4".to_string()))));
    assert_eq!(listing.value("_price"), Some(Value::Int(Some(100))));
    assert_eq!(listing.value("created_at"), Some(Value::from(DateTime::<Utc>::default())));
    assert_eq!(listing.value("missing"), None);
}

#[test]
fn test_apply_custom_schema_stamps_created_at() {
    let mut listing = Listing::default();
    let params = Params::try_from(json!({"_uuid": "5bdf1", "_price": 80})).expect("params object");

    let changeset = cast(&listing, &params, &["_uuid", "_price"]);
    let mutation = Mutation::from_changeset(&mut listing, changeset);

    let fields: Vec<_> = mutation.sets.keys().map(String::as_str).collect();
    assert_eq!(fields, ["_price", "_uuid", "created_at"]);
    assert_eq!(listing.uuid, "5bdf1");
    assert_eq!(listing.price, 80);
    assert_ne!(listing.created_at, DateTime::<Utc>::default());
    assert_eq!(mutation.sets["created_at"], Value::from(listing.created_at));
}

#[test]
fn test_custom_schema_is_not_cached() {
    let listing = Listing::default();

    assert_eq!(infer_fields(&listing).len(), 3);
    assert!(!is_cached::<Listing>());
}
