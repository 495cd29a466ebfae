//! Cast, nested cast and apply over derived records

use crate::fixtures::{Address, Article, Transaction, User};
use castguard::{cast, Changeset, Mutation, Options, Params, Value};
use chrono::{DateTime, Utc};
use serde_json::json;

fn cast_transaction(transaction: &Transaction, params: &Params) -> Changeset {
    let mut changeset = cast(transaction, params, &["item", "status"]);
    changeset.validate_required(&["item"]);
    changeset
}

fn cast_address(address: &Address, params: &Params) -> Changeset {
    cast(address, params, &["street", "notes", "flagged"])
}

fn params(input: serde_json::Value) -> Params {
    Params::try_from(input).expect("params object")
}

#[test]
fn test_apply_nested_changeset() {
    let input = params(json!({
        "name": "Luffy",
        "age": 20,
        "transactions": [
            {"item": "Sword", "status": "pending"},
            {"item": "Shield", "status": "paid"}
        ],
        "address": {
            "street": "Grove Street",
            "notes": "Brown fox jumps",
            "flagged": true
        }
    }));

    let mut user = User::default();
    let mut changeset = cast(&user, &input, &["name", "age"]);
    changeset.cast_assoc("transactions", cast_transaction);
    changeset.cast_assoc("address", cast_address);
    assert!(changeset.error().is_none());

    let mutation = Mutation::from_changeset(&mut user, changeset);

    let fields: Vec<_> = mutation.sets.keys().map(String::as_str).collect();
    assert_eq!(fields, ["age", "created_at", "name", "updated_at"]);
    assert_eq!(mutation.sets["name"], Value::String(Some("Luffy".to_string())));
    assert_eq!(mutation.sets["age"], Value::Int(Some(20)));
    assert_eq!(mutation.sets["created_at"], Value::from(user.created_at));
    assert_eq!(mutation.sets["updated_at"], Value::from(user.updated_at));
    assert!(mutation.error_fn.is_none());

    let transactions = &mutation.assoc["transactions"];
    assert_eq!(transactions.len(), 2);
    assert_eq!(
        transactions[0].sets["item"],
        Value::String(Some("Sword".to_string()))
    );
    assert_eq!(
        transactions[1].sets["status"],
        Value::String(Some("paid".to_string()))
    );
    assert_eq!(mutation.assoc["address"].len(), 1);
    assert_eq!(
        mutation.assoc["address"][0].sets["flagged"],
        Value::Bool(Some(true))
    );

    assert_eq!(user.name, "Luffy");
    assert_eq!(user.age, 20);
    assert_ne!(user.created_at, DateTime::<Utc>::default());
    assert_eq!(user.created_at, user.updated_at);
    assert_eq!(
        user.transactions,
        vec![
            Transaction {
                item: "Sword".to_string(),
                status: "pending".to_string(),
                ..Transaction::default()
            },
            Transaction {
                item: "Shield".to_string(),
                status: "paid".to_string(),
                ..Transaction::default()
            },
        ]
    );
    assert_eq!(
        user.address,
        Address {
            street: "Grove Street".to_string(),
            notes: "Brown fox jumps".to_string(),
            flagged: Some(true),
            ..Address::default()
        }
    );
}

#[test]
fn test_apply_replaces_existing_children() {
    let mut user = User {
        id: 1,
        transactions: vec![
            Transaction {
                id: 10,
                item: "Map".to_string(),
                ..Transaction::default()
            },
            Transaction {
                id: 11,
                item: "Compass".to_string(),
                ..Transaction::default()
            },
        ],
        ..User::default()
    };
    let input = params(json!({"transactions": [{"item": "Log Pose"}]}));

    let mut changeset = cast(&user, &input, &[]);
    changeset.cast_assoc("transactions", cast_transaction);
    let mutation = Mutation::from_changeset(&mut user, changeset);

    assert_eq!(mutation.assoc["transactions"].len(), 1);
    assert_eq!(user.transactions.len(), 1);
    assert_eq!(user.transactions[0].item, "Log Pose");
    assert_eq!(user.transactions[0].id, 0);
}

#[test]
fn test_apply_keeps_existing_created_at() {
    let created_at = DateTime::<Utc>::from_timestamp(1_600_000_000, 0).expect("timestamp");
    let mut user = User {
        id: 1,
        name: "Zoro".to_string(),
        created_at,
        ..User::default()
    };

    let changeset = cast(&user, &params(json!({"name": "Zoro"})), &["name"]);
    assert!(changeset.changes().is_empty());

    let mutation = Mutation::from_changeset(&mut user, changeset);
    assert!(!mutation.sets.contains_key("created_at"));
    assert!(mutation.sets.contains_key("updated_at"));
    assert_eq!(user.created_at, created_at);
    assert!(user.updated_at > created_at);
}

#[test]
fn test_apply_skips_generated_primary_key() {
    let mut user = User {
        id: 5,
        ..User::default()
    };
    let changeset = cast(&user, &params(json!({"id": 9, "age": 30})), &["id", "age"]);
    assert!(changeset.get("id").is_some());

    let mutation = Mutation::from_changeset(&mut user, changeset);
    assert!(!mutation.sets.contains_key("id"));
    assert_eq!(user.id, 5);
    assert_eq!(user.age, 30);
}

#[test]
fn test_apply_client_supplied_primary_key() {
    let mut article = Article::default();
    let changeset = cast(
        &article,
        &params(json!({"slug": "grand-line", "title": "Grand Line"})),
        &["slug", "title"],
    );

    let mutation = Mutation::from_changeset(&mut article, changeset);
    assert_eq!(
        mutation.sets["slug"],
        Value::String(Some("grand-line".to_string()))
    );
    assert_eq!(article.slug, "grand-line");
}

#[test]
fn test_apply_without_cascade() {
    let mut user = User::default();
    let input = params(json!({"name": "Nami", "transactions": [{"item": "Clima-Tact"}]}));

    let mut changeset = cast(&user, &input, &["name"]);
    changeset.cast_assoc("transactions", cast_transaction);

    let mut mutation = Mutation::new().cascade(false);
    changeset.apply(&mut user, &mut mutation);

    assert!(mutation.assoc.is_empty());
    assert!(user.transactions.is_empty());
    assert_eq!(user.name, "Nami");
}

#[test]
fn test_nested_errors_do_not_block_apply() {
    let mut user = User::default();
    let input = params(json!({"transactions": [{"item": "Sword"}, {"status": "paid"}]}));

    let mut changeset = cast(&user, &input, &[]);
    changeset.cast_assoc("transactions", cast_transaction);

    let error = changeset.error().expect("nested error");
    assert_eq!(error.field, "transactions[1].item");
    assert_eq!(error.message, "item is required");

    let mutation = Mutation::from_changeset(&mut user, changeset);
    assert_eq!(mutation.assoc["transactions"].len(), 2);
}

#[test]
fn test_required_association() {
    let user = User::default();
    let mut changeset = cast(&user, &params(json!({"name": "Usopp"})), &["name"]);
    changeset.cast_assoc_with("address", cast_address, Options::new().required(true));

    let error = changeset.error().expect("required error");
    assert_eq!(error.field, "address");
    assert_eq!(error.message, "address is required");
}

#[test]
fn test_put_default_respects_supplied_params() {
    let user = User::default();

    let mut changeset = cast(&user, &params(json!({"age": 0})), &["age"]);
    changeset.put_default("age", 18);
    assert!(changeset.get("age").is_none());
    assert_eq!(changeset.fetch("age"), Some(&Value::Int(Some(0))));

    let mut changeset = cast(&user, &params(json!({})), &["age"]);
    changeset.put_default("age", 18);
    assert_eq!(changeset.fetch("age"), Some(&Value::Int(Some(18))));
}

#[test]
fn test_validators_on_derived_record() {
    let user = User::default();
    let input = params(json!({"name": "", "age": "17"}));

    let mut changeset = cast(&user, &input, &["name", "age"]);
    changeset.validate_required(&["name"]);
    changeset.validate_min("age", 18.0);

    let errors = changeset.errors().expect("errors");
    let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
    assert_eq!(fields, ["name", "age"]);
    assert_eq!(errors[1].message, "age must be more than 18");
}

#[test]
fn test_null_on_non_nullable_field_reaches_mutation() {
    let mut user = User {
        id: 1,
        age: 5,
        ..User::default()
    };

    let changeset = cast(&user, &params(json!({"age": null})), &["age"]);
    assert!(changeset.error().is_none());
    assert_eq!(changeset.fetch("age"), Some(&Value::Int(Some(0))));

    let mutation = Mutation::from_changeset(&mut user, changeset);
    assert_eq!(mutation.sets["age"], Value::Int(Some(0)));
    assert_eq!(user.age, 0);
}
