//! Storage constraint violations translated through an applied mutation

use crate::fixtures::Article;
use castguard::{
    cast, BoxError, ConstraintError, ConstraintKind, Error, Mutation, Options, Params,
};
use serde_json::json;

fn article_mutation() -> Mutation {
    let mut article = Article::default();
    let params = Params::try_from(json!({
        "slug": "grand-line",
        "state": "draft",
        "user_id": 1
    }))
    .expect("params object");

    let mut changeset = cast(&article, &params, &["slug", "state", "user_id"]);
    changeset.unique_constraint("slug");
    changeset.foreign_key_constraint_with("user_id", Options::new().name("user_id_ibfk1").exact(true));
    changeset.check_constraint("state");
    assert_eq!(changeset.constraints().len(), 3);

    Mutation::from_changeset(&mut article, changeset)
}

fn violation(key: &str, kind: ConstraintKind) -> BoxError {
    Box::new(ConstraintError::new(key, kind))
}

#[test]
fn test_unique_violation_maps_to_field() {
    let mutation = article_mutation();

    let err = mutation.map_error(violation("slug_unique_index", ConstraintKind::Unique));
    let field_error = err.downcast_ref::<Error>().expect("field error");
    assert_eq!(field_error.field, "slug");
    assert_eq!(field_error.message, "slug has already been taken");

    let cause = field_error.cause().expect("original violation");
    assert_eq!(cause.to_string(), "unique constraint error: slug_unique_index");
}

#[test]
fn test_unmatched_unique_violation_is_unchanged() {
    let mutation = article_mutation();

    let err = mutation.map_error(violation("other_unique_index", ConstraintKind::Unique));
    assert!(err.downcast_ref::<Error>().is_none());
    assert_eq!(
        err.downcast_ref::<ConstraintError>(),
        Some(&ConstraintError::new("other_unique_index", ConstraintKind::Unique))
    );
}

#[test]
fn test_exact_foreign_key_violation() {
    let mutation = article_mutation();

    let err = mutation.map_error(violation("user_id_ibfk1", ConstraintKind::ForeignKey));
    let field_error = err.downcast_ref::<Error>().expect("field error");
    assert_eq!(field_error.field, "user_id");
    assert_eq!(field_error.message, "does not exist");

    let err = mutation.map_error(violation("other_id_ibfk1", ConstraintKind::ForeignKey));
    assert!(err.downcast_ref::<Error>().is_none());
}

#[test]
fn test_check_violation_and_kind_mismatch() {
    let mutation = article_mutation();

    let err = mutation.map_error(violation("articles_state_check", ConstraintKind::Check));
    assert_eq!(err.downcast_ref::<Error>().map(|e| e.field.as_str()), Some("state"));

    let err = mutation.map_error(violation("slug_check", ConstraintKind::ForeignKey));
    assert!(err.downcast_ref::<Error>().is_none());
}

#[test]
fn test_non_constraint_errors_pass_through() {
    let mutation = article_mutation();

    let err = mutation.map_error("connection reset".into());
    assert_eq!(err.to_string(), "connection reset");
}

#[test]
fn test_no_hook_without_constraints() {
    let mut article = Article::default();
    let params = Params::try_from(json!({"title": "Wano"})).expect("params object");
    let changeset = cast(&article, &params, &["title"]);

    let mutation = Mutation::from_changeset(&mut article, changeset);
    assert!(mutation.error_fn.is_none());

    let err = mutation.map_error(violation("slug_unique_index", ConstraintKind::Unique));
    assert!(err.downcast_ref::<ConstraintError>().is_some());
}
