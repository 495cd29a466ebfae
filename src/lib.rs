//! # castguard
//!
//! Changeset casting, validation and mutation composition.
//!
//! Raw input is cast onto a record through an allow-list, coerced to the
//! record's declared field types, validated and diffed against the record's
//! current values. The resulting [`Changeset`], including nested changesets
//! for one-to-one and one-to-many associations, is then applied to a
//! [`Document`] to compose a [`Mutation`] for the persistence layer. Storage
//! constraint violations reported back by that layer are translated into
//! field errors through the constraints declared on the changeset.
//!
//! ```
//! use castguard::{cast, Mutation, Params, Schema};
//! use serde_json::json;
//!
//! #[derive(Schema, Default)]
//! struct User {
//!     id: i32,
//!     name: String,
//!     email: Option<String>,
//! }
//!
//! let mut user = User::default();
//! let params = Params::try_from(json!({"name": "Luffy", "email": "luffy@grandline.sea"})).unwrap();
//!
//! let mut changeset = cast(&user, &params, &["name", "email"]);
//! changeset.validate_required(&["name"]);
//! changeset.unique_constraint("email");
//! assert!(changeset.error().is_none());
//!
//! let mutation = Mutation::from_changeset(&mut user, changeset);
//! assert_eq!(mutation.sets.len(), 2);
//! assert_eq!(user.name, "Luffy");
//! ```

extern crate self as castguard;

pub mod changeset;
pub mod config;
pub mod constraint;
pub mod document;
pub mod error;
pub mod mutation;
pub mod options;
pub mod params;
pub mod schema;
pub mod value;

pub use castguard_derive::Schema;

pub use changeset::{cast, cast_with, change, change_with, convert, Change, Changeset};
pub use crate::config::{messages, ChangesetConfig, Messages};
pub use constraint::{Constraint, ConstraintError, ConstraintKind, Constraints};
pub use document::{BoxedVecCollection, Collection, Document, DocumentFlag, VecCollection};
pub use error::{BoxError, Error};
pub use mutation::{ErrorFn, Mutation};
pub use options::Options;
pub use params::Params;
pub use schema::{
    infer_fields, infer_schema, infer_types, infer_values, is_cached, CustomSchema, EqualFn,
    FieldDescriptor, FieldValue, Record, Schema, SchemaInfo,
};
pub use value::{coerce, is_auto_generated, is_null, Cardinality, FieldType, ValueType};

pub use sea_query;
pub use sea_query::Value;
