//! Changesets: cast, validated, pending updates of a record.
//!
//! A [`Changeset`] is created once from a record by [`cast`], [`change`] or
//! [`convert`], refined with the `put_*`, `validate_*` and constraint
//! methods, and finally consumed by [`Changeset::apply`].
//!
//! # Example
//!
//! ```
//! use castguard::{cast, Params, Schema};
//! use serde_json::json;
//!
//! #[derive(Schema, Default)]
//! struct User {
//!     id: i32,
//!     name: String,
//!     age: i32,
//! }
//!
//! let user = User { id: 1, name: "Luffy".to_string(), age: 19 };
//! let params = Params::try_from(json!({"name": "Zoro", "age": "19", "id": 7})).unwrap();
//!
//! let mut changeset = cast(&user, &params, &["name", "age"]);
//! changeset.validate_required(&["name"]);
//!
//! assert!(changeset.errors().is_none());
//! assert!(changeset.get("name").is_some());
//! assert!(changeset.get("age").is_none()); // unchanged
//! assert!(changeset.get("id").is_none()); // not permitted
//! ```

pub mod apply;
mod cast;
mod put;
mod validate;

pub use cast::{cast, cast_with, change, change_with, convert};

use crate::config::messages;
use crate::constraint::{Constraint, ConstraintKind, Constraints};
use crate::error::Error;
use crate::options::{render, Options};
use crate::params::Params;
use crate::schema::{infer_schema, infer_values, EqualFn, FieldValue, Schema, SchemaInfo};
use crate::value::{is_null, FieldType};
use sea_query::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// A pending change of one field
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    /// Scalar column value
    Value(Value),
    /// Nested changeset of a one-to-one association
    One(Box<Changeset>),
    /// Nested changesets of a one-to-many association, in order
    Many(Vec<Changeset>),
}

impl Change {
    #[must_use]
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Change::Value(value) => Some(value),
            _ => None,
        }
    }
}

impl From<Value> for Change {
    fn from(value: Value) -> Self {
        Change::Value(value)
    }
}

impl From<Changeset> for Change {
    fn from(changeset: Changeset) -> Self {
        Change::One(Box::new(changeset))
    }
}

impl From<Vec<Changeset>> for Change {
    fn from(changesets: Vec<Changeset>) -> Self {
        Change::Many(changesets)
    }
}

/// Cast and validated pending update of a record
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Changeset {
    errors: Vec<Error>,
    params: Option<Params>,
    changes: BTreeMap<String, Change>,
    values: BTreeMap<String, Value>,
    types: BTreeMap<String, FieldType>,
    constraints: Constraints,
    ignore_primary: bool,
}

impl Changeset {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulated errors; `None` when there are none.
    #[must_use]
    pub fn errors(&self) -> Option<&[Error]> {
        if self.errors.is_empty() {
            None
        } else {
            Some(&self.errors)
        }
    }

    /// The first error, if any.
    #[must_use]
    pub fn error(&self) -> Option<&Error> {
        self.errors.first()
    }

    /// Pending change of a field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Change> {
        self.changes.get(field)
    }

    /// Pending scalar change of a field, else its baseline value.
    #[must_use]
    pub fn fetch(&self, field: &str) -> Option<&Value> {
        match self.changes.get(field) {
            Some(Change::Value(value)) => Some(value),
            Some(_) => None,
            None => self.values.get(field),
        }
    }

    pub fn changes(&self) -> &BTreeMap<String, Change> {
        &self.changes
    }

    /// Baseline values of the record; null fields are absent.
    pub fn values(&self) -> &BTreeMap<String, Value> {
        &self.values
    }

    pub fn types(&self) -> &BTreeMap<String, FieldType> {
        &self.types
    }

    pub fn constraints(&self) -> &Constraints {
        &self.constraints
    }

    pub fn params(&self) -> Option<&Params> {
        self.params.as_ref()
    }

    /// Whether the primary key change came from the record itself.
    #[must_use]
    pub fn ignores_primary(&self) -> bool {
        self.ignore_primary
    }

    /// Append a field error.
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(Error::new(message, field));
    }

    pub fn unique_constraint(&mut self, field: &str) {
        self.unique_constraint_with(field, Options::new());
    }

    /// Map unique violations whose key contains the field (or `name`) to a field error.
    pub fn unique_constraint_with(&mut self, field: &str, opts: Options) {
        let template = messages().unique.clone();
        self.declare_constraint(field, &opts, ConstraintKind::Unique, &template);
    }

    pub fn foreign_key_constraint(&mut self, field: &str) {
        self.foreign_key_constraint_with(field, Options::new());
    }

    pub fn foreign_key_constraint_with(&mut self, field: &str, opts: Options) {
        let template = messages().foreign_key.clone();
        self.declare_constraint(field, &opts, ConstraintKind::ForeignKey, &template);
    }

    pub fn check_constraint(&mut self, field: &str) {
        self.check_constraint_with(field, Options::new());
    }

    pub fn check_constraint_with(&mut self, field: &str, opts: Options) {
        let template = messages().check.clone();
        self.declare_constraint(field, &opts, ConstraintKind::Check, &template);
    }

    fn declare_constraint(&mut self, field: &str, opts: &Options, kind: ConstraintKind, default: &str) {
        self.constraints.push(Constraint {
            field: field.to_string(),
            message: render(&opts.message_or(default), &[("field", field)]),
            code: opts.error_code(),
            name: opts.constraint_name(field),
            exact: opts.is_exact(),
            kind,
        });
    }

    /// Record a field error rendered from the operation's template.
    pub(crate) fn invalid(&mut self, field: &str, opts: &Options, default: &str) {
        let message = render(&opts.message_or(default), &[("field", field)]);
        self.errors.push(Error::with_code(message, field, opts.error_code()));
    }

    /// Store a scalar change unless it equals the baseline.
    pub(crate) fn diff(&mut self, field: &str, value: Value, equal: EqualFn) {
        let unchanged = match self.values.get(field) {
            Some(baseline) => equal(baseline, &value),
            None => is_null(&value),
        };
        if !unchanged {
            self.changes.insert(field.to_string(), Change::Value(value));
        }
    }
}

/// Changeset with the record's baseline values and declared types.
pub(crate) fn baseline<T: Schema>(record: &T) -> (Changeset, Arc<SchemaInfo>) {
    let info = infer_schema(record);
    let mut values = BTreeMap::new();

    for (position, value) in infer_values(record).into_iter().enumerate() {
        let (Some(name), FieldValue::Scalar(value)) = (info.names().get(position), value) else {
            continue;
        };
        if !is_null(&value) {
            values.insert(name.clone(), value);
        }
    }

    let changeset = Changeset {
        values,
        types: info.type_map(),
        ..Changeset::default()
    };
    (changeset, info)
}
