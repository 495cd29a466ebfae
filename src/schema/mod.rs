//! Record schema introspection.
//!
//! A record shape is any type implementing [`Schema`], normally through
//! `#[derive(Schema)]`. The derive reports one [`FieldDescriptor`] per
//! included field plus positional accessors; [`infer_schema`] turns the
//! descriptors into a [`SchemaInfo`] once per shape and caches it.
//!
//! Records whose field set varies per instance implement
//! [`Schema::custom_schema`] instead; their answers are used verbatim and
//! never cached.
//!
//! # Example
//!
//! ```
//! use castguard::{infer_fields, Schema};
//!
//! #[derive(Schema, Default)]
//! struct User {
//!     id: i32,
//!     #[column_name = "full_name"]
//!     name: String,
//!     #[skip]
//!     password_confirmation: String,
//! }
//!
//! let fields = infer_fields(&User::default());
//! assert_eq!(fields.get("id"), Some(&0));
//! assert_eq!(fields.get("full_name"), Some(&1));
//! assert_eq!(fields.len(), 2);
//! ```

pub mod cache;

pub use cache::{infer_fields, infer_schema, infer_types, infer_values, is_cached, SchemaInfo};

use crate::changeset::Changeset;
use crate::document::{Collection, Document};
use crate::value::{Cardinality, FieldType, ValueType};
use sea_query::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Equality used to diff a cast value against the baseline
pub type EqualFn = fn(&Value, &Value) -> bool;

pub(crate) fn structural_eq(a: &Value, b: &Value) -> bool {
    a == b
}

/// Static description of one record field
#[derive(Clone, Copy)]
pub struct FieldDescriptor {
    /// Field name as seen by changesets and the storage layer
    pub name: &'static str,
    /// Rust member name
    pub member: &'static str,
    pub ty: FieldType,
    pub nullable: bool,
    pub equal: EqualFn,
}

impl FieldDescriptor {
    /// Describe a scalar field of Rust type `T`.
    pub fn scalar<T: ValueType>(name: &'static str, member: &'static str) -> Self {
        Self {
            name,
            member,
            ty: T::field_type(),
            nullable: T::nullable(),
            equal: T::values_equal,
        }
    }

    /// Describe an association field.
    pub fn association(name: &'static str, member: &'static str, cardinality: Cardinality) -> Self {
        Self {
            name,
            member,
            ty: FieldType::Assoc(cardinality),
            nullable: cardinality == Cardinality::One,
            equal: structural_eq,
        }
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("member", &self.member)
            .field("ty", &self.ty)
            .field("nullable", &self.nullable)
            .finish()
    }
}

/// Current value of a record field
pub enum FieldValue<'a> {
    /// Scalar value; absent optional fields report their typed null
    Scalar(Value),
    /// One-to-one association slot
    One(Option<&'a dyn Record>),
    /// One-to-many association, in order
    Many(Vec<&'a dyn Record>),
    /// No such field
    Absent,
}

impl FieldValue<'_> {
    #[must_use]
    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            FieldValue::Scalar(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn into_scalar(self) -> Option<Value> {
        match self {
            FieldValue::Scalar(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Debug for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Scalar(value) => f.debug_tuple("Scalar").field(value).finish(),
            FieldValue::One(record) => write!(f, "One({})", if record.is_some() { "Some" } else { "None" }),
            FieldValue::Many(records) => write!(f, "Many(len = {})", records.len()),
            FieldValue::Absent => write!(f, "Absent"),
        }
    }
}

/// Record shape descriptor and positional accessors
///
/// Positions are indexes into [`Schema::describe`]. Implemented by
/// `#[derive(Schema)]`; hand-written impls usually only provide
/// `describe` and [`Schema::custom_schema`].
pub trait Schema: 'static {
    /// Descriptors of every included field, in declaration order.
    fn describe() -> Vec<FieldDescriptor>;

    /// Name of the identifying field.
    fn primary_key() -> &'static str {
        "id"
    }

    fn read_field(&self, _position: usize) -> FieldValue<'_> {
        FieldValue::Absent
    }

    /// Store a value into a scalar field; `false` when the value does not fit.
    ///
    /// Records with a custom schema receive the positions reported by
    /// [`CustomSchema::fields`].
    fn write_field(&mut self, _position: usize, _value: &Value) -> bool {
        false
    }

    /// One-to-one association slot, created on demand.
    fn child_mut(&mut self, _position: usize) -> Option<&mut dyn Document> {
        None
    }

    /// One-to-many association collection.
    fn children_mut(&mut self, _position: usize) -> Option<Box<dyn Collection + '_>> {
        None
    }

    /// Per-instance field reporting that replaces the derived descriptor.
    fn custom_schema(&self) -> Option<&dyn CustomSchema> {
        None
    }
}

/// Field reporting supplied by the record itself
pub trait CustomSchema {
    /// Field name to position.
    fn fields(&self) -> BTreeMap<String, usize>;

    /// Declared types, by position.
    fn types(&self) -> Vec<FieldType>;

    /// Current values, by position.
    fn values(&self) -> Vec<FieldValue<'_>>;
}

/// Object-safe view of a record, used for nested association values
pub trait Record {
    /// Changeset holding every field of this record as a change.
    fn convert(&self) -> Changeset;
}

impl<T: Schema> Record for T {
    fn convert(&self) -> Changeset {
        crate::changeset::convert(self)
    }
}
