//! Writable record view used when applying changesets.
//!
//! [`Document`] is the object-safe counterpart of [`Schema`]: name-based
//! field access, association slots and the timestamp flags the mutation
//! composer consults. Every `Schema` type is a `Document`.

use crate::schema::{infer_schema, Schema};
use crate::value::FieldType;
use sea_query::Value;

/// Timestamp fields a document may carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFlag {
    HasCreatedAt,
    HasUpdatedAt,
}

impl DocumentFlag {
    /// The field the flag refers to.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            DocumentFlag::HasCreatedAt => "created_at",
            DocumentFlag::HasUpdatedAt => "updated_at",
        }
    }
}

/// Writable, name-addressed view of a record
pub trait Document {
    fn primary_field(&self) -> &str;

    fn field_type(&self, field: &str) -> Option<FieldType>;

    /// Current scalar value; optional fields report their typed null.
    fn value(&self, field: &str) -> Option<Value>;

    /// Store a scalar value. Returns `false` if the field is unknown or the value does not fit.
    fn set_value(&mut self, field: &str, value: &Value) -> bool;

    /// One-to-one association, creating an empty nested record if unset.
    fn association_one(&mut self, field: &str) -> Option<&mut dyn Document>;

    /// One-to-many association.
    fn association_many(&mut self, field: &str) -> Option<Box<dyn Collection + '_>>;

    /// Only `Timestamp` fields count; a `created_at` stored as an integer
    /// or string is not detected.
    fn flag(&self, flag: DocumentFlag) -> bool {
        self.field_type(flag.field()) == Some(FieldType::Timestamp)
    }
}

/// Ordered, resettable collection of nested documents
pub trait Collection {
    /// Drop every element.
    fn reset(&mut self);

    /// Append an empty element and return it for population.
    fn add(&mut self) -> &mut dyn Document;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Schema> Document for T {
    fn primary_field(&self) -> &str {
        T::primary_key()
    }

    fn field_type(&self, field: &str) -> Option<FieldType> {
        infer_schema(self).field_type(field)
    }

    fn value(&self, field: &str) -> Option<Value> {
        let position = infer_schema(self).position(field)?;
        match self.custom_schema() {
            Some(custom) => custom.values().into_iter().nth(position)?.into_scalar(),
            None => self.read_field(position).into_scalar(),
        }
    }

    fn set_value(&mut self, field: &str, value: &Value) -> bool {
        match infer_schema(self).position(field) {
            Some(position) => self.write_field(position, value),
            None => false,
        }
    }

    fn association_one(&mut self, field: &str) -> Option<&mut dyn Document> {
        let position = infer_schema(self).position(field)?;
        self.child_mut(position)
    }

    fn association_many(&mut self, field: &str) -> Option<Box<dyn Collection + '_>> {
        let position = infer_schema(self).position(field)?;
        self.children_mut(position)
    }
}

/// Collection over `Vec<T>`
pub struct VecCollection<'a, T> {
    items: &'a mut Vec<T>,
}

impl<'a, T> VecCollection<'a, T> {
    pub fn new(items: &'a mut Vec<T>) -> Self {
        Self { items }
    }
}

impl<T: Schema + Default> Collection for VecCollection<'_, T> {
    fn reset(&mut self) {
        self.items.clear();
    }

    fn add(&mut self) -> &mut dyn Document {
        self.items.push(T::default());
        let last = self.items.len() - 1;
        &mut self.items[last]
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

/// Collection over `Vec<Box<T>>`
pub struct BoxedVecCollection<'a, T> {
    items: &'a mut Vec<Box<T>>,
}

impl<'a, T> BoxedVecCollection<'a, T> {
    pub fn new(items: &'a mut Vec<Box<T>>) -> Self {
        Self { items }
    }
}

impl<T: Schema + Default> Collection for BoxedVecCollection<'_, T> {
    fn reset(&mut self) {
        self.items.clear();
    }

    fn add(&mut self) -> &mut dyn Document {
        self.items.push(Box::default());
        let last = self.items.len() - 1;
        &mut *self.items[last]
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}
