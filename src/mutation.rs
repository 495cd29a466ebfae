//! Storage-facing mutation plans.
//!
//! A [`Mutation`] is what [`crate::Changeset::apply`] produces: the column
//! values to write, nested mutations for associations, and an optional hook
//! translating storage errors through the changeset's declared constraints.

use crate::changeset::Changeset;
use crate::document::Document;
use crate::error::BoxError;
use sea_query::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Storage error translation hook
pub type ErrorFn = Arc<dyn Fn(BoxError) -> BoxError + Send + Sync>;

/// Pending write of one record and, when cascading, its associations
#[derive(Clone)]
pub struct Mutation {
    /// Column values keyed by field name
    pub sets: BTreeMap<String, Value>,
    /// Nested mutations keyed by association field, in collection order
    pub assoc: BTreeMap<String, Vec<Mutation>>,
    /// Whether association changes are applied
    pub cascade: bool,
    pub error_fn: Option<ErrorFn>,
}

impl Default for Mutation {
    fn default() -> Self {
        Self {
            sets: BTreeMap::new(),
            assoc: BTreeMap::new(),
            cascade: true,
            error_fn: None,
        }
    }
}

impl Mutation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn cascade(mut self, cascade: bool) -> Self {
        self.cascade = cascade;
        self
    }

    /// Record a column write; a later write to the same field replaces it.
    pub fn set(&mut self, field: impl Into<String>, value: Value) {
        self.sets.insert(field.into(), value);
    }

    pub fn set_assoc(&mut self, field: impl Into<String>, mutations: Vec<Mutation>) {
        self.assoc.insert(field.into(), mutations);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty() && self.assoc.is_empty()
    }

    /// Translate a storage error through the attached hook, if any.
    pub fn map_error(&self, err: BoxError) -> BoxError {
        match &self.error_fn {
            Some(error_fn) => error_fn(err),
            None => err,
        }
    }

    /// Build a cascading mutation by applying a changeset to a document.
    pub fn from_changeset(doc: &mut dyn Document, changeset: Changeset) -> Self {
        let mut mutation = Mutation::new();
        changeset.apply(doc, &mut mutation);
        mutation
    }
}

impl fmt::Debug for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mutation")
            .field("sets", &self.sets)
            .field("assoc", &self.assoc)
            .field("cascade", &self.cascade)
            .field("error_fn", &self.error_fn.is_some())
            .finish()
    }
}

// The hook is compared by presence only.
impl PartialEq for Mutation {
    fn eq(&self, other: &Self) -> bool {
        self.sets == other.sets
            && self.assoc == other.assoc
            && self.cascade == other.cascade
            && self.error_fn.is_some() == other.error_fn.is_some()
    }
}
