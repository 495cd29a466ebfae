//! Constraint declarations and violation translation.
//!
//! A persistence layer reports unique/foreign-key/check violations as a
//! [`ConstraintError`] carrying the violated constraint's key. Constraints
//! declared on a changeset map such violations back onto field errors.

use crate::error::{BoxError, Error};
use std::fmt;

/// Kind of storage constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    Unique,
    ForeignKey,
    Check,
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintKind::Unique => write!(f, "unique"),
            ConstraintKind::ForeignKey => write!(f, "foreign key"),
            ConstraintKind::Check => write!(f, "check"),
        }
    }
}

/// Constraint violation as reported by the storage layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintError {
    /// Name of the violated constraint or index
    pub key: String,
    pub kind: ConstraintKind,
}

impl ConstraintError {
    pub fn new(key: impl Into<String>, kind: ConstraintKind) -> Self {
        Self {
            key: key.into(),
            kind,
        }
    }
}

impl fmt::Display for ConstraintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} constraint error: {}", self.kind, self.key)
    }
}

impl std::error::Error for ConstraintError {}

/// A declared mapping from a constraint violation to a field error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    pub field: String,
    pub message: String,
    pub code: i32,
    /// Constraint name to match against the violation key
    pub name: String,
    /// Match the name exactly instead of as a substring of the key
    pub exact: bool,
    pub kind: ConstraintKind,
}

impl Constraint {
    /// Whether this declaration covers the given violation.
    #[must_use]
    pub fn matches(&self, err: &ConstraintError) -> bool {
        if self.kind != err.kind {
            return false;
        }
        if self.exact {
            self.name == err.key
        } else {
            err.key.contains(&self.name)
        }
    }
}

/// Ordered constraint declarations; the first match wins
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Constraints(Vec<Constraint>);

impl Constraints {
    pub fn push(&mut self, constraint: Constraint) {
        self.0.push(constraint);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Constraint> {
        self.0.iter()
    }

    /// Translate a storage error using the declared constraints.
    ///
    /// Errors that are not a [`ConstraintError`] are returned unchanged, as are
    /// violations no declaration matches. A match yields a field [`Error`]
    /// wrapping the original violation.
    pub fn get_error(&self, err: BoxError) -> BoxError {
        let Some(violation) = err.downcast_ref::<ConstraintError>() else {
            return err;
        };

        match self.0.iter().find(|c| c.matches(violation)) {
            Some(constraint) => Box::new(
                Error::with_code(&constraint.message, &constraint.field, constraint.code)
                    .caused_by(err),
            ),
            None => {
                log::debug!("no constraint declared for {violation}");
                err
            }
        }
    }
}

impl<'a> IntoIterator for &'a Constraints {
    type Item = &'a Constraint;
    type IntoIter = std::slice::Iter<'a, Constraint>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
