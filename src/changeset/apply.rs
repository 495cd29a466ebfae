//! Mutation composition.
//!
//! [`Changeset::apply`] writes a changeset's changes into a [`Document`]
//! and records every accepted write in a [`Mutation`], recursing through
//! nested association changesets when the mutation cascades.

use super::{Change, Changeset};
use crate::document::{Document, DocumentFlag};
use crate::error::BoxError;
use crate::mutation::{ErrorFn, Mutation};
use crate::value::{is_auto_generated, is_null, FieldType};
use chrono::{SubsecRound, Utc};
use sea_query::Value;
use std::sync::Arc;

impl Changeset {
    /// Apply the changes to `doc`, recording the writes in `mutation`.
    ///
    /// The primary key is written only when the record's current key is not
    /// engine-generated, a non-null key change is pending, and the changeset
    /// was not produced by [`crate::convert`]. `created_at` is stamped when
    /// zero, `updated_at` always. Accumulated errors are not consulted;
    /// check [`Changeset::error`] first.
    pub fn apply(self, doc: &mut dyn Document, mutation: &mut Mutation) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("changeset_apply", changes = self.changes.len()).entered();

        let Changeset {
            changes,
            values,
            types,
            constraints,
            ignore_primary,
            ..
        } = self;

        let primary = doc.primary_field().to_string();
        let primary_mutable = !values.get(&primary).is_some_and(is_auto_generated)
            && matches!(changes.get(&primary), Some(Change::Value(value)) if !is_null(value));
        let now = Utc::now().trunc_subsecs(0);

        for (field, change) in changes {
            match change {
                Change::One(child) => {
                    if mutation.cascade {
                        apply_one(doc, &field, *child, mutation);
                    }
                }
                Change::Many(children) => {
                    if mutation.cascade {
                        apply_many(doc, &field, children, mutation);
                    }
                }
                Change::Value(value) => {
                    let persistable = types
                        .get(&field)
                        .copied()
                        .or_else(|| doc.field_type(&field))
                        .is_some_and(|ty| ty.is_persistable());
                    if !persistable {
                        log::debug!("apply: skipping non-persistable change of {field}");
                        continue;
                    }
                    if field != primary || (primary_mutable && !ignore_primary) {
                        set(doc, mutation, &field, value);
                    }
                }
            }
        }

        let created_at = DocumentFlag::HasCreatedAt.field();
        if doc.flag(DocumentFlag::HasCreatedAt)
            && !mutation.sets.contains_key(created_at)
            && doc
                .value(created_at)
                .is_some_and(|value| FieldType::Timestamp.is_zero(&value))
        {
            set(doc, mutation, created_at, Value::from(now));
        }

        if doc.flag(DocumentFlag::HasUpdatedAt) {
            set(doc, mutation, DocumentFlag::HasUpdatedAt.field(), Value::from(now));
        }

        if !constraints.is_empty() {
            let error_fn: ErrorFn = Arc::new(move |err: BoxError| constraints.get_error(err));
            mutation.error_fn = Some(error_fn);
        }
    }
}

fn set(doc: &mut dyn Document, mutation: &mut Mutation, field: &str, value: Value) {
    if doc.set_value(field, &value) {
        mutation.set(field, value);
    } else {
        log::debug!("apply: document rejected value for {field}");
    }
}

fn apply_one(doc: &mut dyn Document, field: &str, child: Changeset, mutation: &mut Mutation) {
    let Some(child_doc) = doc.association_one(field) else {
        log::warn!("apply: {field} is not a one-to-one association");
        return;
    };

    let mut child_mutation = Mutation::new().cascade(mutation.cascade);
    child.apply(child_doc, &mut child_mutation);
    mutation.set_assoc(field, vec![child_mutation]);
}

fn apply_many(doc: &mut dyn Document, field: &str, children: Vec<Changeset>, mutation: &mut Mutation) {
    let Some(mut collection) = doc.association_many(field) else {
        log::warn!("apply: {field} is not a one-to-many association");
        return;
    };

    collection.reset();
    let mut mutations = Vec::with_capacity(children.len());
    for child in children {
        let mut child_mutation = Mutation::new().cascade(mutation.cascade);
        child.apply(collection.add(), &mut child_mutation);
        mutations.push(child_mutation);
    }
    mutation.set_assoc(field, mutations);
}
