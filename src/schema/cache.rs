//! Process-wide schema cache.
//!
//! Descriptor-derived schemas are computed once per record shape and shared
//! behind an `Arc`. Entries are never evicted; record shapes are a closed set
//! fixed at compile time.

use super::{structural_eq, CustomSchema, EqualFn, FieldValue, Schema};
use crate::value::FieldType;
use once_cell::sync::Lazy;
use std::any::TypeId;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

static SCHEMA_CACHE: Lazy<RwLock<HashMap<TypeId, Arc<SchemaInfo>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Field names, positions and types of one record shape
pub struct SchemaInfo {
    fields: BTreeMap<String, usize>,
    names: Vec<String>,
    types: Vec<FieldType>,
    equals: Vec<EqualFn>,
    nullable: Vec<bool>,
    primary_key: String,
}

impl SchemaInfo {
    fn from_descriptors<T: Schema>() -> Self {
        let descriptors = T::describe();
        let mut fields = BTreeMap::new();
        let mut names = Vec::with_capacity(descriptors.len());
        let mut types = Vec::with_capacity(descriptors.len());
        let mut equals = Vec::with_capacity(descriptors.len());
        let mut nullable = Vec::with_capacity(descriptors.len());

        for (position, descriptor) in descriptors.iter().enumerate() {
            fields.insert(descriptor.name.to_string(), position);
            names.push(descriptor.name.to_string());
            types.push(descriptor.ty);
            equals.push(descriptor.equal);
            nullable.push(descriptor.nullable);
        }

        Self {
            fields,
            names,
            types,
            equals,
            nullable,
            primary_key: T::primary_key().to_string(),
        }
    }

    fn from_custom(custom: &dyn CustomSchema, primary_key: &str) -> Self {
        let fields = custom.fields();
        let types = custom.types();
        let mut names = vec![String::new(); types.len()];
        for (name, &position) in &fields {
            if let Some(slot) = names.get_mut(position) {
                slot.clone_from(name);
            }
        }

        Self {
            equals: vec![structural_eq as EqualFn; types.len()],
            nullable: vec![true; types.len()],
            fields,
            names,
            types,
            primary_key: primary_key.to_string(),
        }
    }

    pub fn fields(&self) -> &BTreeMap<String, usize> {
        &self.fields
    }

    /// Field names by position.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn types(&self) -> &[FieldType] {
        &self.types
    }

    pub fn position(&self, field: &str) -> Option<usize> {
        self.fields.get(field).copied()
    }

    pub fn field_type(&self, field: &str) -> Option<FieldType> {
        self.position(field)
            .and_then(|position| self.types.get(position).copied())
    }

    /// Equality for diffing values of the field; structural when unknown.
    pub fn equal_fn(&self, field: &str) -> EqualFn {
        self.position(field)
            .and_then(|position| self.equals.get(position).copied())
            .unwrap_or(structural_eq)
    }

    /// Whether the field may hold null; custom-reported fields always may.
    pub fn is_nullable(&self, field: &str) -> bool {
        self.position(field)
            .and_then(|position| self.nullable.get(position).copied())
            .unwrap_or(true)
    }

    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    /// Field name to declared type.
    pub fn type_map(&self) -> BTreeMap<String, FieldType> {
        self.fields
            .iter()
            .filter_map(|(name, &position)| {
                self.types.get(position).map(|ty| (name.clone(), *ty))
            })
            .collect()
    }
}

impl fmt::Debug for SchemaInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaInfo")
            .field("fields", &self.fields)
            .field("types", &self.types)
            .field("primary_key", &self.primary_key)
            .finish()
    }
}

/// Schema of a record, from its custom reporting or the shared cache.
pub fn infer_schema<T: Schema>(record: &T) -> Arc<SchemaInfo> {
    if let Some(custom) = record.custom_schema() {
        return Arc::new(SchemaInfo::from_custom(custom, T::primary_key()));
    }

    let key = TypeId::of::<T>();
    if let Some(info) = SCHEMA_CACHE
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&key)
    {
        return Arc::clone(info);
    }

    let info = Arc::new(SchemaInfo::from_descriptors::<T>());
    let mut cache = SCHEMA_CACHE.write().unwrap_or_else(PoisonError::into_inner);
    // Concurrent first calls may both compute; the first insert wins.
    let entry = cache.entry(key).or_insert_with(|| {
        log::trace!(
            "cached schema for {} ({} fields)",
            std::any::type_name::<T>(),
            info.types.len()
        );
        Arc::clone(&info)
    });
    Arc::clone(entry)
}

/// Field name to position.
pub fn infer_fields<T: Schema>(record: &T) -> BTreeMap<String, usize> {
    if let Some(custom) = record.custom_schema() {
        return custom.fields();
    }
    infer_schema(record).fields.clone()
}

/// Declared types by position.
pub fn infer_types<T: Schema>(record: &T) -> Vec<FieldType> {
    if let Some(custom) = record.custom_schema() {
        return custom.types();
    }
    infer_schema(record).types.clone()
}

/// Current field values by position. Never cached.
pub fn infer_values<T: Schema>(record: &T) -> Vec<FieldValue<'_>> {
    if let Some(custom) = record.custom_schema() {
        return custom.values();
    }
    let count = infer_schema(record).types.len();
    (0..count).map(|position| record.read_field(position)).collect()
}

/// Whether the descriptor-derived schema of `T` is cached.
pub fn is_cached<T: Schema>() -> bool {
    SCHEMA_CACHE
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .contains_key(&TypeId::of::<T>())
}
