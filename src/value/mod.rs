//! Value type system for castguard
//!
//! Field values are `sea_query::Value`s, the same representation the ORM
//! layer binds into queries. This module provides:
//!
//! - **`ValueType`** - Maps Rust field types to their `sea_query::Value` variant and declared type
//! - **`FieldType`** - The declared type tag of a field (scalar kinds or association cardinality)
//! - **`coerce`** - Turns raw JSON input into a value of a declared type

pub mod coerce;
pub mod field_type;
pub mod types;

pub use coerce::coerce;
pub use field_type::{is_auto_generated, is_null, Cardinality, FieldType};
pub use types::ValueType;
