//! Procedural macros for castguard
//!
//! This crate provides the `Schema` derive used to describe record shapes
//! to the changeset engine.

mod attributes;
mod macros;
mod type_shape;
mod utils;

use proc_macro::TokenStream;

/// Derive macro for `Schema` - generates the record shape descriptor
///
/// This macro generates:
/// - `describe()` with one field descriptor per included field
/// - `primary_key()` when a field is marked `#[primary_key]` (defaults to `id`)
/// - positional readers and writers for scalar fields
/// - association slots for `#[has_one]` / `#[has_many]` fields
///
/// Field attributes:
/// - `#[column_name = "name"]` - field name override; `"-"` excludes the field
/// - `#[skip]` / `#[ignore]` - exclude the field
/// - `#[primary_key]` - identifying field
/// - `#[has_one]` - one-to-one association (`T`, `Box<T>`, `Option<T>`, `Option<Box<T>>`)
/// - `#[has_many]` - one-to-many association (`Vec<T>`, `Vec<Box<T>>`)
///
/// Scalar fields must implement `castguard::ValueType`; association targets
/// must implement `Schema` and `Default`.
///
/// See `castguard-derive/tests/test_derive_schema.rs` for usage examples.
#[proc_macro_derive(Schema, attributes(column_name, primary_key, skip, ignore, has_one, has_many))]
pub fn derive_schema(input: TokenStream) -> TokenStream {
    macros::derive_schema(input)
}
