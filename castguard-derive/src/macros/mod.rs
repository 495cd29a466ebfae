//! Macro implementations

pub mod schema;

pub use schema::derive_schema;
