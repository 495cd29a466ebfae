//! Integration tests for castguard
//!
//! Records are declared with `#[derive(Schema)]` and run through the full
//! cast, validate and apply pipeline.

mod changeset_apply;
mod constraints;
mod custom_schema;
mod fixtures;
