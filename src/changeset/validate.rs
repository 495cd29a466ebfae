use super::{Change, Changeset};
use crate::config::messages;
use crate::error::Error;
use crate::options::{render, Options};
use crate::value::field_type::integer_of;
use crate::value::{is_null, ValueType};
use regex::Regex;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sea_query::Value;

impl Changeset {
    /// Require a non-blank value, pending or baseline, for each field.
    pub fn validate_required(&mut self, fields: &[&str]) {
        self.validate_required_with(fields, Options::new());
    }

    pub fn validate_required_with(&mut self, fields: &[&str], opts: Options) {
        for &field in fields {
            let present = self.fetch(field).is_some_and(|value| !is_blank(value));
            if !present {
                self.invalid(field, &opts, &messages().required);
            }
        }
    }

    /// Numbers must be at least `min`; strings and bytes must be at least that long.
    pub fn validate_min(&mut self, field: &str, min: f64) {
        self.validate_min_with(field, min, Options::new());
    }

    pub fn validate_min_with(&mut self, field: &str, min: f64, opts: Options) {
        if self.pending_magnitude(field).is_some_and(|size| size < min) {
            let template = opts.message_or(&messages().min);
            self.push_rendered(field, &template, &[("min", min.to_string().as_str())], &opts);
        }
    }

    /// Numbers must be at most `max`; strings and bytes at most that long.
    pub fn validate_max(&mut self, field: &str, max: f64) {
        self.validate_max_with(field, max, Options::new());
    }

    pub fn validate_max_with(&mut self, field: &str, max: f64, opts: Options) {
        if self.pending_magnitude(field).is_some_and(|size| size > max) {
            let template = opts.message_or(&messages().max);
            self.push_rendered(field, &template, &[("max", max.to_string().as_str())], &opts);
        }
    }

    pub fn validate_range(&mut self, field: &str, min: f64, max: f64) {
        self.validate_range_with(field, min, max, Options::new());
    }

    pub fn validate_range_with(&mut self, field: &str, min: f64, max: f64, opts: Options) {
        if self
            .pending_magnitude(field)
            .is_some_and(|size| size < min || size > max)
        {
            let template = opts.message_or(&messages().range);
            self.push_rendered(
                field,
                &template,
                &[("min", min.to_string().as_str()), ("max", max.to_string().as_str())],
                &opts,
            );
        }
    }

    /// Pending string changes must match the pattern.
    pub fn validate_pattern(&mut self, field: &str, pattern: &Regex) {
        self.validate_pattern_with(field, pattern, Options::new());
    }

    pub fn validate_pattern_with(&mut self, field: &str, pattern: &Regex, opts: Options) {
        let mismatch = match self.changes.get(field) {
            Some(Change::Value(Value::String(Some(text)))) => !pattern.is_match(text),
            _ => false,
        };
        if mismatch {
            self.invalid(field, &opts, &messages().pattern);
        }
    }

    /// Pending changes must equal one of `values`.
    pub fn validate_inclusion(&mut self, field: &str, values: &[Value]) {
        self.validate_inclusion_with(field, values, Options::new());
    }

    pub fn validate_inclusion_with(&mut self, field: &str, values: &[Value], opts: Options) {
        let outside = self
            .pending_value(field)
            .is_some_and(|value| !values.contains(value));
        if outside {
            let template = opts.message_or(&messages().inclusion);
            self.push_rendered(field, &template, &[("values", list(values).as_str())], &opts);
        }
    }

    /// Pending changes must not equal any of `values`.
    pub fn validate_exclusion(&mut self, field: &str, values: &[Value]) {
        self.validate_exclusion_with(field, values, Options::new());
    }

    pub fn validate_exclusion_with(&mut self, field: &str, values: &[Value], opts: Options) {
        let inside = self
            .pending_value(field)
            .is_some_and(|value| values.contains(value));
        if inside {
            let template = opts.message_or(&messages().exclusion);
            self.push_rendered(field, &template, &[("values", list(values).as_str())], &opts);
        }
    }

    fn pending_value(&self, field: &str) -> Option<&Value> {
        match self.changes.get(field) {
            Some(Change::Value(value)) if !is_null(value) => Some(value),
            _ => None,
        }
    }

    fn pending_magnitude(&self, field: &str) -> Option<f64> {
        self.pending_value(field).and_then(magnitude)
    }

    fn push_rendered(&mut self, field: &str, template: &str, extra: &[(&str, &str)], opts: &Options) {
        let mut replacements = vec![("field", field)];
        replacements.extend_from_slice(extra);
        let message = render(template, &replacements);
        self.errors.push(Error::with_code(message, field, opts.error_code()));
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::String(Some(text)) => text.trim().is_empty(),
        other => is_null(other),
    }
}

/// Numeric value, or length for strings and bytes.
fn magnitude(value: &Value) -> Option<f64> {
    if let Some(integer) = integer_of(value) {
        return Some(integer as f64);
    }
    match value {
        Value::Float(Some(f)) => Some(f64::from(*f)),
        Value::Double(Some(d)) => Some(*d),
        Value::String(Some(text)) => Some(text.chars().count() as f64),
        Value::Bytes(Some(bytes)) => Some(bytes.len() as f64),
        Value::Decimal(_) => Decimal::from_value(value.clone()).and_then(|d| d.to_f64()),
        _ => None,
    }
}

fn list(values: &[Value]) -> String {
    values.iter().map(display).collect::<Vec<_>>().join(", ")
}

fn display(value: &Value) -> String {
    if let Some(integer) = integer_of(value) {
        return integer.to_string();
    }
    match value {
        Value::Bool(Some(b)) => b.to_string(),
        Value::Float(Some(f)) => f.to_string(),
        Value::Double(Some(d)) => d.to_string(),
        Value::String(Some(text)) => text.clone(),
        other => format!("{other:?}"),
    }
}
