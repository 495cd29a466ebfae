//! Coercion of raw JSON input into declared field types.
//!
//! Raw params arrive as `serde_json::Value`. Coercion is lenient in the way
//! form and query-string input needs: numbers and booleans may arrive as
//! strings, integral floats are accepted for integer fields, and timestamps
//! accept RFC 3339 strings or unix seconds.

use crate::value::field_type::integer_value;
use crate::value::FieldType;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_query::Value;
use serde_json::Value as JsonValue;
use uuid::Uuid;

/// Coerce a raw input value into `ty`.
///
/// Returns `None` when the input cannot represent a value of that type.
/// JSON `null` coerces to the typed null of any scalar type.
pub fn coerce(ty: FieldType, raw: &JsonValue) -> Option<Value> {
    if raw.is_null() {
        return ty.null_value();
    }

    match ty {
        FieldType::Bool => coerce_bool(raw).map(|b| Value::Bool(Some(b))),
        ty if ty.is_integer() => coerce_integer(raw).and_then(|i| integer_value(ty, i)),
        FieldType::Float => coerce_float(raw).map(|f| Value::Float(Some(f as f32))),
        FieldType::Double => coerce_float(raw).map(|f| Value::Double(Some(f))),
        FieldType::String => raw.as_str().map(|s| Value::String(Some(s.to_string()))),
        FieldType::Bytes => coerce_bytes(raw).map(|b| Value::Bytes(Some(b))),
        FieldType::Json => Some(Value::Json(Some(Box::new(raw.clone())))),
        FieldType::Timestamp => coerce_timestamp(raw).map(Value::from),
        FieldType::Uuid => raw
            .as_str()
            .and_then(|s| Uuid::parse_str(s.trim()).ok())
            .map(Value::from),
        FieldType::Decimal => coerce_decimal(raw).map(Value::from),
        _ => None,
    }
}

fn coerce_bool(raw: &JsonValue) -> Option<bool> {
    match raw {
        JsonValue::Bool(b) => Some(*b),
        JsonValue::Number(n) => match n.as_i64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        JsonValue::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "on" => Some(true),
            "false" | "0" | "off" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn coerce_integer(raw: &JsonValue) -> Option<i128> {
    match raw {
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i128::from(i))
            } else if let Some(u) = n.as_u64() {
                Some(i128::from(u))
            } else {
                let f = n.as_f64()?;
                (f.fract() == 0.0 && f.is_finite()).then_some(f as i128)
            }
        }
        JsonValue::String(s) => s.trim().parse::<i128>().ok(),
        _ => None,
    }
}

fn coerce_float(raw: &JsonValue) -> Option<f64> {
    match raw {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

fn coerce_bytes(raw: &JsonValue) -> Option<Vec<u8>> {
    match raw {
        JsonValue::String(s) => Some(s.as_bytes().to_vec()),
        JsonValue::Array(items) => items
            .iter()
            .map(|item| item.as_u64().and_then(|b| u8::try_from(b).ok()))
            .collect(),
        _ => None,
    }
}

fn coerce_timestamp(raw: &JsonValue) -> Option<DateTime<Utc>> {
    match raw {
        JsonValue::String(s) => DateTime::parse_from_rfc3339(s.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        JsonValue::Number(n) => n.as_i64().and_then(|secs| DateTime::from_timestamp(secs, 0)),
        _ => None,
    }
}

fn coerce_decimal(raw: &JsonValue) -> Option<Decimal> {
    match raw {
        JsonValue::String(s) => s.trim().parse::<Decimal>().ok(),
        JsonValue::Number(n) => n.to_string().parse::<Decimal>().ok(),
        _ => None,
    }
}
