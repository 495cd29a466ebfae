//! Declared field types.
//!
//! `FieldType` is the type tag a record shape reports for each field. Scalar
//! tags correspond one-to-one with a `sea_query::Value` variant; association
//! tags carry the cardinality of the nested record(s) instead.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_query::Value;
use uuid::Uuid;

/// Cardinality of an association field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
    /// One-to-one: a single nested record
    One,
    /// One-to-many: an ordered collection of nested records
    Many,
}

/// Declared type of a record field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Bool,
    TinyInt,
    SmallInt,
    Int,
    BigInt,
    TinyUnsigned,
    SmallUnsigned,
    Unsigned,
    BigUnsigned,
    Float,
    Double,
    String,
    Bytes,
    Json,
    Timestamp,
    Uuid,
    Decimal,
    /// Nested record(s); never persisted as a plain column value
    Assoc(Cardinality),
}

impl FieldType {
    /// Report the type tag of a value's variant, if it is one we declare.
    pub fn of(value: &Value) -> Option<FieldType> {
        let ty = match value {
            Value::Bool(_) => FieldType::Bool,
            Value::TinyInt(_) => FieldType::TinyInt,
            Value::SmallInt(_) => FieldType::SmallInt,
            Value::Int(_) => FieldType::Int,
            Value::BigInt(_) => FieldType::BigInt,
            Value::TinyUnsigned(_) => FieldType::TinyUnsigned,
            Value::SmallUnsigned(_) => FieldType::SmallUnsigned,
            Value::Unsigned(_) => FieldType::Unsigned,
            Value::BigUnsigned(_) => FieldType::BigUnsigned,
            Value::Float(_) => FieldType::Float,
            Value::Double(_) => FieldType::Double,
            Value::String(_) => FieldType::String,
            Value::Bytes(_) => FieldType::Bytes,
            Value::Json(_) => FieldType::Json,
            Value::ChronoDateTimeUtc(_) => FieldType::Timestamp,
            Value::Uuid(_) => FieldType::Uuid,
            Value::Decimal(_) => FieldType::Decimal,
            _ => return None,
        };
        Some(ty)
    }

    /// Whether values of this type can be handed to the storage layer as a column value.
    #[must_use]
    pub fn is_persistable(&self) -> bool {
        !matches!(self, FieldType::Assoc(_))
    }

    /// Cardinality for association types, `None` for scalars.
    #[must_use]
    pub fn cardinality(&self) -> Option<Cardinality> {
        match self {
            FieldType::Assoc(cardinality) => Some(*cardinality),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            FieldType::TinyInt
                | FieldType::SmallInt
                | FieldType::Int
                | FieldType::BigInt
                | FieldType::TinyUnsigned
                | FieldType::SmallUnsigned
                | FieldType::Unsigned
                | FieldType::BigUnsigned
        )
    }

    /// The typed null of this field type.
    #[must_use]
    pub fn null_value(&self) -> Option<Value> {
        let value = match self {
            FieldType::Bool => Value::Bool(None),
            FieldType::TinyInt => Value::TinyInt(None),
            FieldType::SmallInt => Value::SmallInt(None),
            FieldType::Int => Value::Int(None),
            FieldType::BigInt => Value::BigInt(None),
            FieldType::TinyUnsigned => Value::TinyUnsigned(None),
            FieldType::SmallUnsigned => Value::SmallUnsigned(None),
            FieldType::Unsigned => Value::Unsigned(None),
            FieldType::BigUnsigned => Value::BigUnsigned(None),
            FieldType::Float => Value::Float(None),
            FieldType::Double => Value::Double(None),
            FieldType::String => Value::String(None),
            FieldType::Bytes => Value::Bytes(None),
            FieldType::Json => Value::Json(None),
            FieldType::Timestamp => Value::from(None::<DateTime<Utc>>),
            FieldType::Uuid => Value::from(None::<Uuid>),
            FieldType::Decimal => Value::from(None::<Decimal>),
            FieldType::Assoc(_) => return None,
        };
        Some(value)
    }

    /// The zero value of this field type (`0`, `""`, `false`, the epoch, ...).
    #[must_use]
    pub fn zero_value(&self) -> Option<Value> {
        let value = match self {
            FieldType::Bool => Value::Bool(Some(false)),
            FieldType::TinyInt => Value::TinyInt(Some(0)),
            FieldType::SmallInt => Value::SmallInt(Some(0)),
            FieldType::Int => Value::Int(Some(0)),
            FieldType::BigInt => Value::BigInt(Some(0)),
            FieldType::TinyUnsigned => Value::TinyUnsigned(Some(0)),
            FieldType::SmallUnsigned => Value::SmallUnsigned(Some(0)),
            FieldType::Unsigned => Value::Unsigned(Some(0)),
            FieldType::BigUnsigned => Value::BigUnsigned(Some(0)),
            FieldType::Float => Value::Float(Some(0.0)),
            FieldType::Double => Value::Double(Some(0.0)),
            FieldType::String => Value::String(Some(String::new())),
            FieldType::Bytes => Value::Bytes(Some(Vec::new())),
            FieldType::Json => Value::Json(Some(Box::new(serde_json::Value::Null))),
            FieldType::Timestamp => Value::from(DateTime::<Utc>::default()),
            FieldType::Uuid => Value::from(Uuid::nil()),
            FieldType::Decimal => Value::from(Decimal::ZERO),
            FieldType::Assoc(_) => return None,
        };
        Some(value)
    }

    /// Null or the zero value both count as zero.
    #[must_use]
    pub fn is_zero(&self, value: &Value) -> bool {
        if is_null(value) {
            return true;
        }
        self.zero_value().is_some_and(|zero| zero == *value)
    }

    /// Convert a value into this field type.
    ///
    /// Nulls of any variant become this type's typed null. Values already of
    /// this type pass through. Integers convert between integer widths when
    /// in range and widen into floating point or decimal; floats convert
    /// between widths when lossless. Everything else is rejected.
    #[must_use]
    pub fn convert(&self, value: Value) -> Option<Value> {
        if !self.is_persistable() {
            return None;
        }
        if is_null(&value) {
            return self.null_value();
        }
        let source = FieldType::of(&value)?;
        if source == *self {
            return Some(value);
        }

        if source.is_integer() {
            let integer = integer_of(&value)?;
            return match self {
                ty if ty.is_integer() => integer_value(*ty, integer),
                FieldType::Float => Some(Value::Float(Some(integer as f32))),
                FieldType::Double => Some(Value::Double(Some(integer as f64))),
                FieldType::Decimal => i64::try_from(integer)
                    .ok()
                    .map(|i| Value::from(Decimal::from(i))),
                _ => None,
            };
        }

        match (&value, self) {
            (Value::Float(Some(f)), FieldType::Double) => Some(Value::Double(Some(f64::from(*f)))),
            (Value::Double(Some(d)), FieldType::Float) => {
                let narrowed = *d as f32;
                (f64::from(narrowed) == *d).then_some(Value::Float(Some(narrowed)))
            }
            _ => None,
        }
    }
}

/// Whether the value is a typed null of any variant.
#[must_use]
pub fn is_null(value: &Value) -> bool {
    matches!(
        value,
        Value::Bool(None)
            | Value::TinyInt(None)
            | Value::SmallInt(None)
            | Value::Int(None)
            | Value::BigInt(None)
            | Value::TinyUnsigned(None)
            | Value::SmallUnsigned(None)
            | Value::Unsigned(None)
            | Value::BigUnsigned(None)
            | Value::Float(None)
            | Value::Double(None)
            | Value::String(None)
            | Value::Bytes(None)
            | Value::Json(None)
            | Value::ChronoDateTimeUtc(None)
            | Value::Uuid(None)
            | Value::Decimal(None)
    )
}

/// Identity values the storage engine generates itself (serial integers).
#[must_use]
pub fn is_auto_generated(value: &Value) -> bool {
    FieldType::of(value).is_some_and(|ty| ty.is_integer())
}

pub(crate) fn integer_of(value: &Value) -> Option<i128> {
    match value {
        Value::TinyInt(Some(v)) => Some(i128::from(*v)),
        Value::SmallInt(Some(v)) => Some(i128::from(*v)),
        Value::Int(Some(v)) => Some(i128::from(*v)),
        Value::BigInt(Some(v)) => Some(i128::from(*v)),
        Value::TinyUnsigned(Some(v)) => Some(i128::from(*v)),
        Value::SmallUnsigned(Some(v)) => Some(i128::from(*v)),
        Value::Unsigned(Some(v)) => Some(i128::from(*v)),
        Value::BigUnsigned(Some(v)) => Some(i128::from(*v)),
        _ => None,
    }
}

/// Build an integer value of the given width, rejecting out-of-range input.
pub(crate) fn integer_value(ty: FieldType, integer: i128) -> Option<Value> {
    let value = match ty {
        FieldType::TinyInt => Value::TinyInt(Some(i8::try_from(integer).ok()?)),
        FieldType::SmallInt => Value::SmallInt(Some(i16::try_from(integer).ok()?)),
        FieldType::Int => Value::Int(Some(i32::try_from(integer).ok()?)),
        FieldType::BigInt => Value::BigInt(Some(i64::try_from(integer).ok()?)),
        FieldType::TinyUnsigned => Value::TinyUnsigned(Some(u8::try_from(integer).ok()?)),
        FieldType::SmallUnsigned => Value::SmallUnsigned(Some(u16::try_from(integer).ok()?)),
        FieldType::Unsigned => Value::Unsigned(Some(u32::try_from(integer).ok()?)),
        FieldType::BigUnsigned => Value::BigUnsigned(Some(u64::try_from(integer).ok()?)),
        _ => return None,
    };
    Some(value)
}
