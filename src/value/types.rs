//! ValueType trait for type-safe field conversions
//!
//! The `ValueType` trait maps Rust field types to their corresponding
//! `sea_query::Value` variant and declared [`FieldType`]. `#[derive(Schema)]`
//! relies on it for every scalar field, so user-defined field types (enums
//! stored as strings, newtypes, ...) only need a `ValueType` impl to take
//! part in casting.
//!
//! ## Usage
//!
//! ```rust
//! use castguard::{FieldType, ValueType};
//! use sea_query::Value;
//!
//! let value: Value = 42i32.into_value();
//! assert!(matches!(value, Value::Int(Some(42))));
//! assert_eq!(<Option<i32> as ValueType>::field_type(), FieldType::Int);
//! ```
//!
//! ## Implementation
//!
//! The trait is implemented for:
//!
//! - Integer types: `i8`, `i16`, `i32`, `i64`, `u8`, `u16`, `u32`, `u64`
//! - Floating point: `f32`, `f64`
//! - Boolean: `bool`
//! - String: `String`
//! - Binary: `Vec<u8>`
//! - JSON: `serde_json::Value`
//! - `chrono::DateTime<Utc>`, `uuid::Uuid`, `rust_decimal::Decimal`
//! - `Option<T>` for all above types (reported as nullable)

use crate::value::FieldType;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_query::Value;
use uuid::Uuid;

/// Trait for mapping Rust field types to `sea_query::Value` and a declared [`FieldType`].
pub trait ValueType: Sized {
    /// Convert this value into a `sea_query::Value`.
    fn into_value(self) -> Value;

    /// Convert a `sea_query::Value` into this type, if possible.
    ///
    /// Returns `None` if the value doesn't match the expected variant or is null.
    fn from_value(value: Value) -> Option<Self>;

    /// Return the null variant for this type.
    fn null_value() -> Value;

    /// The declared type reported by schema introspection.
    fn field_type() -> FieldType;

    /// Whether a field of this type may hold null.
    fn nullable() -> bool {
        false
    }

    /// Equality used when diffing a cast value against the baseline.
    ///
    /// Structural by default; types with a looser notion of sameness override it.
    fn values_equal(a: &Value, b: &Value) -> bool {
        a == b
    }
}

macro_rules! impl_value_type {
    ($type:ty, $variant:ident, $field_type:ident) => {
        impl ValueType for $type {
            fn into_value(self) -> Value {
                Value::$variant(Some(self))
            }

            fn from_value(value: Value) -> Option<Self> {
                match value {
                    Value::$variant(Some(v)) => Some(v),
                    _ => None,
                }
            }

            fn null_value() -> Value {
                Value::$variant(None)
            }

            fn field_type() -> FieldType {
                FieldType::$field_type
            }
        }
    };
}

impl_value_type!(i8, TinyInt, TinyInt);
impl_value_type!(i16, SmallInt, SmallInt);
impl_value_type!(i32, Int, Int);
impl_value_type!(i64, BigInt, BigInt);
impl_value_type!(u8, TinyUnsigned, TinyUnsigned);
impl_value_type!(u16, SmallUnsigned, SmallUnsigned);
impl_value_type!(u32, Unsigned, Unsigned);
impl_value_type!(u64, BigUnsigned, BigUnsigned);
impl_value_type!(f32, Float, Float);
impl_value_type!(f64, Double, Double);
impl_value_type!(bool, Bool, Bool);
impl_value_type!(String, String, String);
impl_value_type!(Vec<u8>, Bytes, Bytes);

impl ValueType for serde_json::Value {
    fn into_value(self) -> Value {
        Value::Json(Some(Box::new(self)))
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Json(Some(v)) => Some(*v),
            _ => None,
        }
    }

    fn null_value() -> Value {
        Value::Json(None)
    }

    fn field_type() -> FieldType {
        FieldType::Json
    }
}

// chrono/uuid/decimal variants go through SeaQuery's own conversions so the
// payload representation stays SeaQuery's business.
macro_rules! impl_value_type_via_sea_query {
    ($type:ty, $field_type:ident) => {
        impl ValueType for $type {
            fn into_value(self) -> Value {
                Value::from(self)
            }

            fn from_value(value: Value) -> Option<Self> {
                <$type as sea_query::ValueType>::try_from(value).ok()
            }

            fn null_value() -> Value {
                Value::from(None::<$type>)
            }

            fn field_type() -> FieldType {
                FieldType::$field_type
            }
        }
    };
}

impl_value_type_via_sea_query!(DateTime<Utc>, Timestamp);
impl_value_type_via_sea_query!(Uuid, Uuid);
impl_value_type_via_sea_query!(Decimal, Decimal);

impl<T: ValueType> ValueType for Option<T> {
    fn into_value(self) -> Value {
        match self {
            Some(v) => T::into_value(v),
            None => T::null_value(),
        }
    }

    fn from_value(value: Value) -> Option<Self> {
        if value == T::null_value() {
            return Some(None);
        }
        T::from_value(value).map(Some)
    }

    fn null_value() -> Value {
        T::null_value()
    }

    fn field_type() -> FieldType {
        T::field_type()
    }

    fn nullable() -> bool {
        true
    }

    fn values_equal(a: &Value, b: &Value) -> bool {
        T::values_equal(a, b)
    }
}
