//! Field-scoped changeset errors.
//!
//! Casting failures, validation failures and translated constraint
//! violations all surface as [`Error`]: a message tied to a field, with an
//! optional application code and the infrastructure error it was derived from.

use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Boxed infrastructure error as produced by a persistence layer.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A field error accumulated on a changeset
#[derive(Clone, Serialize)]
pub struct Error {
    pub message: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub field: String,
    #[serde(skip_serializing_if = "is_zero_code")]
    pub code: i32,
    #[serde(skip)]
    cause: Option<Arc<dyn std::error::Error + Send + Sync + 'static>>,
}

fn is_zero_code(code: &i32) -> bool {
    *code == 0
}

impl Error {
    /// Create an error with field and message.
    pub fn new(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::with_code(message, field, 0)
    }

    /// Create an error with an application code.
    pub fn with_code(message: impl Into<String>, field: impl Into<String>, code: i32) -> Self {
        Self {
            message: message.into(),
            field: field.into(),
            code,
            cause: None,
        }
    }

    /// Attach the error this one was translated from.
    #[must_use]
    pub fn caused_by(mut self, cause: BoxError) -> Self {
        self.cause = Some(Arc::from(cause));
        self
    }

    /// The wrapped infrastructure error, if any.
    pub fn cause(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.cause.as_deref()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Error")
            .field("message", &self.message)
            .field("field", &self.field)
            .field("code", &self.code)
            .field("cause", &self.cause.as_ref().map(|c| c.to_string()))
            .finish()
    }
}

// Errors compare by message, same as they print.
impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.message == other.message
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn std::error::Error + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_display_is_message() {
        let err = Error::new("field1 is required", "field1");
        assert_eq!(err.to_string(), "field1 is required");
        assert_eq!(err.field, "field1");
        assert_eq!(err.code, 0);
    }

    #[test]
    fn test_source_is_cause() {
        let cause: BoxError = "connection reset".into();
        let err = Error::new("slug has already been taken", "slug").caused_by(cause);

        assert_eq!(err.source().map(|s| s.to_string()), Some("connection reset".to_string()));
        assert!(err.cause().is_some());
        assert!(Error::new("x", "y").source().is_none());
    }

    #[test]
    fn test_serialize_skips_empty_parts() {
        let json = serde_json::to_value(Error::new("invalid", "")).unwrap();
        assert_eq!(json, serde_json::json!({"message": "invalid"}));

        let json = serde_json::to_value(Error::with_code("taken", "slug", 409)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"message": "taken", "field": "slug", "code": 409})
        );
    }
}
