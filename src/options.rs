//! Per-operation options.
//!
//! Every changeset operation that can record an error or declare a
//! constraint accepts [`Options`]. Unset options fall back to the
//! process-wide defaults in [`crate::config`].

use serde_json::Value as JsonValue;

/// Options for casting, putting, validating and constraint declarations
///
/// # Example
///
/// ```
/// use castguard::Options;
///
/// let opts = Options::new()
///     .message("{field} is taken")
///     .name("users_email_key")
///     .exact(true);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Options {
    message: Option<String>,
    code: i32,
    name: Option<String>,
    exact: bool,
    required: bool,
    empty_values: Option<Vec<JsonValue>>,
}

impl Options {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Error message template; `{field}` is replaced by the field name.
    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Application code attached to produced errors.
    #[must_use]
    pub fn code(mut self, code: i32) -> Self {
        self.code = code;
        self
    }

    /// Constraint name to match; defaults to the field name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Match the constraint name exactly instead of as a substring.
    #[must_use]
    pub fn exact(mut self, exact: bool) -> Self {
        self.exact = exact;
        self
    }

    /// Report an error when `cast_assoc` input lacks the association.
    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Raw values cast as null; defaults to the empty string.
    #[must_use]
    pub fn empty_values(mut self, values: Vec<JsonValue>) -> Self {
        self.empty_values = Some(values);
        self
    }

    pub(crate) fn message_or(&self, default: &str) -> String {
        self.message.clone().unwrap_or_else(|| default.to_string())
    }

    pub(crate) fn error_code(&self) -> i32 {
        self.code
    }

    pub(crate) fn constraint_name(&self, field: &str) -> String {
        self.name.clone().unwrap_or_else(|| field.to_string())
    }

    pub(crate) fn is_exact(&self) -> bool {
        self.exact
    }

    pub(crate) fn is_required(&self) -> bool {
        self.required
    }

    pub(crate) fn is_empty_value(&self, raw: &JsonValue) -> bool {
        match &self.empty_values {
            Some(values) => values.contains(raw),
            None => raw.as_str() == Some(""),
        }
    }
}

/// Render a message template, replacing `{key}` placeholders.
pub(crate) fn render(template: &str, replacements: &[(&str, &str)]) -> String {
    replacements
        .iter()
        .fold(template.to_string(), |message, (key, value)| {
            message.replace(&format!("{{{key}}}"), value)
        })
}
