//! Utility functions for code generation

use syn::ext::IdentExt;
use syn::Ident;

/// Convert string to snake_case
pub fn snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() && i > 0 && !result.ends_with('_') {
            result.push('_');
        }
        result.extend(c.to_lowercase());
    }
    result
}

/// Default field name of a struct member: snake_case without the `r#` prefix
pub fn field_name(ident: &Ident) -> String {
    snake_case(&ident.unraw().to_string())
}
