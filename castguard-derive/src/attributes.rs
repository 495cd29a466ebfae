//! Attribute parsing utilities

use syn::{ExprLit, Field, Lit};

/// Name override that excludes a field
pub const EXCLUDED: &str = "-";

/// Association declared on a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Association {
    HasOne,
    HasMany,
}

/// Schema attributes of one field
#[derive(Debug, Default)]
pub struct FieldAttributes {
    pub is_primary_key: bool,
    pub column_name: Option<String>,
    pub is_ignored: bool,
    pub association: Option<Association>,
}

impl FieldAttributes {
    /// Whether the field takes part in the schema at all.
    pub fn is_included(&self) -> bool {
        !self.is_ignored && self.column_name.as_deref() != Some(EXCLUDED)
    }
}

/// Parse all schema attributes from a field
pub fn parse_field_attributes(field: &Field) -> syn::Result<FieldAttributes> {
    let mut attrs = FieldAttributes::default();

    for attr in &field.attrs {
        if attr.path().is_ident("primary_key") {
            attrs.is_primary_key = true;
        } else if attr.path().is_ident("column_name") {
            let meta = attr.meta.require_name_value()?;
            if let syn::Expr::Lit(ExprLit {
                lit: Lit::Str(s), ..
            }) = &meta.value
            {
                attrs.column_name = Some(s.value());
            } else {
                return Err(syn::Error::new_spanned(
                    &meta.value,
                    "column_name expects a string literal",
                ));
            }
        } else if attr.path().is_ident("ignore") || attr.path().is_ident("skip") {
            attrs.is_ignored = true;
        } else if attr.path().is_ident("has_one") || attr.path().is_ident("has_many") {
            let association = if attr.path().is_ident("has_one") {
                Association::HasOne
            } else {
                Association::HasMany
            };
            if attrs.association.is_some_and(|existing| existing != association) {
                return Err(syn::Error::new_spanned(
                    attr,
                    "a field cannot be both #[has_one] and #[has_many]",
                ));
            }
            attrs.association = Some(association);
        }
    }

    if attrs.is_primary_key && attrs.association.is_some() {
        return Err(syn::Error::new_spanned(
            field,
            "an association cannot be the primary key",
        ));
    }

    Ok(attrs)
}
