//! Syntactic classification of association field types
//!
//! Association slots are generated per wrapper shape, so the wrappers are
//! recognised by their last path segment (`Option`, `Box`, `Vec`).

use syn::{GenericArgument, PathArguments, Type, TypePath};

/// Wrapper shape of a `#[has_one]` field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OneShape {
    /// `T`
    Plain,
    /// `Box<T>`
    Boxed,
    /// `Option<T>`
    Optional,
    /// `Option<Box<T>>`
    OptionalBoxed,
}

/// Wrapper shape of a `#[has_many]` field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManyShape {
    /// `Vec<T>`
    Plain,
    /// `Vec<Box<T>>`
    Boxed,
}

/// The single type argument of `Wrapper<T>` when `ty` is that wrapper.
pub fn wrapped<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    let Type::Path(TypePath { qself: None, path }) = ty else {
        return None;
    };
    let segment = path.segments.last()?;
    if segment.ident != wrapper {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first()? {
        GenericArgument::Type(inner) if args.args.len() == 1 => Some(inner),
        _ => None,
    }
}

pub fn one_shape(ty: &Type) -> OneShape {
    match wrapped(ty, "Option") {
        Some(inner) if wrapped(inner, "Box").is_some() => OneShape::OptionalBoxed,
        Some(_) => OneShape::Optional,
        None if wrapped(ty, "Box").is_some() => OneShape::Boxed,
        None => OneShape::Plain,
    }
}

/// Shape of a `#[has_many]` field; `None` when the field is not a `Vec`.
pub fn many_shape(ty: &Type) -> Option<ManyShape> {
    let element = wrapped(ty, "Vec")?;
    if wrapped(element, "Box").is_some() {
        Some(ManyShape::Boxed)
    } else {
        Some(ManyShape::Plain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn test_one_shapes() {
        assert_eq!(one_shape(&parse_quote!(Address)), OneShape::Plain);
        assert_eq!(one_shape(&parse_quote!(Box<Address>)), OneShape::Boxed);
        assert_eq!(one_shape(&parse_quote!(Option<Address>)), OneShape::Optional);
        assert_eq!(
            one_shape(&parse_quote!(std::option::Option<Box<Address>>)),
            OneShape::OptionalBoxed
        );
    }

    #[test]
    fn test_many_shapes() {
        assert_eq!(many_shape(&parse_quote!(Vec<Item>)), Some(ManyShape::Plain));
        assert_eq!(many_shape(&parse_quote!(Vec<Box<Item>>)), Some(ManyShape::Boxed));
        assert_eq!(many_shape(&parse_quote!(Option<Vec<Item>>)), None);
    }

    #[test]
    fn test_wrapped_inner() {
        let ty: Type = parse_quote!(Option<i32>);
        let inner = wrapped(&ty, "Option").unwrap();
        assert_eq!(quote::quote!(#inner).to_string(), "i32");
        assert!(wrapped(&ty, "Vec").is_none());
    }
}
