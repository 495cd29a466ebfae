//! Derive macro for the `Schema` trait
//!
//! Generates the field descriptor list and the positional accessors the
//! schema introspector and the mutation composer use. Positions are indexes
//! into the included fields, in declaration order.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, Ident, Type};

use crate::attributes::{parse_field_attributes, Association};
use crate::type_shape::{many_shape, one_shape, ManyShape, OneShape};
use crate::utils;

/// One included field
struct SchemaField<'a> {
    member: &'a Ident,
    ty: &'a Type,
    name: String,
    association: Option<Association>,
}

/// Generate the Schema implementation for a struct
pub fn derive_schema(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(syn::DataStruct {
            fields: Fields::Named(fields),
            ..
        }) => &fields.named,
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Schema can only be derived for structs with named fields",
            ));
        }
    };

    let mut included = Vec::new();
    let mut primary_key: Option<String> = None;

    for field in fields {
        let attrs = parse_field_attributes(field)?;
        if !attrs.is_included() {
            continue;
        }
        let Some(member) = field.ident.as_ref() else {
            continue;
        };
        let name = attrs
            .column_name
            .clone()
            .unwrap_or_else(|| utils::field_name(member));

        if attrs.is_primary_key {
            if primary_key.is_some() {
                return Err(syn::Error::new_spanned(
                    field,
                    "Schema supports a single #[primary_key] field",
                ));
            }
            primary_key = Some(name.clone());
        }
        if attrs.association == Some(Association::HasMany) && many_shape(&field.ty).is_none() {
            return Err(syn::Error::new_spanned(
                &field.ty,
                "#[has_many] fields must be Vec<T> or Vec<Box<T>>",
            ));
        }

        included.push(SchemaField {
            member,
            ty: &field.ty,
            name,
            association: attrs.association,
        });
    }

    let descriptors = included.iter().map(describe_field);
    let readers = included.iter().enumerate().map(|(position, field)| {
        let body = read_field(field);
        quote! { #position => #body, }
    });
    let writers = included
        .iter()
        .enumerate()
        .filter(|(_, field)| field.association.is_none())
        .map(|(position, field)| {
            let member = field.member;
            let ty = field.ty;
            quote! {
                #position => match <#ty as ::castguard::ValueType>::from_value(::std::clone::Clone::clone(value)) {
                    ::std::option::Option::Some(v) => {
                        self.#member = v;
                        true
                    }
                    ::std::option::Option::None => false,
                },
            }
        });
    let one_slots = included
        .iter()
        .enumerate()
        .filter(|(_, field)| field.association == Some(Association::HasOne))
        .map(|(position, field)| {
            let body = child_slot(field);
            quote! { #position => ::std::option::Option::Some(#body), }
        });
    let many_slots = included
        .iter()
        .enumerate()
        .filter(|(_, field)| field.association == Some(Association::HasMany))
        .map(|(position, field)| {
            let member = field.member;
            let collection = match many_shape(field.ty) {
                Some(ManyShape::Boxed) => quote! { ::castguard::BoxedVecCollection::new(&mut self.#member) },
                _ => quote! { ::castguard::VecCollection::new(&mut self.#member) },
            };
            quote! { #position => ::std::option::Option::Some(::std::boxed::Box::new(#collection)), }
        });

    let primary_key_fn = primary_key.map(|name| {
        quote! {
            fn primary_key() -> &'static str {
                #name
            }
        }
    });

    Ok(quote! {
        impl #impl_generics ::castguard::Schema for #struct_name #ty_generics #where_clause {
            fn describe() -> ::std::vec::Vec<::castguard::FieldDescriptor> {
                ::std::vec![#(#descriptors),*]
            }

            #primary_key_fn

            fn read_field(&self, position: usize) -> ::castguard::FieldValue<'_> {
                match position {
                    #(#readers)*
                    _ => ::castguard::FieldValue::Absent,
                }
            }

            #[allow(unused_variables)]
            fn write_field(&mut self, position: usize, value: &::castguard::Value) -> bool {
                match position {
                    #(#writers)*
                    _ => false,
                }
            }

            fn child_mut(&mut self, position: usize) -> ::std::option::Option<&mut dyn ::castguard::Document> {
                match position {
                    #(#one_slots)*
                    _ => ::std::option::Option::None,
                }
            }

            fn children_mut(
                &mut self,
                position: usize,
            ) -> ::std::option::Option<::std::boxed::Box<dyn ::castguard::Collection + '_>> {
                match position {
                    #(#many_slots)*
                    _ => ::std::option::Option::None,
                }
            }
        }
    })
}

fn describe_field(field: &SchemaField<'_>) -> TokenStream2 {
    let name = &field.name;
    let member = field.member.to_string();
    let ty = field.ty;
    match field.association {
        None => quote! {
            ::castguard::FieldDescriptor::scalar::<#ty>(#name, #member)
        },
        Some(Association::HasOne) => quote! {
            ::castguard::FieldDescriptor::association(#name, #member, ::castguard::Cardinality::One)
        },
        Some(Association::HasMany) => quote! {
            ::castguard::FieldDescriptor::association(#name, #member, ::castguard::Cardinality::Many)
        },
    }
}

fn read_field(field: &SchemaField<'_>) -> TokenStream2 {
    let member = field.member;
    match field.association {
        None => quote! {
            ::castguard::FieldValue::Scalar(::castguard::ValueType::into_value(
                ::std::clone::Clone::clone(&self.#member),
            ))
        },
        Some(Association::HasOne) => {
            let record = match one_shape(field.ty) {
                OneShape::Plain => quote! {
                    ::std::option::Option::Some(&self.#member as &dyn ::castguard::Record)
                },
                OneShape::Boxed => quote! {
                    ::std::option::Option::Some(&*self.#member as &dyn ::castguard::Record)
                },
                OneShape::Optional => quote! {
                    self.#member.as_ref().map(|record| record as &dyn ::castguard::Record)
                },
                OneShape::OptionalBoxed => quote! {
                    self.#member.as_deref().map(|record| record as &dyn ::castguard::Record)
                },
            };
            quote! { ::castguard::FieldValue::One(#record) }
        }
        Some(Association::HasMany) => {
            let record = match many_shape(field.ty) {
                Some(ManyShape::Boxed) => quote! { &**record as &dyn ::castguard::Record },
                _ => quote! { record as &dyn ::castguard::Record },
            };
            quote! {
                ::castguard::FieldValue::Many(self.#member.iter().map(|record| #record).collect())
            }
        }
    }
}

/// Mutable one-to-one slot, creating a default record for empty optionals
fn child_slot(field: &SchemaField<'_>) -> TokenStream2 {
    let member = field.member;
    match one_shape(field.ty) {
        OneShape::Plain => quote! { &mut self.#member },
        OneShape::Boxed => quote! { &mut *self.#member },
        OneShape::Optional => quote! {
            self.#member.get_or_insert_with(::std::default::Default::default)
        },
        OneShape::OptionalBoxed => quote! {
            &mut **self.#member.get_or_insert_with(::std::default::Default::default)
        },
    }
}
