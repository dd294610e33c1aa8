//! Derive macro implementation.
//!
//! This module contains the core logic for expanding `#[derive(Configure)]`.

use proc_macro2::TokenStream;
use quote::quote;
use syn::DeriveInput;

use crate::parse::{ConfigField, ConfigStruct};

/// Expands `#[derive(Configure)]`.
///
/// This function performs the main transformation:
/// 1. Parse the structure and its field attributes
/// 2. Generate a `Configure` impl visiting each field in order
/// 3. Generate a `Field` impl so the structure can be nested
pub fn expand_configure(input: TokenStream) -> syn::Result<TokenStream> {
    let input: DeriveInput = syn::parse2(input)?;
    let config = ConfigStruct::parse(input)?;

    Ok(generate_impls(&config))
}

fn generate_impls(config: &ConfigStruct) -> TokenStream {
    let name = &config.ident;
    let visits = config.fields.iter().filter_map(generate_visit);

    // Field bounds only matter when the field types can mention parameters.
    let mut generics = config.generics.clone();
    if !config.generics.params.is_empty() {
        let where_clause = generics.make_where_clause();
        for field in config.fields.iter().filter(|f| !f.attrs.skip) {
            let ty = &field.ty;
            if field.attrs.embed {
                where_clause.predicates.push(syn::parse_quote!(#ty: ::qcl::Configure));
            } else {
                where_clause.predicates.push(syn::parse_quote!(#ty: ::qcl::Field));
            }
        }
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    quote! {
        #[automatically_derived]
        impl #impl_generics ::qcl::Configure for #name #ty_generics #where_clause {
            fn visit_fields(
                &mut self,
                walker: &mut ::qcl::Walker<'_>,
            ) -> ::core::result::Result<(), ::qcl::ConfigError> {
                #(#visits)*
                ::core::result::Result::Ok(())
            }
        }

        #[automatically_derived]
        impl #impl_generics ::qcl::Field for #name #ty_generics #where_clause {
            fn shape() -> ::qcl::Shape {
                ::qcl::Shape::Struct(::core::stringify!(#name))
            }

            fn walk(
                &mut self,
                walker: &mut ::qcl::Walker<'_>,
            ) -> ::core::result::Result<(), ::qcl::ConfigError> {
                walker.nested(self)
            }

            fn set(
                &mut self,
                _raw: &str,
                _separator: &str,
            ) -> ::core::result::Result<(), ::qcl::ConfigError> {
                ::core::result::Result::Err(::qcl::ConfigError::unsupported_type(
                    <Self as ::qcl::Field>::shape(),
                ))
            }

            fn as_configure(&mut self) -> ::core::option::Option<&mut dyn ::qcl::Configure> {
                ::core::option::Option::Some(self)
            }
        }
    }
}

fn generate_visit(field: &ConfigField) -> Option<TokenStream> {
    if field.attrs.skip {
        return None;
    }

    let ident = &field.ident;
    if field.attrs.embed {
        return Some(quote! {
            walker.embed(&mut self.#ident)?;
        });
    }

    let name = field.name();
    let keys = field.attrs.tags.iter().map(|(k, _)| k);
    let values = field.attrs.tags.iter().map(|(_, v)| v);
    Some(quote! {
        walker.field(
            &::qcl::FieldMeta::new(#name, &[#((#keys, #values)),*]),
            &mut self.#ident,
        )?;
    })
}
