//! Parsing utilities for the derive macro.
//!
//! This module provides parsing for `#[qcl(...)]` field attributes and for the
//! structure the derive is applied to.

use syn::{
    ext::IdentExt,
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    Attribute, Data, DeriveInput, Expr, ExprLit, Fields, Generics, Ident, Lit, Meta, Token, Type,
};

/// Parsed `#[qcl(...)]` field attributes.
#[derive(Debug, Default)]
pub struct FieldAttrs {
    /// Naming overrides as `(tag key, tag text)`, in written order.
    pub tags: Vec<(String, String)>,
    /// Walk the field's own fields at the parent's level.
    pub embed: bool,
    /// Leave the field out of every source.
    pub skip: bool,
}

impl Parse for FieldAttrs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut attrs = Self::default();
        let meta_list: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in meta_list {
            match meta {
                Meta::Path(path) => {
                    let ident = path
                        .get_ident()
                        .ok_or_else(|| syn::Error::new(path.span(), "expected identifier"))?;
                    match ident.to_string().as_str() {
                        "embed" => attrs.embed = true,
                        "skip" => attrs.skip = true,
                        other => {
                            return Err(syn::Error::new(
                                ident.span(),
                                format!("unknown flag: {other}, expected `embed` or `skip`"),
                            ))
                        }
                    }
                }
                Meta::NameValue(nv) => {
                    let key = nv
                        .path
                        .get_ident()
                        .ok_or_else(|| syn::Error::new(nv.path.span(), "expected identifier"))?
                        .to_string();

                    let value = match &nv.value {
                        Expr::Lit(ExprLit {
                            lit: Lit::Str(s), ..
                        }) => s.value(),
                        _ => {
                            return Err(syn::Error::new(
                                nv.value.span(),
                                "expected string literal",
                            ))
                        }
                    };

                    if attrs.tags.iter().any(|(k, _)| *k == key) {
                        return Err(syn::Error::new(
                            nv.path.span(),
                            format!("duplicate name override: {key}"),
                        ));
                    }
                    attrs.tags.push((key, value));
                }
                Meta::List(_) => return Err(syn::Error::new(meta.span(), "expected name = value")),
            }
        }

        Ok(attrs)
    }
}

impl FieldAttrs {
    /// Collects every `#[qcl(...)]` attribute on a field.
    pub fn from_attributes(attributes: &[Attribute]) -> syn::Result<Self> {
        let mut attrs = Self::default();
        for attr in attributes.iter().filter(|a| a.path().is_ident("qcl")) {
            let parsed: Self = attr.parse_args()?;
            for (key, value) in parsed.tags {
                if attrs.tags.iter().any(|(k, _)| *k == key) {
                    return Err(syn::Error::new(
                        attr.span(),
                        format!("duplicate name override: {key}"),
                    ));
                }
                attrs.tags.push((key, value));
            }
            attrs.embed |= parsed.embed;
            attrs.skip |= parsed.skip;
        }

        if attrs.embed && attrs.skip {
            return Err(syn::Error::new(
                attributes.first().map_or_else(proc_macro2::Span::call_site, Spanned::span),
                "a field cannot be both `embed` and `skip`",
            ));
        }
        if attrs.embed && !attrs.tags.is_empty() {
            return Err(syn::Error::new(
                attributes.first().map_or_else(proc_macro2::Span::call_site, Spanned::span),
                "embedded fields have no name of their own to override",
            ));
        }
        Ok(attrs)
    }
}

/// A parsed structure field.
#[derive(Debug)]
pub struct ConfigField {
    /// The field identifier.
    pub ident: Ident,
    /// The field type.
    pub ty: Type,
    /// Parsed `#[qcl(...)]` attributes.
    pub attrs: FieldAttrs,
}

impl ConfigField {
    /// The identifier as written, without any `r#` prefix.
    pub fn name(&self) -> String {
        self.ident.unraw().to_string()
    }
}

/// Parsed structure information.
#[derive(Debug)]
pub struct ConfigStruct {
    /// The structure name.
    pub ident: Ident,
    /// The structure generics.
    pub generics: Generics,
    /// The fields in declaration order.
    pub fields: Vec<ConfigField>,
}

impl ConfigStruct {
    /// Parses a `DeriveInput` into a `ConfigStruct`.
    pub fn parse(input: DeriveInput) -> syn::Result<Self> {
        let data = match input.data {
            Data::Struct(data) => data,
            Data::Enum(e) => {
                return Err(syn::Error::new(
                    e.enum_token.span,
                    "Configure can only be derived for structs with named fields",
                ))
            }
            Data::Union(u) => {
                return Err(syn::Error::new(
                    u.union_token.span,
                    "Configure can only be derived for structs with named fields",
                ))
            }
        };

        let named = match data.fields {
            Fields::Named(named) => named,
            other => {
                return Err(syn::Error::new(
                    other.span(),
                    "Configure can only be derived for structs with named fields",
                ))
            }
        };

        let fields = named
            .named
            .into_iter()
            .map(|field| {
                let attrs = FieldAttrs::from_attributes(&field.attrs)?;
                let ident = field
                    .ident
                    .ok_or_else(|| syn::Error::new(field.ty.span(), "expected named field"))?;
                Ok(ConfigField {
                    ident,
                    ty: field.ty,
                    attrs,
                })
            })
            .collect::<syn::Result<Vec<_>>>()?;

        Ok(Self {
            ident: input.ident,
            generics: input.generics,
            fields,
        })
    }
}
