//! `#[derive(Shape)]`: compile-time shape descriptors for recast records.
//!
//! Copyright (c) 2025 Recast Team
//! Licensed under the Apache-2.0 license

use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::meta::ParseNestedMeta;
use syn::{parse_macro_input, Data, DeriveInput, Fields, LitStr};

mod case;

use case::RenameRule;

/// Derive macro generating the shape descriptor and field participation
/// traits for a record type.
///
/// Emits a `&'static ShapeDef` field table plus impls of `Shape`, `Record`,
/// `IsEmpty`, `Walkable`, and `WireMerge`. Wire visibility and wire names
/// are read from the struct's serde attributes, the single source of truth
/// shared with the serializer:
///
/// - `#[serde(skip)]` / `#[serde(skip_serializing)]` mark a field excluded:
///   it never enters the wire form and is restored by structural copy.
/// - `#[serde(rename = "...")]` and container-level
///   `#[serde(rename_all = "...")]` set the wire name.
///
/// The struct must be non-generic with named fields, and every field type
/// must implement the participation traits (use `impl_scalar!` for opaque
/// leaf types).
///
/// # Example
///
/// ```ignore
/// #[derive(Shape, Serialize, Default, Clone)]
/// #[serde(rename_all = "camelCase")]
/// struct NodePool {
///     name: String,
///     node_count: i64,
///     #[serde(skip)]
///     etag: String,
/// }
/// ```
#[proc_macro_derive(Shape)]
pub fn derive_shape(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match derive_impl(&input) {
        Ok(tokens) => tokens,
        Err(e) => e.to_compile_error().into(),
    }
}

fn derive_impl(input: &DeriveInput) -> Result<TokenStream, syn::Error> {
    let name = &input.ident;
    let name_str = name.unraw().to_string();

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Shape does not support generic records",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    name,
                    "Shape only supports structs with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "Shape only supports structs",
            ))
        }
    };

    let rename_all = container_rename_rule(input)?;

    let mut getter_fns = Vec::new();
    let mut field_defs = Vec::new();
    let mut empty_checks = Vec::new();

    for (index, field) in fields.iter().enumerate() {
        let ident = field.ident.as_ref().ok_or_else(|| {
            syn::Error::new_spanned(field, "expected named field")
        })?;
        let declared = ident.unraw().to_string();

        let attrs = field_serde_attrs(field)?;
        let wire_name = match attrs.rename {
            Some(explicit) => explicit,
            None => match rename_all {
                Some(rule) => rule.apply(&declared),
                None => declared.clone(),
            },
        };
        let excluded = attrs.excluded;

        let get_fn = format_ident!("__recast_get_{index}");
        let get_mut_fn = format_ident!("__recast_get_mut_{index}");

        getter_fns.push(quote! {
            fn #get_fn(
                record: &dyn ::recast_core::Record,
            ) -> ::core::option::Option<&dyn ::recast_core::Field> {
                record
                    .as_any()
                    .downcast_ref::<#name>()
                    .map(|r| &r.#ident as &dyn ::recast_core::Field)
            }

            fn #get_mut_fn(
                record: &mut dyn ::recast_core::Record,
            ) -> ::core::option::Option<&mut dyn ::recast_core::Field> {
                record
                    .as_any_mut()
                    .downcast_mut::<#name>()
                    .map(|r| &mut r.#ident as &mut dyn ::recast_core::Field)
            }
        });

        field_defs.push(quote! {
            ::recast_core::FieldDef {
                name: #declared,
                wire_name: #wire_name,
                excluded: #excluded,
                get: #get_fn,
                get_mut: #get_mut_fn,
            }
        });

        empty_checks.push(quote! {
            ::recast_core::IsEmpty::is_empty_value(&self.#ident)
        });
    }

    let empty_body = if empty_checks.is_empty() {
        quote!(true)
    } else {
        quote!(#(#empty_checks)&&*)
    };

    let expanded = quote! {
        const _: () = {
            #(#getter_fns)*

            static __RECAST_FIELDS: &[::recast_core::FieldDef] = &[
                #(#field_defs),*
            ];

            static __RECAST_SHAPE: ::recast_core::ShapeDef = ::recast_core::ShapeDef {
                name: #name_str,
                fields: __RECAST_FIELDS,
            };

            impl ::recast_core::Shape for #name {
                fn shape_def() -> &'static ::recast_core::ShapeDef {
                    &__RECAST_SHAPE
                }
            }

            impl ::recast_core::Record for #name {
                fn shape(&self) -> &'static ::recast_core::ShapeDef {
                    &__RECAST_SHAPE
                }

                fn as_any(&self) -> &dyn ::core::any::Any {
                    self
                }

                fn as_any_mut(&mut self) -> &mut dyn ::core::any::Any {
                    self
                }
            }

            impl ::recast_core::IsEmpty for #name {
                fn is_empty_value(&self) -> bool {
                    #empty_body
                }
            }

            impl ::recast_core::Walkable for #name {
                fn as_record(&self) -> ::core::option::Option<&dyn ::recast_core::Record> {
                    ::core::option::Option::Some(self)
                }

                fn as_record_mut(
                    &mut self,
                ) -> ::core::option::Option<&mut dyn ::recast_core::Record> {
                    ::core::option::Option::Some(self)
                }
            }

            impl ::recast_core::WireMerge for #name {
                fn merge_wire(
                    &mut self,
                    value: &::recast_core::wire::Value,
                    path: &str,
                ) -> ::recast_core::Result<()> {
                    match value {
                        ::recast_core::wire::Value::Null => ::core::result::Result::Ok(()),
                        ::recast_core::wire::Value::Object(map) => {
                            ::recast_core::merge_record(self, map, path)
                        }
                        other => ::core::result::Result::Err(
                            ::recast_core::Error::type_mismatch(path, "object", other),
                        ),
                    }
                }
            }
        };
    };

    Ok(TokenStream::from(expanded))
}

/// Container-level `#[serde(rename_all = "...")]`, if any.
fn container_rename_rule(input: &DeriveInput) -> Result<Option<RenameRule>, syn::Error> {
    let mut rule = None;
    for attr in &input.attrs {
        if !attr.path().is_ident("serde") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename_all") {
                let lit: LitStr = meta.value()?.parse()?;
                rule = Some(RenameRule::parse(&lit.value()).ok_or_else(|| {
                    syn::Error::new(lit.span(), format!("unknown rename_all rule '{}'", lit.value()))
                })?);
                Ok(())
            } else if meta.path.is_ident("transparent") {
                Err(meta.error("transparent records have no wire-form object and are not supported"))
            } else {
                ignore_meta(&meta)
            }
        })?;
    }
    Ok(rule)
}

struct FieldAttrs {
    excluded: bool,
    rename: Option<String>,
}

/// Field-level serde attributes the descriptor cares about: exclusion
/// (`skip`, `skip_serializing`) and wire renames. Everything else serde
/// understands is consumed and ignored.
fn field_serde_attrs(field: &syn::Field) -> Result<FieldAttrs, syn::Error> {
    let mut attrs = FieldAttrs {
        excluded: false,
        rename: None,
    };
    for attr in &field.attrs {
        if !attr.path().is_ident("serde") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") || meta.path.is_ident("skip_serializing") {
                attrs.excluded = true;
                Ok(())
            } else if meta.path.is_ident("rename") {
                if meta.input.peek(syn::Token![=]) {
                    let lit: LitStr = meta.value()?.parse()?;
                    attrs.rename = Some(lit.value());
                    Ok(())
                } else {
                    // rename(serialize = "...", deserialize = "..."):
                    // the wire form only sees the serialize side.
                    meta.parse_nested_meta(|inner| {
                        let lit: LitStr = inner.value()?.parse()?;
                        if inner.path.is_ident("serialize") {
                            attrs.rename = Some(lit.value());
                        }
                        Ok(())
                    })
                }
            } else if meta.path.is_ident("flatten") {
                Err(meta.error("flattened fields have no stable wire name and are not supported"))
            } else {
                ignore_meta(&meta)
            }
        })?;
    }
    Ok(attrs)
}

/// Consume a serde meta item we don't interpret, whatever its form.
fn ignore_meta(meta: &ParseNestedMeta) -> Result<(), syn::Error> {
    if meta.input.peek(syn::Token![=]) {
        let _: syn::Expr = meta.value()?.parse()?;
    } else if meta.input.peek(syn::token::Paren) {
        let content;
        syn::parenthesized!(content in meta.input);
        let _: proc_macro2::TokenStream = content.parse()?;
    }
    Ok(())
}
