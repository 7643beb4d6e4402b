//! Derive macro for the optguard options library
//!
//! This crate provides `#[derive(Options)]`, which implements
//! `optguard::Options` and attaches the configuration key a type binds from.
//!
//! # Usage
//!
//! ```text
//! use optguard::Options;
//!
//! #[derive(Options, Default, Serialize, Deserialize)]
//! #[options(key = "MyApp:Settings:Database")]
//! struct DatabaseOptions {
//!     host: String,
//!     port: u16,
//! }
//! ```

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Attribute, DeriveInput, Expr, Lit, LitStr, Meta};

/// Derive macro for generating `Options` implementations.
///
/// # Attributes
///
/// ## Container attributes (`#[options(...)]`)
/// - `key = "Section:Path"` - Configuration key to bind from
/// - `section = "Section:Path"` - Alias for `key`
///
/// Without a key the type binds from the section named exactly like the type.
#[proc_macro_derive(Options, attributes(options))]
pub fn derive_options(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let key = match parse_container_attrs(&input.attrs) {
        Ok(key) => key,
        Err(err) => return err.to_compile_error().into(),
    };

    let name = &input.ident;
    let type_name = name.to_string();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let key_const = key.map(|key| {
        quote! {
            const KEY: ::core::option::Option<&'static str> = ::core::option::Option::Some(#key);
        }
    });

    let expanded = quote! {
        impl #impl_generics ::optguard::Options for #name #ty_generics #where_clause {
            #key_const

            fn type_name() -> &'static str {
                #type_name
            }
        }
    };

    TokenStream::from(expanded)
}

/// Read the key from `#[options(key = "...")]` or `#[options(section = "...")]`
fn parse_container_attrs(attrs: &[Attribute]) -> syn::Result<Option<LitStr>> {
    let mut key: Option<LitStr> = None;

    for attr in attrs {
        if !attr.path().is_ident("options") {
            continue;
        }

        let nested = attr.parse_args_with(
            syn::punctuated::Punctuated::<Meta, syn::Token![,]>::parse_terminated,
        )?;

        for meta in nested {
            let Meta::NameValue(nv) = &meta else {
                return Err(syn::Error::new_spanned(
                    &meta,
                    "expected `key = \"...\"`, for example `#[options(key = \"MyApp:Database\")]`",
                ));
            };

            if !(nv.path.is_ident("key") || nv.path.is_ident("section")) {
                return Err(syn::Error::new_spanned(
                    &nv.path,
                    "unknown options attribute, expected `key` or `section`",
                ));
            }

            let value = match &nv.value {
                Expr::Lit(lit) => match &lit.lit {
                    Lit::Str(s) => s.clone(),
                    other => {
                        return Err(syn::Error::new_spanned(
                            other,
                            "configuration key must be a string literal",
                        ));
                    }
                },
                other => {
                    return Err(syn::Error::new_spanned(
                        other,
                        "configuration key must be a string literal",
                    ));
                }
            };

            if value.value().trim().is_empty() {
                return Err(syn::Error::new_spanned(
                    &value,
                    "configuration key must not be empty",
                ));
            }

            if key.is_some() {
                return Err(syn::Error::new_spanned(
                    &nv.path,
                    "configuration key specified more than once",
                ));
            }
            key = Some(value);
        }
    }

    Ok(key)
}
