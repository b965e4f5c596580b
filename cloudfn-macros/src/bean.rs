//! Bean-related macros.
//!
//! This module contains:
//! - `#[derive(Bean)]` - Derive macro for plain, untagged beans

use proc_macro::TokenStream;
use quote::quote;
use syn::{Attribute, DeriveInput, LitStr, parse_macro_input};

/// Read `#[bean(name = "...")]`, if present.
fn name_override(attrs: &[Attribute]) -> syn::Result<Option<LitStr>> {
    let mut name = None;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("bean")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                name = Some(meta.value()?.parse::<LitStr>()?);
                Ok(())
            } else {
                Err(meta.error("unknown bean attribute"))
            }
        })?;
    }
    Ok(name)
}

/// Implementation of `#[derive(Bean)]`.
pub fn derive_bean_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let bean_name = match name_override(&input.attrs) {
        Ok(Some(lit)) => lit,
        Ok(None) => LitStr::new(&name.to_string(), name.span()),
        Err(err) => return err.to_compile_error().into(),
    };

    let expanded = quote! {
        impl #impl_generics ::cloudfn::Bean for #name #ty_generics #where_clause {
            fn bean_name(&self) -> &str {
                #bean_name
            }
        }
    };

    TokenStream::from(expanded)
}
