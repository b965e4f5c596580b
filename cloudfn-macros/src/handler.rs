//! Handler-related macros.
//!
//! This module contains:
//! - `#[handler]` - Attribute macro tagging the type of an impl block as the handler bean
//! - `#[entry_point]` - Method tag, consumed by `#[handler]`

use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{
    Attribute, FnArg, GenericArgument, Ident, ImplItem, ImplItemFn, ItemImpl, LitStr,
    PathArguments, ReturnType, Token, Type, parse::Parse, parse_macro_input, parse_quote,
};

/// Arguments for the `#[handler]` macro.
pub(crate) struct HandlerArgs {
    pub name: Option<String>,
}

impl Parse for HandlerArgs {
    fn parse(input: syn::parse::ParseStream) -> syn::Result<Self> {
        let mut name = None;

        while !input.is_empty() {
            let ident: Ident = input.parse()?;
            input.parse::<Token![=]>()?;

            match ident.to_string().as_str() {
                "name" => {
                    let lit: LitStr = input.parse()?;
                    name = Some(lit.value());
                }
                other => {
                    return Err(syn::Error::new(
                        ident.span(),
                        format!("unknown attribute: {}", other),
                    ));
                }
            }

            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
        }

        Ok(HandlerArgs { name })
    }
}

/// What the entry point returns.
enum Output {
    /// Any non-`Result` type, always a success.
    Plain(Type),
    /// The `Ok` type of a `Result`; the error is boxed.
    Fallible(Type),
}

impl Output {
    fn ty(&self) -> &Type {
        match self {
            Output::Plain(ty) | Output::Fallible(ty) => ty,
        }
    }
}

/// The parts of an entry point signature the generated code needs.
struct EntryPointSig {
    ident: Ident,
    is_async: bool,
    event: Type,
    context: Type,
    output: Output,
}

fn is_entry_point_attr(attr: &Attribute) -> bool {
    attr.path()
        .segments
        .last()
        .is_some_and(|segment| segment.ident == "entry_point")
}

/// `Result<T, ..>` (under any path) yields `T`.
///
/// Matching is by name only: any type whose last path segment is `Result`
/// with a type argument, such as `io::Result<T>` or a user alias, is treated
/// as fallible and its error goes through `BoxError::from`. An alias that is
/// named `Result` but is not one fails to compile in the generated code.
fn result_ok_type(ty: &Type) -> Option<&Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    if type_path.qself.is_some() {
        return None;
    }
    let segment = type_path.path.segments.last()?;
    if segment.ident != "Result" {
        return None;
    }
    match &segment.arguments {
        PathArguments::AngleBracketed(args) => args.args.iter().find_map(|arg| match arg {
            GenericArgument::Type(ty) => Some(ty),
            _ => None,
        }),
        _ => None,
    }
}

fn parse_entry_point(method: &ImplItemFn) -> syn::Result<EntryPointSig> {
    let sig = &method.sig;

    if !sig.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &sig.generics,
            "entry point must not be generic",
        ));
    }

    let mut inputs = sig.inputs.iter();
    match inputs.next() {
        Some(FnArg::Receiver(receiver))
            if receiver.reference.is_some() && receiver.mutability.is_none() => {}
        _ => {
            return Err(syn::Error::new_spanned(
                &sig.ident,
                "entry point must take `&self`: fn(&self, event, context)",
            ));
        }
    }

    let args: Vec<Type> = inputs
        .map(|arg| match arg {
            FnArg::Typed(pat_type) => Ok((*pat_type.ty).clone()),
            FnArg::Receiver(receiver) => Err(syn::Error::new_spanned(
                receiver,
                "unexpected receiver in entry point arguments",
            )),
        })
        .collect::<syn::Result<_>>()?;

    let [event, context] = <[Type; 2]>::try_from(args).map_err(|_| {
        syn::Error::new_spanned(
            &sig.inputs,
            "entry point must take exactly two arguments: fn(&self, event, context)",
        )
    })?;

    let output = match &sig.output {
        ReturnType::Default => Output::Plain(parse_quote! { () }),
        ReturnType::Type(_, ty) => match result_ok_type(ty) {
            Some(ok) => Output::Fallible(ok.clone()),
            None => Output::Plain((**ty).clone()),
        },
    };

    Ok(EntryPointSig {
        ident: sig.ident.clone(),
        is_async: sig.asyncness.is_some(),
        event,
        context,
        output,
    })
}

/// Implementation of the `#[handler]` macro.
pub fn handler_impl(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as HandlerArgs);
    let mut input = parse_macro_input!(item as ItemImpl);

    match expand_handler(&args, &mut input) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_handler(args: &HandlerArgs, input: &mut ItemImpl) -> syn::Result<proc_macro2::TokenStream> {
    if let Some((_, path, _)) = &input.trait_ {
        return Err(syn::Error::new_spanned(
            path,
            "`#[handler]` must be placed on an inherent impl block",
        ));
    }

    // (method name, carries the entry-point tag), in declaration order
    let mut table: Vec<(Ident, bool)> = Vec::new();
    let mut tagged: Vec<ImplItemFn> = Vec::new();

    for item in &mut input.items {
        let ImplItem::Fn(method) = item else {
            continue;
        };
        let before = method.attrs.len();
        method.attrs.retain(|attr| !is_entry_point_attr(attr));
        let is_entry_point = method.attrs.len() != before;

        // Associated functions without a receiver are not methods of the bean.
        if method.sig.receiver().is_some() || is_entry_point {
            table.push((method.sig.ident.clone(), is_entry_point));
        }
        if is_entry_point {
            tagged.push(method.clone());
        }
    }

    let entry = match tagged.as_slice() {
        [] => {
            return Err(syn::Error::new_spanned(
                &input.self_ty,
                "`#[handler]` impl block has no `#[entry_point]` method",
            ));
        }
        [entry] => entry,
        [_, second, ..] => {
            let names: Vec<String> = tagged.iter().map(|m| m.sig.ident.to_string()).collect();
            return Err(syn::Error::new_spanned(
                &second.sig.ident,
                format!(
                    "multiple `#[entry_point]` methods on handler: {}",
                    names.join(", ")
                ),
            ));
        }
    };

    let sig = parse_entry_point(entry)?;
    let EntryPointSig {
        ident: method_ident,
        is_async,
        event,
        context,
        output,
    } = &sig;
    let output_ty = output.ty();

    let invoke = if *is_async {
        quote! { __this.#method_ident(__event, __context).await }
    } else {
        quote! { __this.#method_ident(__event, __context) }
    };
    let outcome = match output {
        Output::Plain(_) => quote! { ::core::result::Result::Ok(#invoke) },
        Output::Fallible(_) => {
            quote! { ::core::result::Result::map_err(#invoke, ::cloudfn::BoxError::from) }
        }
    };

    let rows = table.iter().map(|(ident, is_entry_point)| {
        let name = LitStr::new(&ident.to_string(), ident.span());
        if *is_entry_point {
            quote! {
                ::cloudfn::Method::<Self, #event, #context, #output_ty>::entry_point(
                    #name,
                    |__this: ::std::sync::Arc<Self>, __event: #event, __context: #context| {
                        ::cloudfn::__private::FutureExt::boxed(async move {
                            let __outcome: ::core::result::Result<#output_ty, ::cloudfn::BoxError> =
                                #outcome;
                            __outcome
                        })
                    },
                )
            }
        } else {
            quote! {
                ::cloudfn::Method::<Self, #event, #context, #output_ty>::plain(#name)
            }
        }
    });

    let self_ty = &input.self_ty;
    let bean_name = match &args.name {
        Some(name) => LitStr::new(name, Span::call_site()),
        None => LitStr::new(
            &quote! { #self_ty }.to_string().replace(' ', ""),
            Span::call_site(),
        ),
    };
    let (impl_generics, _, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        #input

        impl #impl_generics ::cloudfn::Bean for #self_ty #where_clause {
            fn bean_name(&self) -> &str {
                #bean_name
            }

            fn as_handler(
                self: ::std::sync::Arc<Self>,
            ) -> ::core::option::Option<::cloudfn::HandlerBinding> {
                ::core::option::Option::Some(
                    ::cloudfn::HandlerBinding::new::<Self, #event, #context>(self),
                )
            }
        }

        impl #impl_generics ::cloudfn::Handler<#event, #context> for #self_ty #where_clause {
            type Output = #output_ty;

            fn methods() -> ::std::vec::Vec<::cloudfn::Method<Self, #event, #context, #output_ty>> {
                ::std::vec![#(#rows),*]
            }
        }
    })
}

/// Implementation of the standalone `#[entry_point]` macro.
///
/// Inside a `#[handler]` impl block the tag is consumed before it expands, so
/// reaching this function means it was used somewhere else.
pub fn entry_point_impl(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let mut expanded = syn::Error::new(
        Span::call_site(),
        "`#[entry_point]` is only valid on a method inside a `#[handler]` impl block",
    )
    .to_compile_error();
    expanded.extend(proc_macro2::TokenStream::from(item));
    TokenStream::from(expanded)
}
