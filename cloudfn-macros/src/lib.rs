//! Procedural macros for the cloudfn marker model.
//!
//! - `#[handler]` tags the type of an inherent impl block as the handler bean
//!   and generates its `Bean` and `Handler` implementations.
//! - `#[entry_point]` tags the one method of that impl block the dispatcher
//!   invokes.
//! - `#[derive(Bean)]` declares a plain bean.
//!
//! Generated code refers to the `cloudfn` facade crate.

use proc_macro::TokenStream;

mod bean;
mod handler;

/// Derive macro for plain beans.
///
/// `#[bean(name = "...")]` overrides the diagnostic name.
#[proc_macro_derive(Bean, attributes(bean))]
pub fn derive_bean(input: TokenStream) -> TokenStream {
    bean::derive_bean_impl(input)
}

/// Tags the type of an impl block as the handler bean.
///
/// Exactly one method of the block must carry `#[entry_point]` and have the
/// shape `fn(&self, event, context) -> R`, sync or async. A `Result<T, E>`
/// return makes `T` the dispatch output and boxes `E` as the invocation
/// error.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Default)]
/// struct Demo {
///     counter: AtomicUsize,
/// }
///
/// #[cloudfn::handler]
/// impl Demo {
///     #[entry_point]
///     fn handle(&self, _event: Value, _ctx: InvocationContext) -> String {
///         format!("Invocation #{}", self.counter.fetch_add(1, Ordering::SeqCst) + 1)
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn handler(attr: TokenStream, item: TokenStream) -> TokenStream {
    handler::handler_impl(attr, item)
}

/// Tags the entry point of a `#[handler]` impl block.
#[proc_macro_attribute]
pub fn entry_point(attr: TokenStream, item: TokenStream) -> TokenStream {
    handler::entry_point_impl(attr, item)
}
