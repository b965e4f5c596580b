//! # cloudfn - Single-Function Invocation Harness
//!
//! `cloudfn` finds the one handler bean in a set of application objects,
//! finds the one entry-point method on it, and invokes that method for every
//! incoming event with the event's invocation context.
//!
//! A wrong number of handler beans or entry points is a
//! [`ConfigurationError`] at startup, never a surprise on the first request.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cloudfn::{handler, BeanSet, Dispatcher, InvocationContext};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! #[derive(Default)]
//! struct Demo {
//!     counter: AtomicUsize,
//! }
//!
//! #[handler]
//! impl Demo {
//!     #[entry_point]
//!     fn handle(&self, _event: String, _ctx: InvocationContext) -> String {
//!         format!("Invocation #{}", self.counter.fetch_add(1, Ordering::SeqCst) + 1)
//!     }
//! }
//!
//! let beans = BeanSet::new().with(Arc::new(Demo::default()));
//! let dispatcher = Dispatcher::<String, InvocationContext, String>::from_beans(&beans)?;
//!
//! let out = dispatcher.dispatch("ping".into(), InvocationContext::new("req-1")).await?;
//! assert_eq!(out, "Invocation #1");
//! ```
//!
//! ## Explicit Registration
//!
//! Hosts that already hold the handler can skip scanning:
//!
//! ```rust,ignore
//! let target = ResolvedTarget::bind(demo, "handle", |this, event, ctx| {
//!     async move { Ok(this.handle(event, ctx)) }.boxed()
//! });
//! let dispatcher = Dispatcher::from_target(target);
//! ```
//!
//! ## Compile-Time Checks
//!
//! `#[handler]` checks the entry point while expanding. A well-formed handler
//! compiles:
//!
//! ```rust
//! # #[cfg(feature = "macros")]
//! # mod demo {
//! use cloudfn::InvocationContext;
//!
//! pub struct Echo;
//!
//! #[cloudfn::handler]
//! impl Echo {
//!     #[entry_point]
//!     fn echo(&self, event: String, _context: InvocationContext) -> String {
//!         event
//!     }
//! }
//! # }
//! ```
//!
//! An impl block without an entry point does not:
//!
//! ```rust,compile_fail
//! pub struct Idle;
//!
//! #[cloudfn::handler]
//! impl Idle {
//!     fn idle(&self) {}
//! }
//! ```
//!
//! Neither does one with two:
//!
//! ```rust,compile_fail
//! pub struct Greedy;
//!
//! #[cloudfn::handler]
//! impl Greedy {
//!     #[entry_point]
//!     fn first(&self, event: u32, _context: ()) -> u32 {
//!         event
//!     }
//!
//!     #[entry_point]
//!     fn second(&self, event: u32, _context: ()) -> u32 {
//!         event
//!     }
//! }
//! ```
//!
//! The entry point takes `&self`, not `&mut self`:
//!
//! ```rust,compile_fail
//! pub struct Mutating {
//!     total: u32,
//! }
//!
//! #[cloudfn::handler]
//! impl Mutating {
//!     #[entry_point]
//!     fn add(&mut self, event: u32, _context: ()) -> u32 {
//!         self.total += event;
//!         self.total
//!     }
//! }
//! ```
//!
//! It takes exactly an event and a context:
//!
//! ```rust,compile_fail
//! pub struct Wide;
//!
//! #[cloudfn::handler]
//! impl Wide {
//!     #[entry_point]
//!     fn handle(&self, event: u32, _context: (), extra: u32) -> u32 {
//!         event + extra
//!     }
//! }
//! ```
//!
//! And `#[entry_point]` outside a `#[handler]` impl block is rejected:
//!
//! ```rust,compile_fail
//! #[cloudfn::entry_point]
//! fn handle(event: u32, _context: ()) -> u32 {
//!     event
//! }
//! ```

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use cloudfn_core::{
    // Beans / handler tag
    Bean,
    BeanSet,
    // Error types
    BoxError,
    ConfigurationError,
    // Context
    InvocationContext,
    // Dispatch
    Dispatch,
    DispatchError,
    Dispatcher,
    DispatcherState,
    DynDispatch,
    // Entry points
    EntryPoint,
    EntryPointFn,
    Handler,
    HandlerBinding,
    HarnessError,
    Method,
    // Resolution
    ResolvedTarget,
    Signature,
    resolve,
};

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use cloudfn_std::testing::*;
}

/// Prelude module - common imports for cloudfn.
///
/// # Usage
///
/// ```rust,ignore
/// use cloudfn::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Bean, BeanSet, BoxError, ConfigurationError, Dispatch, DispatchError, Dispatcher,
        Handler, InvocationContext, ResolvedTarget,
    };

    #[cfg(feature = "macros")]
    pub use crate::{entry_point, handler};
}

#[cfg(feature = "macros")]
pub use cloudfn_macros::{Bean, entry_point, handler};

/// Used by generated code. Not public API.
#[doc(hidden)]
pub mod __private {
    pub use futures::FutureExt;
}
