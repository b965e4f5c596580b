//! # cloudfn-core
//!
//! Core traits and the dispatcher of the cloudfn single-function invocation
//! harness.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! hosts and trigger adapters that don't need the proc macros.
//!
//! # Marker Model
//!
//! Two tags, both pure metadata:
//!
//! - **Handler tag** (type level): a [`Bean`] whose [`Bean::as_handler`]
//!   returns a [`HandlerBinding`]. Exactly one bean in the set may carry it.
//! - **Entry-point tag** (method level): a [`Method::entry_point`] row in the
//!   handler's [`Handler::methods`] table. Exactly one method may carry it.
//!
//! # Dispatcher
//!
//! [`resolve`] scans a [`BeanSet`] once, enforces both cardinalities and
//! binds the result into a [`ResolvedTarget`]. The [`Dispatcher`] keeps that
//! target behind a one-time barrier and invokes it per event, passing the
//! event and the invocation context through untouched.
//!
//! # Error Types
//!
//! - [`HarnessError`] - Top-level error type
//! - [`ConfigurationError`] - Resolution failures, fatal at startup
//! - [`DispatchError`] - Dispatch before resolution, or the entry point's own failure

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod bean;
mod context;
mod dispatcher;
mod error;
mod handler;
mod resolution;

// Re-exports
pub use bean::{Bean, BeanSet};
pub use context::InvocationContext;
pub use dispatcher::{Dispatch, Dispatcher, DispatcherState, DynDispatch};
pub use error::{BoxError, ConfigurationError, DispatchError, HarnessError};
pub use handler::{EntryPoint, EntryPointFn, Handler, HandlerBinding, Method, Signature};
pub use resolution::{ResolvedTarget, resolve};
