//! Error types for cloudfn.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`HarnessError`] - Top-level error type for all cloudfn operations
//! - [`ConfigurationError`] - Handler or entry-point cardinality violations found during resolution
//! - [`DispatchError`] - Errors surfaced by a dispatch call

use thiserror::Error;

/// A boxed error type for dynamic error handling.
///
/// Entry points report their failures through this type.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for all cloudfn operations.
#[derive(Error, Debug)]
pub enum HarnessError {
    /// Resolution of the handler bean or its entry point failed.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// A dispatch call failed.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

/// Errors raised while resolving the invocation target.
///
/// Every variant is fatal: a host that receives one must not start serving
/// events.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// No bean in the set carries the handler tag.
    #[error("zero handler beans found")]
    NoHandlerBean,

    /// More than one bean carries the handler tag.
    #[error("multiple handler beans found: {}", .beans.join(", "))]
    MultipleHandlerBeans {
        /// Names of every tagged bean, in registration order.
        beans: Vec<String>,
    },

    /// The handler bean has no method tagged as entry point.
    #[error("zero entry-point methods on handler bean `{bean}`")]
    NoEntryPoint {
        /// Name of the handler bean.
        bean: String,
    },

    /// The handler bean has several methods tagged as entry point.
    #[error("multiple entry-point methods on handler bean `{bean}`: {}", .methods.join(", "))]
    MultipleEntryPoints {
        /// Name of the handler bean.
        bean: String,
        /// Names of the tagged methods, in declaration order.
        methods: Vec<String>,
    },

    /// The entry point does not accept the event/context types the
    /// dispatcher was built for, or returns a different output type.
    #[error("handler bean `{bean}` has entry point signature `{found}`, expected `{expected}`")]
    SignatureMismatch {
        /// Name of the handler bean.
        bean: String,
        /// Signature the dispatcher expects.
        expected: String,
        /// Signature the handler declares.
        found: String,
    },
}

/// Errors that can occur during dispatch.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// Dispatch was attempted before a successful resolution.
    #[error("dispatcher is not initialized")]
    NotInitialized,

    /// The entry point itself failed.
    ///
    /// The original error is kept as is: `Display` and `source` are forwarded
    /// and [`DispatchError::into_invocation`] hands it back.
    #[error(transparent)]
    Invocation(BoxError),
}

impl DispatchError {
    /// Returns `true` if the entry point itself failed.
    pub fn is_invocation(&self) -> bool {
        matches!(self, DispatchError::Invocation(_))
    }

    /// Get the entry point's error, if that is what this is.
    pub fn invocation(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            DispatchError::Invocation(err) => Some(err.as_ref()),
            DispatchError::NotInitialized => None,
        }
    }

    /// Consume this error and return the entry point's original error.
    pub fn into_invocation(self) -> Result<BoxError, Self> {
        match self {
            DispatchError::Invocation(err) => Ok(err),
            other => Err(other),
        }
    }
}

impl From<BoxError> for DispatchError {
    fn from(err: BoxError) -> Self {
        DispatchError::Invocation(err)
    }
}
