//! Dispatcher core traits and the single-target [`Dispatcher`].

use crate::{
    bean::BeanSet,
    error::{ConfigurationError, DispatchError},
    resolution::{ResolvedTarget, resolve},
};
use std::{fmt, future::Future, pin::Pin, sync::OnceLock};

/// A dispatcher that invokes an entry point for an event.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot dispatch events of type `{E}` with context `{C}`",
    label = "missing `Dispatch` implementation",
    note = "Implement `Dispatch<{E}, {C}>` to handle event dispatching."
)]
pub trait Dispatch<E, C>: Send + Sync {
    /// What a successful dispatch returns.
    type Output;

    /// The error type returned by dispatch operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Dispatch the event and its invocation context.
    fn dispatch(
        &self,
        event: E,
        context: C,
    ) -> impl Future<Output = Result<Self::Output, Self::Error>> + Send;
}

/// Object-safe version of `Dispatch` for dynamic dispatch.
pub trait DynDispatch<E, C>: Send + Sync {
    /// What a successful dispatch returns.
    type Output;

    /// The error type returned by dispatch operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Dispatch the event and its invocation context.
    fn dispatch_boxed<'a>(
        &'a self,
        event: E,
        context: C,
    ) -> Pin<Box<dyn Future<Output = Result<Self::Output, Self::Error>> + Send + 'a>>
    where
        E: 'a,
        C: 'a;
}

impl<T, E, C> DynDispatch<E, C> for T
where
    T: Dispatch<E, C>,
{
    type Output = T::Output;
    type Error = T::Error;

    fn dispatch_boxed<'a>(
        &'a self,
        event: E,
        context: C,
    ) -> Pin<Box<dyn Future<Output = Result<Self::Output, Self::Error>> + Send + 'a>>
    where
        E: 'a,
        C: 'a,
    {
        Box::pin(self.dispatch(event, context))
    }
}

/// Lifecycle of a [`Dispatcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatcherState {
    /// Resolution has not run yet.
    Uninitialized,
    /// Resolution succeeded; dispatch is accepted.
    Resolved,
    /// Resolution failed; dispatch is never accepted.
    Failed,
}

/// Invokes the single resolved entry point.
///
/// Resolution runs at most once. Both outcomes are kept: a second
/// [`initialize`](Dispatcher::initialize) returns the stored target or the
/// stored error without looking at the bean set again.
///
/// `E` is the event type, `C` the invocation context type and `R` the
/// entry point's output.
///
/// # Example
/// ```ignore
/// let beans = BeanSet::new().with(Arc::new(Demo::default()));
/// let dispatcher = Dispatcher::<Value, InvocationContext, String>::from_beans(&beans)?;
///
/// let out = dispatcher.dispatch(event, ctx).await?;
/// ```
pub struct Dispatcher<E, C, R> {
    state: OnceLock<Result<ResolvedTarget<E, C, R>, ConfigurationError>>,
}

impl<E, C, R> Dispatcher<E, C, R>
where
    E: 'static,
    C: 'static,
    R: 'static,
{
    /// Create an uninitialized dispatcher.
    pub fn new() -> Self {
        Self {
            state: OnceLock::new(),
        }
    }

    /// Resolve `beans` and return a ready dispatcher, or the configuration
    /// error.
    pub fn from_beans(beans: &BeanSet) -> Result<Self, ConfigurationError> {
        let dispatcher = Self::new();
        dispatcher.initialize(beans)?;
        Ok(dispatcher)
    }

    /// Create a dispatcher for an explicitly bound target.
    pub fn from_target(target: ResolvedTarget<E, C, R>) -> Self {
        Self {
            state: OnceLock::from(Ok(target)),
        }
    }

    /// Run resolution against `beans`, once.
    pub fn initialize(&self, beans: &BeanSet) -> Result<&ResolvedTarget<E, C, R>, ConfigurationError> {
        self.state
            .get_or_init(|| resolve(beans))
            .as_ref()
            .map_err(Clone::clone)
    }
}

impl<E, C, R> Dispatcher<E, C, R> {
    /// Current lifecycle state.
    pub fn state(&self) -> DispatcherState {
        match self.state.get() {
            None => DispatcherState::Uninitialized,
            Some(Ok(_)) => DispatcherState::Resolved,
            Some(Err(_)) => DispatcherState::Failed,
        }
    }

    /// The resolved target, if resolution succeeded.
    pub fn target(&self) -> Option<&ResolvedTarget<E, C, R>> {
        self.state.get().and_then(|state| state.as_ref().ok())
    }

    /// The stored resolution error, if resolution failed.
    pub fn failure(&self) -> Option<&ConfigurationError> {
        self.state.get().and_then(|state| state.as_ref().err())
    }

    /// Invoke the entry point with `event` and `context`.
    ///
    /// The entry point's output is returned unchanged; its failure comes back
    /// as [`DispatchError::Invocation`].
    pub async fn dispatch(&self, event: E, context: C) -> Result<R, DispatchError> {
        let target = self.target().ok_or(DispatchError::NotInitialized)?;
        let call = target.invoke(event, context);

        #[cfg(feature = "tracing")]
        let call = {
            use tracing::Instrument;
            let span = tracing::trace_span!(
                "dispatch",
                bean = target.bean_name(),
                method = target.method_name()
            );
            call.instrument(span)
        };

        call.await.map_err(DispatchError::Invocation)
    }
}

impl<E, C, R> Default for Dispatcher<E, C, R>
where
    E: 'static,
    C: 'static,
    R: 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<E, C, R> fmt::Debug for Dispatcher<E, C, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("Dispatcher");
        out.field("state", &self.state());
        if let Some(target) = self.target() {
            out.field("target", target);
        }
        if let Some(err) = self.failure() {
            out.field("failure", err);
        }
        out.finish()
    }
}

impl<E, C, R> Dispatch<E, C> for Dispatcher<E, C, R>
where
    E: Send + 'static,
    C: Send + 'static,
    R: Send + 'static,
{
    type Output = R;
    type Error = DispatchError;

    fn dispatch(
        &self,
        event: E,
        context: C,
    ) -> impl Future<Output = Result<Self::Output, Self::Error>> + Send {
        Dispatcher::dispatch(self, event, context)
    }
}
