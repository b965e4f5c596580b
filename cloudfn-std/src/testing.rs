//! Testing utilities for cloudfn.
//!
//! Ready-made handler beans for exercising resolution and dispatch without
//! writing a handler by hand.
//!
//! # Features
//!
//! - [`RecordingHandler`]: records every `(event, context)` pair it receives
//! - [`CountingHandler`]: atomically counts invocations
//! - [`FailingHandler`]: always fails with an [`InjectedFailure`]

use cloudfn_core::{Bean, BoxError, Handler, HandlerBinding, Method};
use futures::FutureExt;
use std::{
    marker::PhantomData,
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicUsize, Ordering},
    },
};
use thiserror::Error;

// ============================================================================
// Recording Handler
// ============================================================================

/// A handler that records every event and context it is invoked with.
///
/// Its entry point returns the 1-based number of the call.
///
/// # Example
///
/// ```rust,ignore
/// let recorder = Arc::new(RecordingHandler::<String, u32>::new());
/// let beans = BeanSet::new().with(Arc::clone(&recorder));
/// let dispatcher = Dispatcher::<String, u32, usize>::from_beans(&beans)?;
///
/// dispatcher.dispatch("hello".into(), 7).await?;
/// assert_eq!(recorder.calls(), vec![("hello".to_string(), 7)]);
/// ```
pub struct RecordingHandler<E, C> {
    calls: Mutex<Vec<(E, C)>>,
}

impl<E, C> RecordingHandler<E, C> {
    /// Create a new recording handler.
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
        }
    }

    fn record(&self, event: E, context: C) -> usize {
        let mut calls = self.calls.lock().unwrap_or_else(PoisonError::into_inner);
        calls.push((event, context));
        calls.len()
    }

    /// Get the number of recorded calls.
    pub fn count(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Clear all recorded calls.
    pub fn clear(&self) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl<E: Clone, C: Clone> RecordingHandler<E, C> {
    /// Get a clone of the recorded calls, in arrival order.
    pub fn calls(&self) -> Vec<(E, C)> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl<E, C> Default for RecordingHandler<E, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E, C> Bean for RecordingHandler<E, C>
where
    E: Send + 'static,
    C: Send + 'static,
{
    fn bean_name(&self) -> &str {
        "RecordingHandler"
    }

    fn as_handler(self: Arc<Self>) -> Option<HandlerBinding> {
        Some(HandlerBinding::new::<Self, E, C>(self))
    }
}

impl<E, C> Handler<E, C> for RecordingHandler<E, C>
where
    E: Send + 'static,
    C: Send + 'static,
{
    type Output = usize;

    fn methods() -> Vec<Method<Self, E, C, usize>> {
        vec![
            Method::plain("calls"),
            Method::plain("count"),
            Method::plain("clear"),
            Method::<Self, E, C, usize>::entry_point(
                "record",
                |this: Arc<Self>, event: E, context: C| {
                    async move { Ok::<_, BoxError>(this.record(event, context)) }.boxed()
                },
            ),
        ]
    }
}

// ============================================================================
// Counting Handler
// ============================================================================

/// A handler that counts invocations.
///
/// The counter belongs to the instance, so every test gets its own. The
/// entry point returns the count after its own increment.
///
/// # Example
///
/// ```rust,ignore
/// let counter = Arc::new(CountingHandler::<(), ()>::new());
/// let beans = BeanSet::new().with(Arc::clone(&counter));
/// let dispatcher = Dispatcher::<(), (), usize>::from_beans(&beans)?;
///
/// assert_eq!(dispatcher.dispatch((), ()).await?, 1);
/// assert_eq!(counter.count(), 1);
/// ```
pub struct CountingHandler<E, C> {
    count: AtomicUsize,
    _marker: PhantomData<fn(E, C)>,
}

impl<E, C> CountingHandler<E, C> {
    /// Create a new counting handler starting at zero.
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    /// Create a new counting handler starting at `count`.
    pub fn starting_at(count: usize) -> Self {
        Self {
            count: AtomicUsize::new(count),
            _marker: PhantomData,
        }
    }

    fn increment(&self) -> usize {
        self.count.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Get the current count.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Reset the counter.
    pub fn reset(&self) {
        self.count.store(0, Ordering::SeqCst);
    }
}

impl<E, C> Default for CountingHandler<E, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E, C> Bean for CountingHandler<E, C>
where
    E: Send + 'static,
    C: Send + 'static,
{
    fn bean_name(&self) -> &str {
        "CountingHandler"
    }

    fn as_handler(self: Arc<Self>) -> Option<HandlerBinding> {
        Some(HandlerBinding::new::<Self, E, C>(self))
    }
}

impl<E, C> Handler<E, C> for CountingHandler<E, C>
where
    E: Send + 'static,
    C: Send + 'static,
{
    type Output = usize;

    fn methods() -> Vec<Method<Self, E, C, usize>> {
        vec![
            Method::plain("count"),
            Method::plain("reset"),
            Method::<Self, E, C, usize>::entry_point(
                "increment",
                |this: Arc<Self>, _event: E, _context: C| {
                    async move { Ok::<_, BoxError>(this.increment()) }.boxed()
                },
            ),
        ]
    }
}

// ============================================================================
// Failing Handler
// ============================================================================

/// The error a [`FailingHandler`] returns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct InjectedFailure(pub String);

/// A handler whose entry point always fails.
///
/// `R` is the output type the entry point claims to produce.
pub struct FailingHandler<E, C, R = ()> {
    message: String,
    attempts: AtomicUsize,
    _marker: PhantomData<fn(E, C) -> R>,
}

impl<E, C, R> FailingHandler<E, C, R> {
    /// Create a handler failing with `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            attempts: AtomicUsize::new(0),
            _marker: PhantomData,
        }
    }

    /// Get the number of times the entry point ran.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    fn fail(&self) -> Result<R, InjectedFailure> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(InjectedFailure(self.message.clone()))
    }
}

impl<E, C, R> Bean for FailingHandler<E, C, R>
where
    E: Send + 'static,
    C: Send + 'static,
    R: Send + 'static,
{
    fn bean_name(&self) -> &str {
        "FailingHandler"
    }

    fn as_handler(self: Arc<Self>) -> Option<HandlerBinding> {
        Some(HandlerBinding::new::<Self, E, C>(self))
    }
}

impl<E, C, R> Handler<E, C> for FailingHandler<E, C, R>
where
    E: Send + 'static,
    C: Send + 'static,
    R: Send + 'static,
{
    type Output = R;

    fn methods() -> Vec<Method<Self, E, C, R>> {
        vec![
            Method::plain("attempts"),
            Method::<Self, E, C, R>::entry_point(
                "fail",
                |this: Arc<Self>, _event: E, _context: C| {
                    async move { this.fail().map_err(BoxError::from) }.boxed()
                },
            ),
        ]
    }
}
