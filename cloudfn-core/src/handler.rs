//! # Handler Beans and Entry Points
//!
//! A handler bean exposes a method table through [`Handler::methods`]. Every
//! method appears in the table; the ones carrying the entry-point tag are
//! listed with [`Method::entry_point`] together with the function that invokes
//! them, the others with [`Method::plain`].
//!
//! The resolver only needs the tags and the names, which are independent of
//! the event and context types. [`HandlerBinding`] therefore erases the types
//! when the bean is offered, and hands the typed entry points back once the
//! resolver asks for a concrete `(event, context, output)` signature.
//!
//! # Usage Patterns
//!
//! 1. **Attribute macro**: `#[handler]` on the impl block, `#[entry_point]` on
//!    one method
//! 2. **Manual implementation**: implement [`Bean::as_handler`] and
//!    [`Handler`] directly

use crate::{bean::Bean, error::BoxError};
use futures::future::BoxFuture;
use std::{any::Any, fmt, sync::Arc};

/// The fixed shape every entry point is invoked through.
///
/// Generated code adapts the user method (sync or async, plain value or
/// `Result`) to this shape.
pub type EntryPointFn<H, E, C, R> = fn(Arc<H>, E, C) -> BoxFuture<'static, Result<R, BoxError>>;

/// One row of a handler's method table.
pub struct Method<H, E, C, R> {
    name: &'static str,
    call: Option<EntryPointFn<H, E, C, R>>,
}

impl<H, E, C, R> Method<H, E, C, R> {
    /// A method without the entry-point tag.
    pub const fn plain(name: &'static str) -> Self {
        Self { name, call: None }
    }

    /// A method carrying the entry-point tag.
    pub const fn entry_point(name: &'static str, call: EntryPointFn<H, E, C, R>) -> Self {
        Self {
            name,
            call: Some(call),
        }
    }

    /// The method's name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether the method carries the entry-point tag.
    pub fn is_entry_point(&self) -> bool {
        self.call.is_some()
    }
}

impl<H, E, C, R> Clone for Method<H, E, C, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<H, E, C, R> Copy for Method<H, E, C, R> {}

impl<H, E, C, R> fmt::Debug for Method<H, E, C, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method")
            .field("name", &self.name)
            .field("entry_point", &self.is_entry_point())
            .finish()
    }
}

/// A bean carrying the handler tag.
///
/// `E` is the event type and `C` the invocation context type the entry point
/// accepts.
///
/// # Example
///
/// ```rust,ignore
/// impl Bean for Demo {
///     fn as_handler(self: Arc<Self>) -> Option<HandlerBinding> {
///         Some(HandlerBinding::new::<Self, String, ()>(self))
///     }
/// }
///
/// impl Handler<String, ()> for Demo {
///     type Output = String;
///
///     fn methods() -> Vec<Method<Self, String, (), String>> {
///         vec![Method::<Self, String, (), String>::entry_point(
///             "handle",
///             |this: Arc<Self>, event: String, _ctx: ()| {
///                 async move { Ok::<_, BoxError>(this.handle(event)) }.boxed()
///             },
///         )]
///     }
/// }
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a handler for events of type `{E}` with context `{C}`",
    label = "missing `Handler<{E}, {C}>` implementation",
    note = "Use `#[handler]` on the impl block and mark one method with `#[entry_point]`."
)]
pub trait Handler<E, C>: Bean + Sized {
    /// What the entry point returns on success.
    type Output: Send + 'static;

    /// The full method table, in declaration order.
    fn methods() -> Vec<Method<Self, E, C, Self::Output>>;
}

/// An entry point bound to its handler instance.
pub struct EntryPoint<E, C, R> {
    name: &'static str,
    call: Arc<dyn Fn(E, C) -> BoxFuture<'static, Result<R, BoxError>> + Send + Sync>,
}

impl<E, C, R> EntryPoint<E, C, R> {
    /// Bind `call` to `instance`.
    pub fn bind<H>(name: &'static str, instance: Arc<H>, call: EntryPointFn<H, E, C, R>) -> Self
    where
        H: Send + Sync + 'static,
        E: 'static,
        C: 'static,
        R: 'static,
    {
        Self {
            name,
            call: Arc::new(move |event, context| call(Arc::clone(&instance), event, context)),
        }
    }

    /// The bound method's name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Invoke the bound method.
    pub fn call(&self, event: E, context: C) -> BoxFuture<'static, Result<R, BoxError>> {
        (self.call)(event, context)
    }
}

impl<E, C, R> Clone for EntryPoint<E, C, R> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            call: Arc::clone(&self.call),
        }
    }
}

impl<E, C, R> fmt::Debug for EntryPoint<E, C, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryPoint")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// The `(event, context) -> output` types of an entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    /// Event type name.
    pub event: &'static str,
    /// Context type name.
    pub context: &'static str,
    /// Output type name.
    pub output: &'static str,
}

impl Signature {
    /// The signature for the given types.
    pub fn of<E, C, R>() -> Self {
        Self {
            event: std::any::type_name::<E>(),
            context: std::any::type_name::<C>(),
            output: std::any::type_name::<R>(),
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fn({}, {}) -> {}", self.event, self.context, self.output)
    }
}

/// A handler bean with its method table, types erased.
///
/// Returned by [`Bean::as_handler`].
pub struct HandlerBinding {
    instance: Arc<dyn Bean>,
    methods: Vec<(&'static str, bool)>,
    signature: Signature,
    // Vec<EntryPoint<E, C, R>> of the tagged methods
    entry_points: Box<dyn Any + Send + Sync>,
}

impl HandlerBinding {
    /// Bind the method table of `H` to `instance`.
    pub fn new<H, E, C>(instance: Arc<H>) -> Self
    where
        H: Handler<E, C>,
        E: 'static,
        C: 'static,
    {
        let table = H::methods();
        let methods = table
            .iter()
            .map(|m| (m.name(), m.is_entry_point()))
            .collect();
        let entry_points: Vec<EntryPoint<E, C, H::Output>> = table
            .iter()
            .filter_map(|m| {
                m.call
                    .map(|call| EntryPoint::bind(m.name, Arc::clone(&instance), call))
            })
            .collect();

        Self {
            instance,
            methods,
            signature: Signature::of::<E, C, H::Output>(),
            entry_points: Box::new(entry_points),
        }
    }

    /// The bound instance.
    pub fn instance(&self) -> &Arc<dyn Bean> {
        &self.instance
    }

    /// The bean's diagnostic name.
    pub fn bean_name(&self) -> &str {
        self.instance.bean_name()
    }

    /// Names of every method in the table, in declaration order.
    pub fn method_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.methods.iter().map(|(name, _)| *name)
    }

    /// Names of the methods carrying the entry-point tag.
    pub fn entry_point_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.methods
            .iter()
            .filter(|(_, tagged)| *tagged)
            .map(|(name, _)| *name)
    }

    /// The signature of the table's entry points.
    pub fn signature(&self) -> Signature {
        self.signature
    }

    /// Recover the typed entry points.
    ///
    /// Fails with the binding itself if the table was built for another
    /// signature.
    pub fn into_entry_points<E, C, R>(self) -> Result<Vec<EntryPoint<E, C, R>>, Self>
    where
        E: 'static,
        C: 'static,
        R: 'static,
    {
        match self.entry_points.downcast::<Vec<EntryPoint<E, C, R>>>() {
            Ok(entry_points) => Ok(*entry_points),
            Err(entry_points) => Err(Self {
                entry_points,
                ..self
            }),
        }
    }
}

impl fmt::Debug for HandlerBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerBinding")
            .field("bean", &self.bean_name())
            .field("methods", &self.methods)
            .field("signature", &self.signature)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;

    struct Echo;

    impl Echo {
        fn echo(&self, event: String, context: u32) -> String {
            format!("{event}:{context}")
        }
    }

    impl Bean for Echo {
        fn as_handler(self: Arc<Self>) -> Option<HandlerBinding> {
            Some(HandlerBinding::new::<Self, String, u32>(self))
        }
    }

    impl Handler<String, u32> for Echo {
        type Output = String;

        fn methods() -> Vec<Method<Self, String, u32, String>> {
            vec![
                Method::plain("helper"),
                Method::<Self, String, u32, String>::entry_point(
                    "echo",
                    |this: Arc<Self>, event: String, context: u32| {
                        async move { Ok::<_, BoxError>(this.echo(event, context)) }.boxed()
                    },
                ),
            ]
        }
    }

    #[test]
    fn method_table_keeps_tags() {
        let methods = Echo::methods();
        assert!(!methods[0].is_entry_point());
        assert!(methods[1].is_entry_point());
        assert_eq!(methods[1].name(), "echo");
    }

    #[test]
    fn binding_lists_tagged_methods() {
        let binding = Arc::new(Echo).as_handler().unwrap();
        assert_eq!(binding.method_names().collect::<Vec<_>>(), ["helper", "echo"]);
        assert_eq!(binding.entry_point_names().collect::<Vec<_>>(), ["echo"]);
        assert_eq!(binding.signature(), Signature::of::<String, u32, String>());
    }

    #[tokio::test]
    async fn typed_entry_points_are_recovered() {
        let binding = Arc::new(Echo).as_handler().unwrap();
        let entry_points = binding.into_entry_points::<String, u32, String>().unwrap();
        assert_eq!(entry_points.len(), 1);

        let out = entry_points[0].call("ping".to_string(), 7).await.unwrap();
        assert_eq!(out, "ping:7");
    }

    #[test]
    fn wrong_signature_returns_binding() {
        let binding = Arc::new(Echo).as_handler().unwrap();
        let binding = binding.into_entry_points::<String, (), String>().unwrap_err();
        assert_eq!(binding.entry_point_names().count(), 1);
    }

    #[test]
    fn signature_display() {
        let sig = Signature::of::<u8, (), bool>();
        assert_eq!(sig.to_string(), "fn(u8, ()) -> bool");
    }
}
