//! # Resolution
//!
//! Turns a [`BeanSet`] into the single [`ResolvedTarget`] the dispatcher
//! invokes:
//!
//! 1. keep the beans carrying the handler tag, and require exactly one;
//! 2. keep that bean's methods carrying the entry-point tag, and require
//!    exactly one;
//! 3. bind the method to the instance.
//!
//! Any other count is a [`ConfigurationError`].

use crate::{
    bean::{Bean, BeanSet},
    error::{BoxError, ConfigurationError},
    handler::{EntryPoint, EntryPointFn, HandlerBinding, Signature},
};
use futures::future::BoxFuture;
use std::{fmt, sync::Arc};

/// The handler instance paired with its entry point.
///
/// Immutable once built.
pub struct ResolvedTarget<E, C, R> {
    bean_name: String,
    instance: Arc<dyn Bean>,
    entry_point: EntryPoint<E, C, R>,
}

impl<E, C, R> ResolvedTarget<E, C, R>
where
    E: 'static,
    C: 'static,
    R: 'static,
{
    /// Bind `call` on `instance` directly, without scanning a bean set.
    ///
    /// # Example
    /// ```ignore
    /// let target = ResolvedTarget::bind(Arc::new(Demo::default()), "handle", |this, event, ctx| {
    ///     async move { Ok(this.handle(event, ctx)) }.boxed()
    /// });
    /// let dispatcher = Dispatcher::from_target(target);
    /// ```
    pub fn bind<H: Bean>(
        instance: Arc<H>,
        method: &'static str,
        call: EntryPointFn<H, E, C, R>,
    ) -> Self {
        Self {
            bean_name: instance.bean_name().to_string(),
            entry_point: EntryPoint::bind(method, Arc::clone(&instance), call),
            instance,
        }
    }
}

impl<E, C, R> ResolvedTarget<E, C, R> {
    /// The handler bean's name.
    pub fn bean_name(&self) -> &str {
        &self.bean_name
    }

    /// The entry point's name.
    pub fn method_name(&self) -> &'static str {
        self.entry_point.name()
    }

    /// The handler instance.
    pub fn instance(&self) -> &Arc<dyn Bean> {
        &self.instance
    }

    /// The bound entry point.
    pub fn entry_point(&self) -> &EntryPoint<E, C, R> {
        &self.entry_point
    }

    /// Whether both targets bind the same method on the same instance.
    pub fn same_target(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.instance), Arc::as_ptr(&other.instance))
            && self.method_name() == other.method_name()
    }

    /// Call the entry point with `event` and `context`, in that order.
    pub fn invoke(&self, event: E, context: C) -> BoxFuture<'static, Result<R, BoxError>> {
        self.entry_point.call(event, context)
    }
}

impl<E, C, R> Clone for ResolvedTarget<E, C, R> {
    fn clone(&self) -> Self {
        Self {
            bean_name: self.bean_name.clone(),
            instance: Arc::clone(&self.instance),
            entry_point: self.entry_point.clone(),
        }
    }
}

impl<E, C, R> fmt::Debug for ResolvedTarget<E, C, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedTarget")
            .field("bean", &self.bean_name)
            .field("method", &self.method_name())
            .finish()
    }
}

/// Find the handler bean in `beans` and bind its entry point.
///
/// Beans are examined in registration order, so the error for several
/// handler beans lists them in that order.
pub fn resolve<E, C, R>(beans: &BeanSet) -> Result<ResolvedTarget<E, C, R>, ConfigurationError>
where
    E: 'static,
    C: 'static,
    R: 'static,
{
    let mut handlers: Vec<HandlerBinding> = beans
        .iter()
        .filter_map(|bean| Arc::clone(bean).as_handler())
        .collect();

    let binding = match handlers.len() {
        0 => return Err(ConfigurationError::NoHandlerBean),
        1 => handlers.remove(0),
        _ => {
            return Err(ConfigurationError::MultipleHandlerBeans {
                beans: handlers.iter().map(|h| h.bean_name().to_string()).collect(),
            });
        }
    };

    let bean = binding.bean_name().to_string();
    let tagged: Vec<&'static str> = binding.entry_point_names().collect();
    match tagged.len() {
        0 => return Err(ConfigurationError::NoEntryPoint { bean }),
        1 => {}
        _ => {
            return Err(ConfigurationError::MultipleEntryPoints {
                bean,
                methods: tagged.iter().map(|m| m.to_string()).collect(),
            });
        }
    }

    let instance = Arc::clone(binding.instance());
    let found = binding.signature();
    let entry_point = binding
        .into_entry_points::<E, C, R>()
        .map_err(|_| ConfigurationError::SignatureMismatch {
            bean: bean.clone(),
            expected: Signature::of::<E, C, R>().to_string(),
            found: found.to_string(),
        })?
        .pop()
        .ok_or_else(|| ConfigurationError::NoEntryPoint { bean: bean.clone() })?;

    #[cfg(feature = "tracing")]
    tracing::debug!(
        bean = %bean,
        method = entry_point.name(),
        beans = beans.len(),
        "resolved handler entry point"
    );

    Ok(ResolvedTarget {
        bean_name: bean,
        instance,
        entry_point,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::{Handler, Method};
    use futures::FutureExt;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Plain;
    impl Bean for Plain {}

    #[derive(Default)]
    struct Counter {
        count: AtomicUsize,
    }

    impl Counter {
        fn bump(&self, step: usize, _ctx: ()) -> usize {
            self.count.fetch_add(step, Ordering::SeqCst) + step
        }
    }

    impl Bean for Counter {
        fn bean_name(&self) -> &str {
            "counter"
        }

        fn as_handler(self: Arc<Self>) -> Option<HandlerBinding> {
            Some(HandlerBinding::new::<Self, usize, ()>(self))
        }
    }

    impl Handler<usize, ()> for Counter {
        type Output = usize;

        fn methods() -> Vec<Method<Self, usize, (), usize>> {
            vec![
                Method::plain("reset"),
                Method::<Self, usize, (), usize>::entry_point(
                    "bump",
                    |this: Arc<Self>, step: usize, ctx: ()| {
                        async move { Ok::<_, BoxError>(this.bump(step, ctx)) }.boxed()
                    },
                ),
            ]
        }
    }

    // Tags two methods as entry points.
    struct Greedy;

    impl Bean for Greedy {
        fn bean_name(&self) -> &str {
            "greedy"
        }

        fn as_handler(self: Arc<Self>) -> Option<HandlerBinding> {
            Some(HandlerBinding::new::<Self, usize, ()>(self))
        }
    }

    impl Handler<usize, ()> for Greedy {
        type Output = usize;

        fn methods() -> Vec<Method<Self, usize, (), usize>> {
            fn first(_: Arc<Greedy>, n: usize, _: ()) -> BoxFuture<'static, Result<usize, BoxError>> {
                async move { Ok::<_, BoxError>(n) }.boxed()
            }
            vec![
                Method::<Self, usize, (), usize>::entry_point("first", first),
                Method::<Self, usize, (), usize>::entry_point("second", first),
            ]
        }
    }

    // Carries the handler tag but no entry point.
    struct Idle;

    impl Bean for Idle {
        fn bean_name(&self) -> &str {
            "idle"
        }

        fn as_handler(self: Arc<Self>) -> Option<HandlerBinding> {
            Some(HandlerBinding::new::<Self, usize, ()>(self))
        }
    }

    impl Handler<usize, ()> for Idle {
        type Output = usize;

        fn methods() -> Vec<Method<Self, usize, (), usize>> {
            vec![Method::plain("sleep")]
        }
    }

    #[test]
    fn empty_set_has_no_handler() {
        let err = resolve::<usize, (), usize>(&BeanSet::new()).unwrap_err();
        assert_eq!(err, ConfigurationError::NoHandlerBean);
    }

    #[test]
    fn plain_beans_are_not_handlers() {
        let beans = BeanSet::new().with(Arc::new(Plain)).with(Arc::new(Plain));
        let err = resolve::<usize, (), usize>(&beans).unwrap_err();
        assert_eq!(err, ConfigurationError::NoHandlerBean);
    }

    #[test]
    fn two_handlers_are_rejected_in_order() {
        let beans = BeanSet::new()
            .with(Arc::new(Counter::default()))
            .with(Arc::new(Plain))
            .with(Arc::new(Idle));
        let err = resolve::<usize, (), usize>(&beans).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::MultipleHandlerBeans {
                beans: vec!["counter".into(), "idle".into()],
            }
        );
    }

    #[test]
    fn handler_without_entry_point_is_rejected() {
        let beans = BeanSet::new().with(Arc::new(Idle));
        let err = resolve::<usize, (), usize>(&beans).unwrap_err();
        assert_eq!(err, ConfigurationError::NoEntryPoint { bean: "idle".into() });
    }

    #[test]
    fn handler_with_two_entry_points_is_rejected() {
        let beans = BeanSet::new().with(Arc::new(Greedy));
        let err = resolve::<usize, (), usize>(&beans).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::MultipleEntryPoints {
                bean: "greedy".into(),
                methods: vec!["first".into(), "second".into()],
            }
        );
    }

    #[test]
    fn mismatched_signature_is_rejected() {
        let beans = BeanSet::new().with(Arc::new(Counter::default()));
        let err = resolve::<String, (), usize>(&beans).unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::SignatureMismatch { ref bean, .. } if bean == "counter"
        ));
    }

    #[tokio::test]
    async fn single_handler_resolves() {
        let beans = BeanSet::new()
            .with(Arc::new(Plain))
            .with(Arc::new(Counter::default()));
        let target = resolve::<usize, (), usize>(&beans).unwrap();
        assert_eq!(target.bean_name(), "counter");
        assert_eq!(target.method_name(), "bump");

        assert_eq!(target.invoke(2, ()).await.unwrap(), 2);
        assert_eq!(target.invoke(3, ()).await.unwrap(), 5);
    }

    #[test]
    fn resolution_is_idempotent() {
        let beans = BeanSet::new().with(Arc::new(Counter::default()));
        let first = resolve::<usize, (), usize>(&beans).unwrap();
        let second = resolve::<usize, (), usize>(&beans).unwrap();
        assert!(first.same_target(&second));

        let other = BeanSet::new().with(Arc::new(Counter::default()));
        let third = resolve::<usize, (), usize>(&other).unwrap();
        assert!(!first.same_target(&third));
    }

    #[tokio::test]
    async fn explicit_binding_skips_scanning() {
        let counter = Arc::new(Counter::default());
        let target = ResolvedTarget::<usize, (), usize>::bind(
            Arc::clone(&counter),
            "bump",
            |this: Arc<Counter>, step: usize, ctx: ()| {
                async move { Ok::<_, BoxError>(this.bump(step, ctx)) }.boxed()
            },
        );
        assert_eq!(target.bean_name(), "counter");
        assert_eq!(target.invoke(4, ()).await.unwrap(), 4);
        assert_eq!(counter.count.load(Ordering::SeqCst), 4);
    }
}
