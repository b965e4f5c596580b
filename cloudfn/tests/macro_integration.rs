//! Integration tests for the `#[handler]`, `#[entry_point]` and
//! `#[derive(Bean)]` macros.

#![cfg(feature = "macros")]

use cloudfn::{
    Bean, BeanSet, ConfigurationError, Dispatcher, Handler, InvocationContext, ResolvedTarget,
    handler,
};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicU32, Ordering},
};
use thiserror::Error;

// Test: async entry point returning Result, custom bean name
#[derive(Debug, Error, PartialEq, Eq)]
enum GreetError {
    #[error("name must not be empty")]
    EmptyName,
}

struct Greeter {
    greeting: String,
}

#[handler(name = "greeter")]
impl Greeter {
    fn new(greeting: &str) -> Self {
        Self {
            greeting: greeting.to_string(),
        }
    }

    fn greeting(&self) -> &str {
        &self.greeting
    }

    #[entry_point]
    async fn greet(&self, name: String, ctx: InvocationContext) -> Result<String, GreetError> {
        if name.is_empty() {
            return Err(GreetError::EmptyName);
        }
        Ok(format!("{}, {name} ({})", self.greeting(), ctx.request_id))
    }
}

#[test]
fn test_handler_method_table() {
    let methods = <Greeter as Handler<String, InvocationContext>>::methods();
    let rows: Vec<_> = methods
        .iter()
        .map(|m| (m.name(), m.is_entry_point()))
        .collect();
    // `new` has no receiver and is not part of the table.
    assert_eq!(rows, [("greeting", false), ("greet", true)]);
}

#[test]
fn test_handler_name_override() {
    assert_eq!(Greeter::new("Hi").bean_name(), "greeter");
}

#[tokio::test]
async fn test_async_entry_point() {
    let beans = BeanSet::new().with(Arc::new(Greeter::new("Hello")));
    let dispatcher = Dispatcher::<String, InvocationContext, String>::from_beans(&beans).unwrap();

    let out = dispatcher
        .dispatch("Ada".into(), InvocationContext::new("req-7"))
        .await
        .unwrap();
    assert_eq!(out, "Hello, Ada (req-7)");
}

#[tokio::test]
async fn test_entry_point_error_is_unchanged() {
    let beans = BeanSet::new().with(Arc::new(Greeter::new("Hello")));
    let dispatcher = Dispatcher::<String, InvocationContext, String>::from_beans(&beans).unwrap();

    let err = dispatcher
        .dispatch(String::new(), InvocationContext::new("req-8"))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "name must not be empty");

    let inner = err.into_invocation().unwrap();
    assert_eq!(inner.downcast_ref::<GreetError>(), Some(&GreetError::EmptyName));
}

// Test: sync entry point with no return type
#[derive(Default)]
struct Sink {
    received: Mutex<Vec<(u32, &'static str)>>,
}

#[handler]
impl Sink {
    #[cloudfn::entry_point]
    fn accept(&self, value: u32, tag: &'static str) {
        self.received.lock().unwrap().push((value, tag));
    }
}

#[tokio::test]
async fn test_unit_entry_point() {
    let sink = Arc::new(Sink::default());
    let beans = BeanSet::new().with(Arc::clone(&sink));
    let dispatcher = Dispatcher::<u32, &'static str, ()>::from_beans(&beans).unwrap();

    dispatcher.dispatch(1, "one").await.unwrap();
    dispatcher.dispatch(2, "two").await.unwrap();

    assert_eq!(*sink.received.lock().unwrap(), [(1, "one"), (2, "two")]);
    assert_eq!(dispatcher.target().unwrap().bean_name(), "Sink");
}

// Test: Result through a path alias
struct Reader {
    reads: AtomicU32,
}

#[handler]
impl Reader {
    #[entry_point]
    fn read(&self, limit: u32, _ctx: ()) -> std::io::Result<u32> {
        let reads = self.reads.fetch_add(1, Ordering::SeqCst) + 1;
        if reads > limit {
            return Err(std::io::Error::other("read limit reached"));
        }
        Ok(reads)
    }
}

#[tokio::test]
async fn test_result_alias_output() {
    let beans = BeanSet::new().with(Arc::new(Reader {
        reads: AtomicU32::new(0),
    }));
    let dispatcher = Dispatcher::<u32, (), u32>::from_beans(&beans).unwrap();

    assert_eq!(dispatcher.dispatch(2, ()).await.unwrap(), 1);
    assert_eq!(dispatcher.dispatch(2, ()).await.unwrap(), 2);

    let err = dispatcher.dispatch(2, ()).await.unwrap_err();
    let inner = err.into_invocation().unwrap();
    assert!(inner.downcast_ref::<std::io::Error>().is_some());
}

// Test: #[derive(Bean)]
#[derive(Bean)]
#[bean(name = "settings")]
struct Settings {
    #[allow(dead_code)]
    region: String,
}

#[derive(Bean)]
struct Metrics;

#[test]
fn test_derived_beans_are_plain() {
    let settings = Arc::new(Settings {
        region: "eu-west-1".into(),
    });
    assert_eq!(settings.bean_name(), "settings");
    assert_eq!(Metrics.bean_name(), "Metrics");
    assert!(settings.as_handler().is_none());
}

#[tokio::test]
async fn test_derived_beans_beside_handler() {
    let beans = BeanSet::new()
        .with(Arc::new(Metrics))
        .with(Arc::new(Greeter::new("Hey")))
        .with(Arc::new(Settings {
            region: "us-east-1".into(),
        }));
    let dispatcher = Dispatcher::<String, InvocationContext, String>::from_beans(&beans).unwrap();
    assert_eq!(dispatcher.target().unwrap().bean_name(), "greeter");
    assert_eq!(
        dispatcher
            .dispatch("Bo".into(), InvocationContext::new("r"))
            .await
            .unwrap(),
        "Hey, Bo (r)"
    );
}

#[test]
fn test_two_macro_handlers_are_rejected() {
    let beans = BeanSet::new()
        .with(Arc::new(Greeter::new("a")))
        .with(Arc::new(Sink::default()));
    let err = cloudfn::resolve::<String, InvocationContext, String>(&beans).unwrap_err();
    assert_eq!(
        err,
        ConfigurationError::MultipleHandlerBeans {
            beans: vec!["greeter".into(), "Sink".into()],
        }
    );
}

#[tokio::test]
async fn test_explicit_binding_of_macro_handler() {
    use futures::FutureExt;

    let greeter = Arc::new(Greeter::new("Yo"));
    let target = ResolvedTarget::<String, InvocationContext, String>::bind(
        greeter,
        "greet",
        |this: Arc<Greeter>, name: String, ctx: InvocationContext| {
            async move { this.greet(name, ctx).await.map_err(cloudfn::BoxError::from) }.boxed()
        },
    );
    let dispatcher = Dispatcher::from_target(target);

    let out = dispatcher
        .dispatch("Cy".into(), InvocationContext::new("r2"))
        .await
        .unwrap();
    assert_eq!(out, "Yo, Cy (r2)");
}
