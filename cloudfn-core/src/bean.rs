//! # Beans and the Handler Tag
//!
//! A bean is any live application object the host hands to the harness.
//! Exactly one of them carries the handler tag: its [`Bean::as_handler`]
//! returns a [`HandlerBinding`] instead of `None`.
//!
//! Plain beans implement [`Bean`] with the default methods (or use
//! `#[derive(Bean)]`). Handler beans get both the tag and their method table
//! from `#[handler]`.

use crate::handler::HandlerBinding;
use std::sync::Arc;

/// A live application object that may be offered to the resolver.
///
/// # Example
///
/// ```rust,ignore
/// struct Clock;
///
/// impl Bean for Clock {}
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a bean",
    label = "missing `Bean` implementation",
    note = "Derive `Bean` for plain objects, or use `#[handler]` on the impl block of a handler."
)]
pub trait Bean: Send + Sync + 'static {
    /// Name used in diagnostics. Defaults to the type name.
    fn bean_name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// The handler tag.
    ///
    /// Returns `None` for plain beans. A handler bean returns the binding of
    /// its method table to this instance.
    fn as_handler(self: Arc<Self>) -> Option<HandlerBinding> {
        None
    }
}

/// An insertion-ordered snapshot of the live application objects.
///
/// # Example
/// ```ignore
/// let beans = BeanSet::new()
///     .with(Arc::new(Clock))
///     .with(Arc::new(Demo::default()));
/// ```
#[derive(Clone, Default)]
pub struct BeanSet {
    beans: Vec<Arc<dyn Bean>>,
}

impl BeanSet {
    /// Create a new empty bean set.
    pub fn new() -> Self {
        Self { beans: Vec::new() }
    }

    /// Add a bean.
    pub fn with<B: Bean>(mut self, bean: Arc<B>) -> Self {
        self.register(bean);
        self
    }

    /// Add a bean (mutable version).
    pub fn register<B: Bean>(&mut self, bean: Arc<B>) {
        self.beans.push(bean);
    }

    /// Add an already type-erased bean.
    pub fn register_dyn(&mut self, bean: Arc<dyn Bean>) {
        self.beans.push(bean);
    }

    /// Iterate over the beans in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Bean>> {
        self.beans.iter()
    }

    /// Get the number of beans.
    pub fn len(&self) -> usize {
        self.beans.len()
    }

    /// Check if the set has no beans.
    pub fn is_empty(&self) -> bool {
        self.beans.is_empty()
    }
}

impl std::fmt::Debug for BeanSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.beans.iter().map(|b| b.bean_name()))
            .finish()
    }
}

impl FromIterator<Arc<dyn Bean>> for BeanSet {
    fn from_iter<I: IntoIterator<Item = Arc<dyn Bean>>>(iter: I) -> Self {
        Self {
            beans: iter.into_iter().collect(),
        }
    }
}

impl Extend<Arc<dyn Bean>> for BeanSet {
    fn extend<I: IntoIterator<Item = Arc<dyn Bean>>>(&mut self, iter: I) {
        self.beans.extend(iter);
    }
}

impl<'a> IntoIterator for &'a BeanSet {
    type Item = &'a Arc<dyn Bean>;
    type IntoIter = std::slice::Iter<'a, Arc<dyn Bean>>;

    fn into_iter(self) -> Self::IntoIter {
        self.beans.iter()
    }
}
