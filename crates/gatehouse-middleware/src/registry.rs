//! Name-keyed middleware registry.

use crate::context::MiddlewareContext;
use crate::middleware::{Middleware, Next, SharedMiddleware};
use crate::types::{Request, Response};
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// Lookup table from middleware name to a shared instance.
///
/// Populated once at startup and read by the
/// [`ChainBuilder`](crate::ChainBuilder). Registering a second middleware
/// under an existing name replaces the first and returns it.
///
/// # Example
///
/// ```
/// use gatehouse_middleware::{FnMiddleware, MiddlewareRegistry};
///
/// let mut registry = MiddlewareRegistry::new();
/// registry.register(FnMiddleware::new("logging", |ctx, req, next| next.run(ctx, req)));
///
/// assert!(registry.get("logging").is_some());
/// assert!(registry.get("csrf").is_none());
/// ```
#[derive(Clone, Default)]
pub struct MiddlewareRegistry {
    entries: IndexMap<String, SharedMiddleware>,
}

impl MiddlewareRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a middleware under its own name.
    pub fn register<M: Middleware>(&mut self, middleware: M) -> Option<SharedMiddleware> {
        self.register_shared(Arc::new(middleware))
    }

    /// Registers an already shared middleware under its own name.
    pub fn register_shared(&mut self, middleware: SharedMiddleware) -> Option<SharedMiddleware> {
        let name = middleware.name().to_string();
        self.register_as(name, middleware)
    }

    /// Registers a middleware under an explicit name.
    ///
    /// Lets one implementation fill several slots, e.g. a no-op under both
    /// `session` and `csrf`. When `name` differs from the middleware's own
    /// [`name`](Middleware::name), the entry answers to `name`, so chains
    /// built from it can be searched and edited by the slot they fill.
    pub fn register_as(
        &mut self,
        name: impl Into<String>,
        middleware: SharedMiddleware,
    ) -> Option<SharedMiddleware> {
        let name = name.into();
        let middleware: SharedMiddleware = if middleware.name() == name {
            middleware
        } else {
            Arc::new(Aliased {
                name: name.clone(),
                inner: middleware,
            })
        };
        let replaced = self.entries.insert(name.clone(), middleware);
        if replaced.is_some() {
            tracing::debug!(middleware = %name, "middleware re-registered");
        }
        replaced
    }

    /// Returns the middleware registered as `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<SharedMiddleware> {
        self.entries.get(name).cloned()
    }

    /// Returns true if something is registered as `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Removes and returns the middleware registered as `name`.
    pub fn unregister(&mut self, name: &str) -> Option<SharedMiddleware> {
        self.entries.shift_remove(name)
    }

    /// Returns the registered names in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    /// Returns the number of registered middleware.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A middleware answering to a registry slot name instead of its own.
struct Aliased {
    name: String,
    inner: SharedMiddleware,
}

impl Middleware for Aliased {
    fn name(&self) -> &str {
        &self.name
    }

    fn process(&self, ctx: &mut MiddlewareContext, request: Request, next: Next<'_>) -> Response {
        self.inner.process(ctx, request, next)
    }
}

impl fmt::Debug for MiddlewareRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MiddlewareRegistry")
            .field("names", &self.names())
            .finish()
    }
}
