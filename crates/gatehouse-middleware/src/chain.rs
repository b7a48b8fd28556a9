//! Ordered, mutable middleware chains.
//!
//! A [`Chain`] holds shared references to middleware owned by the
//! [`MiddlewareRegistry`](crate::MiddlewareRegistry) and runs them in
//! stored order. Structural operations (`add`, `insert`, `remove`, `clear`)
//! take `&mut self`; a chain shared behind an `Arc` is therefore frozen for
//! as long as it serves requests.
//!
//! Names are not required to be unique. `get` and `remove` act on the first
//! middleware with a matching name.

use crate::context::MiddlewareContext;
use crate::middleware::{Handler, Next, SharedMiddleware};
use crate::types::{Request, Response};
use std::fmt;

/// An ordered sequence of middleware executed onion-style.
///
/// # Example
///
/// ```
/// use gatehouse_middleware::{
///     Chain, FnMiddleware, MiddlewareContext, ResponseExt, SharedMiddleware,
/// };
/// use bytes::Bytes;
/// use std::sync::Arc;
///
/// let logging: SharedMiddleware =
///     Arc::new(FnMiddleware::new("logging", |ctx, req, next| next.run(ctx, req)));
/// let security: SharedMiddleware =
///     Arc::new(FnMiddleware::new("security", |ctx, req, next| next.run(ctx, req)));
///
/// let mut chain = Chain::new();
/// chain.add(logging);
/// chain.insert(0, [security]);
///
/// assert_eq!(chain.names(), vec!["security", "logging"]);
///
/// let request = http::Request::builder().uri("/").body(Bytes::new()).unwrap();
/// let response = chain.process(&mut MiddlewareContext::new(), request);
/// assert!(response.is_chain_exhausted());
/// ```
#[derive(Clone, Default)]
pub struct Chain {
    middlewares: Vec<SharedMiddleware>,
}

impl Chain {
    /// Creates an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a chain from middleware in execution order.
    #[must_use]
    pub fn from_middlewares(middlewares: Vec<SharedMiddleware>) -> Self {
        Self { middlewares }
    }

    /// Appends a middleware at the end of the chain.
    pub fn add(&mut self, middleware: SharedMiddleware) -> &mut Self {
        self.middlewares.push(middleware);
        self
    }

    /// Appends several middleware at the end of the chain, keeping their order.
    pub fn extend<I>(&mut self, middlewares: I) -> &mut Self
    where
        I: IntoIterator<Item = SharedMiddleware>,
    {
        self.middlewares.extend(middlewares);
        self
    }

    /// Inserts middleware at `position`, keeping their order.
    ///
    /// `position` is an index into the current chain. A negative position
    /// or one past the end appends instead of failing.
    pub fn insert<I>(&mut self, position: isize, middlewares: I) -> &mut Self
    where
        I: IntoIterator<Item = SharedMiddleware>,
    {
        let len = self.middlewares.len();
        let at = usize::try_from(position).map_or(len, |p| p.min(len));
        self.middlewares.splice(at..at, middlewares);
        self
    }

    /// Removes the first middleware named `name`.
    ///
    /// Returns false, leaving the chain untouched, if none matches.
    pub fn remove(&mut self, name: &str) -> bool {
        match self.position(name) {
            Some(index) => {
                self.middlewares.remove(index);
                true
            }
            None => false,
        }
    }

    /// Returns the first middleware named `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<SharedMiddleware> {
        self.middlewares.iter().find(|m| m.name() == name).cloned()
    }

    /// Returns the index of the first middleware named `name`.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.middlewares.iter().position(|m| m.name() == name)
    }

    /// Returns true if a middleware named `name` is in the chain.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Returns a copy of the current order.
    ///
    /// Changing the returned vector does not change the chain.
    #[must_use]
    pub fn list(&self) -> Vec<SharedMiddleware> {
        self.middlewares.clone()
    }

    /// Returns the middleware names in execution order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.middlewares.iter().map(|m| m.name()).collect()
    }

    /// Removes every middleware.
    pub fn clear(&mut self) {
        self.middlewares.clear();
    }

    /// Returns the number of middleware in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    /// Returns true if the chain has no middleware.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }

    /// Runs the request through the chain.
    ///
    /// If every middleware passes the request on, the result is the
    /// [chain-exhausted response](crate::ResponseExt::chain_exhausted) and
    /// dispatching to the business handler is up to the caller.
    pub fn process(&self, ctx: &mut MiddlewareContext, request: Request) -> Response {
        Next::new(&self.middlewares, None).run(ctx, request)
    }

    /// Runs the request through the chain, handing off to `handler` when
    /// every middleware has passed it on.
    ///
    /// A middleware that short-circuits prevents `handler` from running.
    pub fn process_with<H>(&self, ctx: &mut MiddlewareContext, request: Request, handler: H) -> Response
    where
        H: FnOnce(&mut MiddlewareContext, Request) -> Response,
    {
        let handler: Handler<'_> = Box::new(handler);
        Next::new(&self.middlewares, Some(handler)).run(ctx, request)
    }
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl FromIterator<SharedMiddleware> for Chain {
    fn from_iter<T: IntoIterator<Item = SharedMiddleware>>(iter: T) -> Self {
        Self::from_middlewares(iter.into_iter().collect())
    }
}
