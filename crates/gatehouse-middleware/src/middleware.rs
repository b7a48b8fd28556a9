//! Core middleware trait and types.
//!
//! This module defines the [`Middleware`] trait every chain member
//! implements, and [`Next`], the continuation handed to each member.
//!
//! # Onion Execution
//!
//! A chain of `N` middleware is executed by an index-carrying [`Next`]:
//! position `i` runs `middlewares[i]` with a `Next` at `i + 1`. At `i == N`
//! the chain is exhausted and the continuation either hands off to the
//! integrator's handler or returns the
//! [chain-exhausted response](crate::ResponseExt::chain_exhausted).
//!
//! A middleware may call `next.run` zero times (short-circuit), once
//! (pass-through), or wrap the call with its own pre/post logic. Because
//! `run` consumes `self`, calling it twice does not compile.
//!
//! # Example
//!
//! ```
//! use gatehouse_middleware::{Middleware, MiddlewareContext, Next, Request, Response};
//!
//! struct Logging;
//!
//! impl Middleware for Logging {
//!     fn name(&self) -> &str {
//!         "logging"
//!     }
//!
//!     fn process(&self, ctx: &mut MiddlewareContext, request: Request, next: Next<'_>) -> Response {
//!         let path = request.uri().path().to_string();
//!         let response = next.run(ctx, request);
//!         tracing::info!(%path, status = %response.status(), "request finished");
//!         response
//!     }
//! }
//! ```

use crate::context::MiddlewareContext;
use crate::types::{Request, Response, ResponseExt};
use std::fmt;
use std::sync::Arc;

/// A middleware shared between the registry and every chain that uses it.
pub type SharedMiddleware = Arc<dyn Middleware>;

/// The handler a chain hands off to once every middleware has passed.
pub type Handler<'a> = Box<dyn FnOnce(&mut MiddlewareContext, Request) -> Response + 'a>;

/// The core middleware trait.
///
/// Implementations are registered once at startup and then shared by every
/// request on every thread, so they are `Send + Sync` and take `&self`.
///
/// # Invariants
///
/// - `name` is stable for the lifetime of the middleware
/// - a middleware that does not call `next.run` must return its own response
pub trait Middleware: Send + Sync + 'static {
    /// Returns the name this middleware is registered and looked up under.
    fn name(&self) -> &str;

    /// Process the request through this middleware.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The mutable middleware context
    /// * `request` - The incoming HTTP request
    /// * `next` - Continuation running the rest of the chain
    fn process(&self, ctx: &mut MiddlewareContext, request: Request, next: Next<'_>) -> Response;
}

/// Continuation that runs the remainder of a chain.
#[must_use = "a middleware that drops `next` short-circuits the chain"]
pub struct Next<'a> {
    middlewares: &'a [SharedMiddleware],
    position: usize,
    handler: Option<Handler<'a>>,
}

impl<'a> Next<'a> {
    /// Creates a continuation at the start of `middlewares`.
    pub(crate) fn new(middlewares: &'a [SharedMiddleware], handler: Option<Handler<'a>>) -> Self {
        Self {
            middlewares,
            position: 0,
            handler,
        }
    }

    /// Creates a terminal continuation that calls `handler` directly.
    ///
    /// Mostly useful for exercising a single middleware in isolation.
    pub fn handler<F>(handler: F) -> Self
    where
        F: FnOnce(&mut MiddlewareContext, Request) -> Response + 'a,
    {
        Self::new(&[], Some(Box::new(handler)))
    }

    /// Creates a terminal continuation that returns the chain-exhausted
    /// response.
    pub fn exhausted() -> Self {
        Self::new(&[], None)
    }

    /// Returns the index of the middleware this continuation will run.
    ///
    /// Equal to the chain length once the chain is exhausted.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Returns how many middleware are still to run.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.middlewares.len().saturating_sub(self.position)
    }

    /// Runs the next middleware, or the handler if the chain is exhausted.
    ///
    /// This consumes `self` so the rest of the chain runs at most once.
    pub fn run(self, ctx: &mut MiddlewareContext, request: Request) -> Response {
        let Self {
            middlewares,
            position,
            handler,
        } = self;

        match middlewares.get(position) {
            Some(middleware) => {
                let next = Self {
                    middlewares,
                    position: position + 1,
                    handler,
                };
                middleware.process(ctx, request, next)
            }
            None => match handler {
                Some(handler) => handler(ctx, request),
                None => Response::chain_exhausted(),
            },
        }
    }
}

impl fmt::Debug for Next<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next")
            .field("position", &self.position)
            .field("len", &self.middlewares.len())
            .field("has_handler", &self.handler.is_some())
            .finish()
    }
}

/// A middleware built from a name and a closure.
///
/// # Example
///
/// ```
/// use gatehouse_middleware::{FnMiddleware, Middleware};
///
/// let security = FnMiddleware::new("security", |ctx, request, next| {
///     let mut response = next.run(ctx, request);
///     response
///         .headers_mut()
///         .insert("x-frame-options", http::HeaderValue::from_static("DENY"));
///     response
/// });
///
/// assert_eq!(security.name(), "security");
/// ```
pub struct FnMiddleware<F> {
    name: String,
    func: F,
}

impl<F> FnMiddleware<F> {
    /// Creates a new function-based middleware.
    pub fn new(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&mut MiddlewareContext, Request, Next<'_>) -> Response + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> Middleware for FnMiddleware<F>
where
    F: Fn(&mut MiddlewareContext, Request, Next<'_>) -> Response + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn process(&self, ctx: &mut MiddlewareContext, request: Request, next: Next<'_>) -> Response {
        (self.func)(ctx, request, next)
    }
}

impl<F> fmt::Debug for FnMiddleware<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnMiddleware")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http::StatusCode;

    struct Visit {
        name: &'static str,
    }

    #[derive(Default)]
    struct Visited(Vec<&'static str>);

    impl Middleware for Visit {
        fn name(&self) -> &str {
            self.name
        }

        fn process(&self, ctx: &mut MiddlewareContext, request: Request, next: Next<'_>) -> Response {
            let mut visited = ctx.remove_extension::<Visited>().unwrap_or_default();
            visited.0.push(self.name);
            ctx.set_extension(visited);
            next.run(ctx, request)
        }
    }

    fn request() -> Request {
        http::Request::builder().uri("/test").body(Bytes::new()).unwrap()
    }

    fn ok_response() -> Response {
        http::Response::builder()
            .status(StatusCode::OK)
            .body(Bytes::from("OK"))
            .unwrap()
    }

    #[test]
    fn test_next_handler() {
        let mut ctx = MiddlewareContext::new();
        let next = Next::handler(|_ctx, _req| ok_response());

        let response = next.run(&mut ctx, request());
        assert_eq!(response.status(), StatusCode::OK);
        assert!(!response.is_chain_exhausted());
    }

    #[test]
    fn test_next_exhausted() {
        let mut ctx = MiddlewareContext::new();
        let next = Next::exhausted();
        assert_eq!(next.position(), 0);
        assert_eq!(next.remaining(), 0);

        assert!(next.run(&mut ctx, request()).is_chain_exhausted());
    }

    #[test]
    fn test_next_runs_in_order() {
        let middlewares: Vec<SharedMiddleware> = vec![
            Arc::new(Visit { name: "first" }),
            Arc::new(Visit { name: "second" }),
        ];

        let mut ctx = MiddlewareContext::new();
        let handler: Handler<'_> =
            Box::new(|_ctx: &mut MiddlewareContext, _req: Request| ok_response());
        let next = Next::new(&middlewares, Some(handler));
        assert_eq!(next.remaining(), 2);

        let response = next.run(&mut ctx, request());
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(ctx.get_extension::<Visited>().unwrap().0, vec!["first", "second"]);
    }

    #[test]
    fn test_fn_middleware_short_circuits() {
        let deny = FnMiddleware::new("deny", |_ctx, _req, _next| {
            Response::error(StatusCode::FORBIDDEN, "nope")
        });
        assert_eq!(deny.name(), "deny");

        let mut ctx = MiddlewareContext::new();
        let response = deny.process(
            &mut ctx,
            request(),
            Next::handler(|_ctx, _req| panic!("handler must not run")),
        );
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
