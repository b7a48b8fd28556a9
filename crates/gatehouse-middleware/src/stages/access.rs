//! The `access` stage: path policy enforcement.
//!
//! The stage asks the [`AccessManager`] which level the request path and
//! method need, then lets its [`Guard`] allow the request, redirect an
//! anonymous caller to the login path, or answer 403 to a signed-in
//! non-admin.
//!
//! # Chain Position
//!
//! Runs after `auth`, which establishes the caller identity:
//!
//! ```text
//! logging → security → session → csrf → auth → [access] → handler
//! ```

use super::guard::{Enforcement, Guard, IdentityResolver};
use crate::context::MiddlewareContext;
use crate::error::ChainResult;
use crate::middleware::{Middleware, Next};
use crate::types::{Request, Response};
use gatehouse_access::{AccessLevel, AccessManager, DecisionSource};
use std::sync::Arc;

/// Name the `access` stage is registered under.
pub const ACCESS_STAGE: &str = "access";

/// Access decision stored in the context for auditing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessOutcome {
    /// The level the path required.
    pub level: AccessLevel,
    /// What produced the level.
    pub source: DecisionSource,
    /// What enforcement did with it.
    pub enforcement: Enforcement,
}

impl AccessOutcome {
    /// Returns true if the request was let through.
    #[must_use]
    pub fn allowed(&self) -> bool {
        self.enforcement.is_allowed()
    }
}

/// Enforces the access policy of an [`AccessManager`].
///
/// # Example
///
/// ```
/// use gatehouse_access::AccessManager;
/// use gatehouse_middleware::stages::AccessMiddleware;
/// use gatehouse_middleware::{MiddlewareContext, Next, Middleware};
/// use bytes::Bytes;
/// use http::StatusCode;
/// use std::sync::Arc;
///
/// let manager = Arc::new(AccessManager::with_defaults());
/// let access = AccessMiddleware::new(manager);
///
/// let request = http::Request::builder().uri("/dashboard").body(Bytes::new()).unwrap();
/// let response = access.process(&mut MiddlewareContext::new(), request, Next::exhausted());
///
/// assert_eq!(response.status(), StatusCode::SEE_OTHER);
/// assert_eq!(response.headers()["location"], "/login");
/// ```
#[derive(Debug, Clone)]
pub struct AccessMiddleware {
    manager: Arc<AccessManager>,
    guard: Guard,
}

impl AccessMiddleware {
    /// Creates the stage with the default [`Guard`].
    #[must_use]
    pub fn new(manager: Arc<AccessManager>) -> Self {
        Self {
            manager,
            guard: Guard::new(),
        }
    }

    /// Replaces the guard.
    #[must_use]
    pub fn with_guard(mut self, guard: Guard) -> Self {
        self.guard = guard;
        self
    }

    /// Sets the redirect target for anonymous callers.
    pub fn with_login_path(mut self, path: &str) -> ChainResult<Self> {
        self.guard = self.guard.with_login_path(path)?;
        Ok(self)
    }

    /// Replaces the identity resolver.
    #[must_use]
    pub fn with_resolver<R: IdentityResolver>(mut self, resolver: R) -> Self {
        self.guard = self.guard.with_resolver(resolver);
        self
    }

    /// Returns the access manager.
    #[must_use]
    pub fn manager(&self) -> &AccessManager {
        &self.manager
    }

    /// Returns the guard.
    #[must_use]
    pub fn guard(&self) -> &Guard {
        &self.guard
    }
}

impl Middleware for AccessMiddleware {
    fn name(&self) -> &str {
        ACCESS_STAGE
    }

    fn process(&self, ctx: &mut MiddlewareContext, request: Request, next: Next<'_>) -> Response {
        let decision = self
            .manager
            .explain(request.uri().path(), request.method());
        let enforcement = self.guard.check(decision.level, ctx, &request);

        tracing::debug!(
            request_id = %ctx.request_id(),
            caller = %ctx.identity().log_id(),
            method = %request.method(),
            path = request.uri().path(),
            level = %decision.level,
            source = %decision.source,
            outcome = %enforcement,
            "access decision"
        );

        ctx.set_extension(AccessOutcome {
            level: decision.level,
            source: decision.source,
            enforcement,
        });

        match self.guard.deny(enforcement) {
            Some(response) => response,
            None => next.run(ctx, request),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ResponseExt;
    use bytes::Bytes;
    use gatehouse_access::{AccessConfig, AccessRule};
    use gatehouse_core::CallerIdentity;
    use http::{Method, StatusCode};

    fn stage() -> AccessMiddleware {
        AccessMiddleware::new(Arc::new(AccessManager::with_defaults()))
    }

    fn request(method: Method, path: &str) -> Request {
        http::Request::builder()
            .method(method)
            .uri(path)
            .body(Bytes::new())
            .unwrap()
    }

    fn run(stage: &AccessMiddleware, ctx: &mut MiddlewareContext, req: Request) -> (Response, bool) {
        let mut reached = false;
        let response = stage.process(
            ctx,
            req,
            Next::handler(|_ctx, _req| {
                reached = true;
                Response::error(StatusCode::OK, "handler")
            }),
        );
        (response, reached)
    }

    #[test]
    fn test_name() {
        assert_eq!(stage().name(), "access");
    }

    #[test]
    fn test_public_path_passes_anonymous() {
        let mut ctx = MiddlewareContext::new();
        let (response, reached) = run(&stage(), &mut ctx, request(Method::GET, "/login"));

        assert!(reached);
        assert_eq!(response.status(), StatusCode::OK);
        let outcome = ctx.get_extension::<AccessOutcome>().unwrap();
        assert_eq!(outcome.level, AccessLevel::Public);
        assert!(outcome.allowed());
    }

    #[test]
    fn test_authenticated_path_redirects_anonymous() {
        let mut ctx = MiddlewareContext::new();
        let (response, reached) = run(&stage(), &mut ctx, request(Method::GET, "/forms"));

        assert!(!reached);
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[http::header::LOCATION], "/login");
        assert_eq!(
            ctx.get_extension::<AccessOutcome>().unwrap().enforcement,
            Enforcement::LoginRequired
        );
    }

    #[test]
    fn test_authenticated_path_passes_user() {
        let mut ctx = MiddlewareContext::new();
        ctx.set_identity(CallerIdentity::user("u1", "u1@example.com"));
        let (response, reached) = run(&stage(), &mut ctx, request(Method::POST, "/settings"));

        assert!(reached);
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_admin_path() {
        let stage = stage();

        let mut anonymous = MiddlewareContext::new();
        let (response, reached) = run(&stage, &mut anonymous, request(Method::GET, "/admin/users"));
        assert!(!reached);
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let mut user = MiddlewareContext::new();
        user.set_identity(CallerIdentity::user("u1", "u1@example.com"));
        let (response, reached) = run(&stage, &mut user, request(Method::GET, "/admin/users"));
        assert!(!reached);
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let mut admin = MiddlewareContext::new();
        admin.set_identity(CallerIdentity::admin("a1", "a1@example.com"));
        let (response, reached) = run(&stage, &mut admin, request(Method::GET, "/admin/users"));
        assert!(reached);
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_custom_login_path_and_rule() {
        let mut manager = AccessManager::with_config(AccessConfig::empty()).unwrap();
        manager.add_rule(AccessRule::new("/embed/:id", AccessLevel::Public)).unwrap();
        let stage = AccessMiddleware::new(Arc::new(manager))
            .with_login_path("/auth/login")
            .unwrap();

        let mut ctx = MiddlewareContext::new();
        let (_, reached) = run(&stage, &mut ctx, request(Method::GET, "/embed/42"));
        assert!(reached);

        let mut ctx = MiddlewareContext::new();
        let (response, _) = run(&stage, &mut ctx, request(Method::GET, "/other"));
        assert_eq!(response.headers()[http::header::LOCATION], "/auth/login");
    }

    #[test]
    fn test_exhausted_continuation_passes_through() {
        let mut ctx = MiddlewareContext::new();
        let response = stage().process(&mut ctx, request(Method::GET, "/health"), Next::exhausted());
        assert!(response.is_chain_exhausted());
    }
}
