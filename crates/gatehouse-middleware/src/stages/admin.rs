//! The `admin` stage: an unconditional administrator guard.
//!
//! Unlike `access`, this stage ignores path policy. Every request reaching
//! it must come from an administrator, which makes the `admin` chain safe
//! even for routes the access tables forgot to list under an admin prefix.

use super::guard::{Guard, IdentityResolver};
use crate::context::MiddlewareContext;
use crate::error::ChainResult;
use crate::middleware::{Middleware, Next};
use crate::types::{Request, Response};
use gatehouse_access::AccessLevel;

/// Name the `admin` stage is registered under.
pub const ADMIN_STAGE: &str = "admin";

/// Lets only administrators through.
#[derive(Debug, Clone, Default)]
pub struct AdminMiddleware {
    guard: Guard,
}

impl AdminMiddleware {
    /// Creates the stage with the default [`Guard`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
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
}

impl Middleware for AdminMiddleware {
    fn name(&self) -> &str {
        ADMIN_STAGE
    }

    fn process(&self, ctx: &mut MiddlewareContext, request: Request, next: Next<'_>) -> Response {
        let enforcement = self.guard.check(AccessLevel::Admin, ctx, &request);

        if let Some(response) = self.guard.deny(enforcement) {
            tracing::debug!(
                request_id = %ctx.request_id(),
                caller = %ctx.identity().log_id(),
                path = request.uri().path(),
                outcome = %enforcement,
                "admin guard denied request"
            );
            return response;
        }

        next.run(ctx, request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use gatehouse_core::CallerIdentity;
    use http::StatusCode;

    fn request() -> Request {
        // A public path: the admin guard must not care.
        http::Request::builder().uri("/health").body(Bytes::new()).unwrap()
    }

    fn status_for(identity: CallerIdentity) -> StatusCode {
        let mut ctx = MiddlewareContext::new();
        ctx.set_identity(identity);
        AdminMiddleware::new()
            .process(&mut ctx, request(), Next::exhausted())
            .status()
    }

    #[test]
    fn test_name() {
        assert_eq!(AdminMiddleware::new().name(), "admin");
    }

    #[test]
    fn test_guard_ignores_path() {
        assert_eq!(status_for(CallerIdentity::anonymous()), StatusCode::SEE_OTHER);
        assert_eq!(
            status_for(CallerIdentity::user("u1", "u1@example.com")),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_for(CallerIdentity::admin("a1", "a1@example.com")),
            StatusCode::OK
        );
    }

    #[test]
    fn test_login_path() {
        let stage = AdminMiddleware::new().with_login_path("/sso").unwrap();
        let response = stage.process(&mut MiddlewareContext::new(), request(), Next::exhausted());
        assert_eq!(response.headers()[http::header::LOCATION], "/sso");
    }
}
