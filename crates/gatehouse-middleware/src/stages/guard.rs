//! Enforcement shared by the `access` and `admin` stages.
//!
//! A [`Guard`] turns a required [`AccessLevel`] and the caller's identity
//! into an [`Enforcement`], and an enforcement into the response a denied
//! caller receives:
//!
//! | Required        | Anonymous        | Signed in        | Admin   |
//! |-----------------|------------------|------------------|---------|
//! | `Public`        | allowed          | allowed          | allowed |
//! | `Authenticated` | 303 → login path | allowed          | allowed |
//! | `Admin`         | 303 → login path | 403 JSON         | allowed |

use crate::context::MiddlewareContext;
use crate::error::{ChainError, ChainResult};
use crate::types::{Request, Response, ResponseExt};
use gatehouse_access::AccessLevel;
use gatehouse_core::ADMIN_ROLE;
use http::{HeaderValue, StatusCode};
use std::fmt;
use std::sync::Arc;

/// Default redirect target for callers who must sign in.
pub const DEFAULT_LOGIN_PATH: &str = "/login";

/// Message in the 403 body sent to signed-in non-admins.
pub const ADMIN_REQUIRED_MESSAGE: &str = "Admin access required";

/// Answers identity questions about the current request.
///
/// Enforcement never looks up sessions or verifies tokens itself; it asks a
/// resolver. The default, [`ContextIdentity`], reads the
/// [`CallerIdentity`](gatehouse_core::CallerIdentity) an earlier `auth`
/// middleware stored in the context.
pub trait IdentityResolver: Send + Sync + 'static {
    /// Returns true if the caller is signed in.
    fn is_authenticated(&self, ctx: &MiddlewareContext, request: &Request) -> bool;

    /// Returns true if the caller is an administrator.
    fn is_admin(&self, ctx: &MiddlewareContext, request: &Request) -> bool;
}

/// Resolves identity from [`MiddlewareContext::identity`].
#[derive(Debug, Clone)]
pub struct ContextIdentity {
    admin_role: String,
}

impl ContextIdentity {
    /// Treats callers carrying `admin_role` as administrators.
    pub fn with_admin_role(admin_role: impl Into<String>) -> Self {
        Self {
            admin_role: admin_role.into(),
        }
    }

    /// Returns the role that marks an administrator.
    #[must_use]
    pub fn admin_role(&self) -> &str {
        &self.admin_role
    }
}

impl Default for ContextIdentity {
    fn default() -> Self {
        Self::with_admin_role(ADMIN_ROLE)
    }
}

impl IdentityResolver for ContextIdentity {
    fn is_authenticated(&self, ctx: &MiddlewareContext, _request: &Request) -> bool {
        ctx.identity().is_authenticated()
    }

    fn is_admin(&self, ctx: &MiddlewareContext, _request: &Request) -> bool {
        let identity = ctx.identity();
        identity.is_authenticated() && identity.has_role(&self.admin_role)
    }
}

/// What enforcement decided for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enforcement {
    /// The request continues down the chain.
    Allowed,
    /// The caller is anonymous and is sent to the login path.
    LoginRequired,
    /// The caller is signed in but not an administrator.
    AdminRequired,
}

impl Enforcement {
    /// Returns true if the request may continue.
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// Returns the name used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Allowed => "allowed",
            Self::LoginRequired => "login_required",
            Self::AdminRequired => "admin_required",
        }
    }
}

impl fmt::Display for Enforcement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps required levels to allow, redirect or forbid.
#[derive(Clone)]
pub struct Guard {
    login_path: String,
    location: HeaderValue,
    resolver: Arc<dyn IdentityResolver>,
}

impl Guard {
    /// Creates a guard redirecting to [`DEFAULT_LOGIN_PATH`] and reading
    /// identity from the context.
    #[must_use]
    pub fn new() -> Self {
        Self {
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            location: HeaderValue::from_static(DEFAULT_LOGIN_PATH),
            resolver: Arc::new(ContextIdentity::default()),
        }
    }

    /// Sets the redirect target for anonymous callers.
    ///
    /// The path must be absolute and usable as a `Location` header.
    pub fn with_login_path(mut self, path: &str) -> ChainResult<Self> {
        if !path.starts_with('/') {
            return Err(ChainError::invalid_login_path(path, "must start with '/'"));
        }
        self.location = HeaderValue::from_str(path)
            .map_err(|_| ChainError::invalid_login_path(path, "not a valid header value"))?;
        self.login_path = path.to_string();
        Ok(self)
    }

    /// Replaces the identity resolver.
    #[must_use]
    pub fn with_resolver<R: IdentityResolver>(mut self, resolver: R) -> Self {
        self.resolver = Arc::new(resolver);
        self
    }

    /// Replaces the identity resolver with a shared one.
    #[must_use]
    pub fn with_shared_resolver(mut self, resolver: Arc<dyn IdentityResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Returns the redirect target for anonymous callers.
    #[must_use]
    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// Decides whether the caller meets `required`.
    #[must_use]
    pub fn check(&self, required: AccessLevel, ctx: &MiddlewareContext, request: &Request) -> Enforcement {
        match required {
            AccessLevel::Public => Enforcement::Allowed,
            AccessLevel::Authenticated => {
                if self.resolver.is_authenticated(ctx, request) {
                    Enforcement::Allowed
                } else {
                    Enforcement::LoginRequired
                }
            }
            AccessLevel::Admin => {
                if !self.resolver.is_authenticated(ctx, request) {
                    Enforcement::LoginRequired
                } else if self.resolver.is_admin(ctx, request) {
                    Enforcement::Allowed
                } else {
                    Enforcement::AdminRequired
                }
            }
        }
    }

    /// Returns the response for a denied request, or `None` if allowed.
    #[must_use]
    pub fn deny(&self, enforcement: Enforcement) -> Option<Response> {
        match enforcement {
            Enforcement::Allowed => None,
            Enforcement::LoginRequired => Some(Response::redirect(self.location.clone())),
            Enforcement::AdminRequired => Some(Response::json_error(
                StatusCode::FORBIDDEN,
                ADMIN_REQUIRED_MESSAGE,
            )),
        }
    }
}

impl Default for Guard {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard")
            .field("login_path", &self.login_path)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use gatehouse_core::CallerIdentity;

    fn request() -> Request {
        http::Request::builder().uri("/x").body(Bytes::new()).unwrap()
    }

    fn ctx_with(identity: CallerIdentity) -> MiddlewareContext {
        let mut ctx = MiddlewareContext::new();
        ctx.set_identity(identity);
        ctx
    }

    #[test]
    fn test_enforcement_matrix() {
        let guard = Guard::new();
        let anonymous = ctx_with(CallerIdentity::anonymous());
        let user = ctx_with(CallerIdentity::user("u1", "u1@example.com"));
        let admin = ctx_with(CallerIdentity::admin("a1", "a1@example.com"));
        let req = request();

        let cases = [
            (AccessLevel::Public, &anonymous, Enforcement::Allowed),
            (AccessLevel::Public, &user, Enforcement::Allowed),
            (AccessLevel::Authenticated, &anonymous, Enforcement::LoginRequired),
            (AccessLevel::Authenticated, &user, Enforcement::Allowed),
            (AccessLevel::Authenticated, &admin, Enforcement::Allowed),
            (AccessLevel::Admin, &anonymous, Enforcement::LoginRequired),
            (AccessLevel::Admin, &user, Enforcement::AdminRequired),
            (AccessLevel::Admin, &admin, Enforcement::Allowed),
        ];

        for (level, ctx, expected) in cases {
            assert_eq!(guard.check(level, ctx, &req), expected, "{level}");
        }
    }

    #[test]
    fn test_deny_responses() {
        let guard = Guard::new();
        assert!(guard.deny(Enforcement::Allowed).is_none());

        let redirect = guard.deny(Enforcement::LoginRequired).unwrap();
        assert_eq!(redirect.status(), StatusCode::SEE_OTHER);
        assert_eq!(redirect.headers()[http::header::LOCATION], "/login");

        let forbidden = guard.deny(Enforcement::AdminRequired).unwrap();
        assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            forbidden.body().as_ref(),
            br#"{"success":false,"message":"Admin access required"}"#
        );
    }

    #[test]
    fn test_custom_login_path() {
        let guard = Guard::new().with_login_path("/auth/sign-in").unwrap();
        assert_eq!(guard.login_path(), "/auth/sign-in");
        let redirect = guard.deny(Enforcement::LoginRequired).unwrap();
        assert_eq!(redirect.headers()[http::header::LOCATION], "/auth/sign-in");
    }

    #[test]
    fn test_invalid_login_path() {
        assert!(Guard::new().with_login_path("login").is_err());
        assert!(Guard::new().with_login_path("/log\nin").is_err());
    }

    #[test]
    fn test_custom_admin_role() {
        let guard = Guard::new().with_resolver(ContextIdentity::with_admin_role("staff"));
        let staff = ctx_with(CallerIdentity::user("s1", "s1@example.com").with_role("staff"));
        let admin = ctx_with(CallerIdentity::admin("a1", "a1@example.com"));

        assert_eq!(guard.check(AccessLevel::Admin, &staff, &request()), Enforcement::Allowed);
        assert_eq!(
            guard.check(AccessLevel::Admin, &admin, &request()),
            Enforcement::AdminRequired
        );
    }

    struct HeaderResolver;

    impl IdentityResolver for HeaderResolver {
        fn is_authenticated(&self, _ctx: &MiddlewareContext, request: &Request) -> bool {
            request.headers().contains_key("x-user")
        }

        fn is_admin(&self, _ctx: &MiddlewareContext, request: &Request) -> bool {
            request.headers().get("x-user").is_some_and(|v| v == "root")
        }
    }

    #[test]
    fn test_resolver_may_read_request() {
        let guard = Guard::new().with_resolver(HeaderResolver);
        let ctx = MiddlewareContext::new();
        let root = http::Request::builder()
            .uri("/x")
            .header("x-user", "root")
            .body(Bytes::new())
            .unwrap();

        assert_eq!(guard.check(AccessLevel::Admin, &ctx, &root), Enforcement::Allowed);
        assert_eq!(
            guard.check(AccessLevel::Authenticated, &ctx, &request()),
            Enforcement::LoginRequired
        );
    }
}
