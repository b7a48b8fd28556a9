//! Middleware context types.
//!
//! The [`MiddlewareContext`] carries per-request state through a chain. The
//! identity in it is written by whatever authentication middleware the
//! integrator registers and read by the enforcement stages.

use gatehouse_core::{CallerIdentity, RequestId};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Context that flows through the middleware chain.
///
/// # Example
///
/// ```
/// use gatehouse_middleware::MiddlewareContext;
/// use gatehouse_core::CallerIdentity;
///
/// let mut ctx = MiddlewareContext::new();
/// assert!(!ctx.identity().is_authenticated());
///
/// ctx.set_identity(CallerIdentity::admin("u-1", "ada@example.com"));
/// assert!(ctx.identity().is_admin());
/// ```
#[derive(Debug)]
pub struct MiddlewareContext {
    /// Unique identifier for this request.
    request_id: RequestId,

    /// The identity of the caller, anonymous until authenticated.
    identity: CallerIdentity,

    /// When the request entered the chain.
    started_at: Instant,

    /// Type-erased extension data.
    extensions: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl MiddlewareContext {
    /// Creates a context with a fresh request ID and an anonymous caller.
    #[must_use]
    pub fn new() -> Self {
        Self::with_request_id(RequestId::new())
    }

    /// Creates a context with a specific request ID.
    ///
    /// Useful when the request ID was provided by a client or upstream proxy.
    #[must_use]
    pub fn with_request_id(request_id: RequestId) -> Self {
        Self {
            request_id,
            identity: CallerIdentity::Anonymous,
            started_at: Instant::now(),
            extensions: HashMap::new(),
        }
    }

    /// Returns the request ID.
    #[must_use]
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Sets the request ID.
    pub fn set_request_id(&mut self, request_id: RequestId) {
        self.request_id = request_id;
    }

    /// Returns the caller identity.
    #[must_use]
    pub fn identity(&self) -> &CallerIdentity {
        &self.identity
    }

    /// Sets the caller identity.
    ///
    /// Called by the integrator's authentication middleware.
    pub fn set_identity(&mut self, identity: CallerIdentity) {
        self.identity = identity;
    }

    /// Returns when the request entered the chain.
    #[must_use]
    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    /// Returns the time spent in the chain so far.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Stores a typed extension value, replacing any previous value of the
    /// same type.
    ///
    /// # Example
    ///
    /// ```
    /// use gatehouse_middleware::MiddlewareContext;
    ///
    /// struct SessionId(String);
    ///
    /// let mut ctx = MiddlewareContext::new();
    /// ctx.set_extension(SessionId("s-42".to_string()));
    ///
    /// assert_eq!(ctx.get_extension::<SessionId>().unwrap().0, "s-42");
    /// ```
    pub fn set_extension<T: Send + Sync + 'static>(&mut self, value: T) {
        self.extensions.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Retrieves a typed extension value.
    #[must_use]
    pub fn get_extension<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.extensions
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref())
    }

    /// Removes and returns a typed extension value.
    pub fn remove_extension<T: Send + Sync + 'static>(&mut self) -> Option<T> {
        self.extensions
            .remove(&TypeId::of::<T>())
            .and_then(|v| v.downcast().ok())
            .map(|b| *b)
    }

    /// Checks if an extension of the given type exists.
    #[must_use]
    pub fn has_extension<T: Send + Sync + 'static>(&self) -> bool {
        self.extensions.contains_key(&TypeId::of::<T>())
    }
}

impl Default for MiddlewareContext {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for MiddlewareContext {
    fn clone(&self) -> Self {
        // Extensions are type-erased and not cloned.
        Self {
            request_id: self.request_id,
            identity: self.identity.clone(),
            started_at: self.started_at,
            extensions: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_context_has_anonymous_identity() {
        let ctx = MiddlewareContext::new();
        assert!(matches!(ctx.identity(), CallerIdentity::Anonymous));
    }

    #[test]
    fn test_set_identity() {
        let mut ctx = MiddlewareContext::new();
        ctx.set_identity(CallerIdentity::user("u123", "alice@example.com").with_role("editor"));

        assert!(ctx.identity().is_authenticated());
        assert!(ctx.identity().has_role("editor"));
        assert!(!ctx.identity().is_admin());
    }

    #[test]
    fn test_with_request_id() {
        let id = RequestId::new();
        let ctx = MiddlewareContext::with_request_id(id);
        assert_eq!(ctx.request_id(), id);
    }

    #[test]
    fn test_extensions() {
        #[derive(Debug, Clone, PartialEq)]
        struct MyExtension {
            value: i32,
        }

        let mut ctx = MiddlewareContext::new();
        assert!(!ctx.has_extension::<MyExtension>());

        ctx.set_extension(MyExtension { value: 42 });
        assert_eq!(ctx.get_extension::<MyExtension>(), Some(&MyExtension { value: 42 }));

        let removed = ctx.remove_extension::<MyExtension>();
        assert_eq!(removed, Some(MyExtension { value: 42 }));
        assert!(!ctx.has_extension::<MyExtension>());
    }

    #[test]
    fn test_clone_drops_extensions() {
        let mut ctx = MiddlewareContext::new();
        ctx.set_extension(7_u8);
        let cloned = ctx.clone();
        assert_eq!(cloned.request_id(), ctx.request_id());
        assert!(!cloned.has_extension::<u8>());
    }

    #[test]
    fn test_elapsed_time() {
        let ctx = MiddlewareContext::new();
        std::thread::sleep(Duration::from_millis(5));
        assert!(ctx.elapsed() >= Duration::from_millis(5));
    }
}
