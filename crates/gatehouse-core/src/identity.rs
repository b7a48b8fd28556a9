//! Caller identity.
//!
//! [`CallerIdentity`] is what an authentication stage (session lookup,
//! token verification) leaves behind in the request context. Gatehouse never
//! produces it on its own; the access stages only read the two predicates
//! [`CallerIdentity::is_authenticated`] and [`CallerIdentity::is_admin`].

use serde::{Deserialize, Serialize};

/// Role name that marks an administrator.
pub const ADMIN_ROLE: &str = "admin";

/// The identity of the caller making a request.
///
/// # Example
///
/// ```
/// use gatehouse_core::CallerIdentity;
///
/// let anonymous = CallerIdentity::anonymous();
/// assert!(!anonymous.is_authenticated());
///
/// let admin = CallerIdentity::user("u-1", "root@example.com").with_role("admin");
/// assert!(admin.is_authenticated());
/// assert!(admin.is_admin());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CallerIdentity {
    /// No credentials were presented, or they did not verify.
    #[default]
    Anonymous,

    /// A signed-in user.
    User {
        /// Stable user identifier.
        user_id: String,
        /// Email address, when known.
        email: Option<String>,
        /// Roles granted to the user.
        roles: Vec<String>,
    },
}

impl CallerIdentity {
    /// Creates an anonymous identity.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self::Anonymous
    }

    /// Creates a user identity without roles.
    #[must_use]
    pub fn user(user_id: impl Into<String>, email: impl Into<String>) -> Self {
        Self::User {
            user_id: user_id.into(),
            email: Some(email.into()),
            roles: Vec::new(),
        }
    }

    /// Creates a user identity carrying the [`ADMIN_ROLE`].
    #[must_use]
    pub fn admin(user_id: impl Into<String>, email: impl Into<String>) -> Self {
        Self::user(user_id, email).with_role(ADMIN_ROLE)
    }

    /// Adds a role. Anonymous identities stay anonymous.
    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        if let Self::User { roles, .. } = &mut self {
            roles.push(role.into());
        }
        self
    }

    /// Returns true for any non-anonymous identity.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::User { .. })
    }

    /// Returns true if the identity carries `role`.
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.roles().iter().any(|r| *r == role)
    }

    /// Returns true if the identity carries the [`ADMIN_ROLE`].
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.has_role(ADMIN_ROLE)
    }

    /// Returns the roles of the identity; empty for anonymous callers.
    #[must_use]
    pub fn roles(&self) -> Vec<&str> {
        match self {
            Self::User { roles, .. } => roles.iter().map(String::as_str).collect(),
            Self::Anonymous => Vec::new(),
        }
    }

    /// Returns a string identifier suitable for logging.
    ///
    /// Never contains secrets; emails are left out on purpose.
    #[must_use]
    pub fn log_id(&self) -> String {
        match self {
            Self::User { user_id, .. } => format!("user:{user_id}"),
            Self::Anonymous => "anonymous".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_anonymous() {
        assert_eq!(CallerIdentity::default(), CallerIdentity::Anonymous);
    }

    #[test]
    fn test_anonymous_predicates() {
        let identity = CallerIdentity::anonymous();
        assert!(!identity.is_authenticated());
        assert!(!identity.is_admin());
        assert!(identity.roles().is_empty());
    }

    #[test]
    fn test_user_without_roles_is_not_admin() {
        let identity = CallerIdentity::user("u-1", "alice@example.com");
        assert!(identity.is_authenticated());
        assert!(!identity.is_admin());
    }

    #[test]
    fn test_admin_constructor() {
        let identity = CallerIdentity::admin("u-2", "root@example.com");
        assert!(identity.is_admin());
        assert_eq!(identity.roles(), vec!["admin"]);
    }

    #[test]
    fn test_with_role_ignored_for_anonymous() {
        let identity = CallerIdentity::anonymous().with_role("admin");
        assert!(!identity.is_admin());
    }

    #[test]
    fn test_has_role_is_exact() {
        let identity = CallerIdentity::user("u-3", "bob@example.com").with_role("Admin");
        assert!(identity.has_role("Admin"));
        assert!(!identity.is_admin());
    }

    #[test]
    fn test_log_id() {
        assert_eq!(CallerIdentity::anonymous().log_id(), "anonymous");
        assert_eq!(
            CallerIdentity::user("u-4", "carol@example.com").log_id(),
            "user:u-4"
        );
    }

    #[test]
    fn test_serialization_is_tagged() {
        let identity = CallerIdentity::user("u-5", "dave@example.com");
        let json = serde_json::to_string(&identity).unwrap();
        assert!(json.contains("\"type\":\"user\""));
        assert!(json.contains("\"user_id\":\"u-5\""));

        let parsed: CallerIdentity = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, identity);
    }
}
