//! Default policy tables for the forms product.
//!
//! These are plain values; nothing here is installed implicitly. Callers
//! pass them to [`AccessManager::new`](crate::AccessManager::new) at startup.

use crate::level::AccessLevel;
use crate::rule::AccessRule;

/// Prefixes anyone may reach: auth flows, probes and static assets.
pub const DEFAULT_PUBLIC_PATHS: &[&str] = &[
    "/login",
    "/signup",
    "/forgot-password",
    "/reset-password",
    "/verify-email",
    "/health",
    "/metrics",
    "/assets",
    "/fonts",
    "/css",
    "/js",
    "/images",
    "/static",
    "/favicon.ico",
    "/robots.txt",
];

/// Prefixes reserved for administrators.
pub const DEFAULT_ADMIN_PATHS: &[&str] = &["/admin"];

/// Paths covered by the default authenticated rules.
pub const DEFAULT_AUTHENTICATED_PATHS: &[&str] = &["/dashboard", "/forms", "/profile", "/settings"];

/// Level applied when nothing else matches.
pub const DEFAULT_ACCESS: AccessLevel = AccessLevel::Authenticated;

/// Returns the default rule list: one all-methods authenticated rule per
/// entry of [`DEFAULT_AUTHENTICATED_PATHS`].
#[must_use]
pub fn default_rules() -> Vec<AccessRule> {
    DEFAULT_AUTHENTICATED_PATHS
        .iter()
        .map(|path| AccessRule::new(*path, AccessLevel::Authenticated))
        .collect()
}
