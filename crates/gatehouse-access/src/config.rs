//! Access policy configuration.

use crate::defaults::{DEFAULT_ACCESS, DEFAULT_ADMIN_PATHS, DEFAULT_PUBLIC_PATHS};
use crate::error::{AccessError, AccessResult};
use crate::level::AccessLevel;
use serde::{Deserialize, Serialize};

/// Prefix lists and fallback level for an [`AccessManager`](crate::AccessManager).
///
/// The configuration is validated once, when the manager is created, and is
/// read-only afterwards. Rules registered later go to the manager's own rule
/// list, never into these prefix lists.
///
/// # Example
///
/// ```
/// use gatehouse_access::{AccessConfig, AccessLevel};
///
/// let config = AccessConfig::empty()
///     .with_default_access(AccessLevel::Public)
///     .with_admin_path("/admin");
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccessConfig {
    /// Level applied when no prefix or rule matches.
    #[serde(default = "default_access")]
    pub default_access: AccessLevel,

    /// Prefixes that are always public.
    #[serde(default = "default_public_paths")]
    pub public_paths: Vec<String>,

    /// Prefixes that always require an administrator.
    #[serde(default = "default_admin_paths")]
    pub admin_paths: Vec<String>,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self::default_config()
    }
}

fn default_access() -> AccessLevel {
    DEFAULT_ACCESS
}

fn default_public_paths() -> Vec<String> {
    DEFAULT_PUBLIC_PATHS.iter().map(ToString::to_string).collect()
}

fn default_admin_paths() -> Vec<String> {
    DEFAULT_ADMIN_PATHS.iter().map(ToString::to_string).collect()
}

impl AccessConfig {
    /// The product's default tables: auth flows and assets public, `/admin`
    /// for administrators, everything else authenticated.
    #[must_use]
    pub fn default_config() -> Self {
        Self {
            default_access: default_access(),
            public_paths: default_public_paths(),
            admin_paths: default_admin_paths(),
        }
    }

    /// A configuration with no prefixes and an authenticated default.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            default_access: DEFAULT_ACCESS,
            public_paths: Vec::new(),
            admin_paths: Vec::new(),
        }
    }

    /// Set the fallback level.
    #[must_use]
    pub fn with_default_access(mut self, level: AccessLevel) -> Self {
        self.default_access = level;
        self
    }

    /// Add a public prefix.
    #[must_use]
    pub fn with_public_path(mut self, prefix: impl Into<String>) -> Self {
        self.public_paths.push(prefix.into());
        self
    }

    /// Add an admin prefix.
    #[must_use]
    pub fn with_admin_path(mut self, prefix: impl Into<String>) -> Self {
        self.admin_paths.push(prefix.into());
        self
    }

    /// Validate the configuration.
    ///
    /// The default level needs no check here: [`AccessLevel`] is closed and
    /// out-of-range values are rejected when they are parsed (see
    /// [`AccessLevel::from_rank`]). What remains is the prefix lists.
    ///
    /// # Errors
    ///
    /// Returns an [`AccessError`] if:
    /// - a prefix is empty or relative (request paths always start with `/`,
    ///   so it could never match)
    /// - a prefix other than `/` ends with `/` (it could then only ever
    ///   match by equality)
    pub fn validate(&self) -> AccessResult<()> {
        validate_prefixes("public_paths", &self.public_paths)?;
        validate_prefixes("admin_paths", &self.admin_paths)?;
        Ok(())
    }
}

fn validate_prefixes(list: &'static str, prefixes: &[String]) -> AccessResult<()> {
    for prefix in prefixes {
        if prefix.is_empty() {
            return Err(AccessError::invalid_prefix(list, prefix, "must not be empty"));
        }
        if !prefix.starts_with('/') {
            return Err(AccessError::invalid_prefix(list, prefix, "must start with '/'"));
        }
        if prefix.len() > 1 && prefix.ends_with('/') {
            return Err(AccessError::invalid_prefix(list, prefix, "must not end with '/'"));
        }
    }
    Ok(())
}
