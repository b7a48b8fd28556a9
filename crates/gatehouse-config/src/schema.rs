//! Configuration schema types.
//!
//! This module defines the structure of all configuration sections.

use gatehouse_access::{AccessConfig, AccessLevel, AccessRule, AccessResult};
use gatehouse_telemetry::LogConfig;
use serde::{Deserialize, Serialize};

/// Access policy section.
///
/// # Example
///
/// ```toml
/// [access]
/// default_access = "authenticated"
/// public_paths = ["/login", "/health"]
/// admin_paths = ["/admin"]
/// include_default_rules = true
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct AccessSection {
    /// Level applied when no prefix or rule matches. A name or a rank
    /// (0, 1, 2).
    #[serde(default)]
    pub default_access: AccessLevel,

    /// Prefixes that are always public.
    #[serde(default = "default_public_paths")]
    pub public_paths: Vec<String>,

    /// Prefixes that always require an administrator.
    #[serde(default = "default_admin_paths")]
    pub admin_paths: Vec<String>,

    /// Whether the built-in authenticated rules (`/dashboard`, `/forms`,
    /// `/profile`, `/settings`) precede the `[[rules]]` of the file.
    #[serde(default = "default_true")]
    pub include_default_rules: bool,
}

impl Default for AccessSection {
    fn default() -> Self {
        let defaults = AccessConfig::default_config();
        Self {
            default_access: defaults.default_access,
            public_paths: defaults.public_paths,
            admin_paths: defaults.admin_paths,
            include_default_rules: true,
        }
    }
}

impl AccessSection {
    /// Returns the prefix lists and default level as an [`AccessConfig`].
    #[must_use]
    pub fn to_access_config(&self) -> AccessConfig {
        AccessConfig {
            default_access: self.default_access,
            public_paths: self.public_paths.clone(),
            admin_paths: self.admin_paths.clone(),
        }
    }
}

fn default_public_paths() -> Vec<String> {
    AccessConfig::default_config().public_paths
}

fn default_admin_paths() -> Vec<String> {
    AccessConfig::default_config().admin_paths
}

/// One `[[rules]]` entry.
///
/// # Example
///
/// ```toml
/// [[rules]]
/// path = "/forms/:id/embed"
/// access = "public"
/// methods = ["GET"]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RuleConfig {
    /// Path pattern; `:name` segments match any single segment.
    pub path: String,

    /// Required level.
    pub access: AccessLevel,

    /// Methods the rule is limited to. Empty means every method.
    #[serde(default)]
    pub methods: Vec<String>,
}

impl RuleConfig {
    /// Creates a rule entry for every method.
    pub fn new(path: impl Into<String>, access: AccessLevel) -> Self {
        Self {
            path: path.into(),
            access,
            methods: Vec::new(),
        }
    }

    /// Converts the entry into an [`AccessRule`].
    ///
    /// # Errors
    ///
    /// Returns an error if a method name is not a valid HTTP method.
    pub fn to_rule(&self) -> AccessResult<AccessRule> {
        AccessRule::new(self.path.as_str(), self.access).with_method_names(&self.methods)
    }
}

/// Enforcement section: how denials are answered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct EnforcementConfig {
    /// Where anonymous callers are redirected.
    #[serde(default = "default_login_path")]
    pub login_path: String,

    /// Role that marks an administrator.
    #[serde(default = "default_admin_role")]
    pub admin_role: String,
}

impl Default for EnforcementConfig {
    fn default() -> Self {
        Self {
            login_path: default_login_path(),
            admin_role: default_admin_role(),
        }
    }
}

fn default_login_path() -> String {
    "/login".to_string()
}

fn default_admin_role() -> String {
    "admin".to_string()
}

/// Log format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON formatted logs (production).
    #[default]
    Json,
    /// Human-readable multi-line format (development).
    Pretty,
    /// Human-readable single-line format.
    Compact,
}

impl From<LogFormat> for gatehouse_telemetry::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Enable logging.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level or filter directive (e.g. "info,gatehouse_middleware=debug").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Include the event target (module path).
    #[serde(default = "default_true")]
    pub include_target: bool,

    /// Include source file and line in logs.
    #[serde(default)]
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::default(),
            include_target: true,
            include_location: false,
        }
    }
}

impl LoggingConfig {
    /// Converts the section into the telemetry crate's [`LogConfig`].
    #[must_use]
    pub fn to_log_config(&self) -> LogConfig {
        LogConfig {
            enabled: self.enabled,
            level: self.level.clone(),
            format: self.format.into(),
            include_location: self.include_location,
            include_target: self.include_target,
            ..LogConfig::production()
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}
