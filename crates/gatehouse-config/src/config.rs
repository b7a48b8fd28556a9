//! Main configuration type.
//!
//! This module provides the top-level [`GatehouseConfig`] struct and turns
//! it into the runtime policy objects.

use gatehouse_access::{default_rules, AccessManager, AccessRule};
use serde::{Deserialize, Serialize};

use crate::{AccessSection, ConfigError, EnforcementConfig, LogFormat, LoggingConfig, RuleConfig};

/// Complete Gatehouse configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load it from files and
/// environment variables.
///
/// # Example
///
/// ```
/// use gatehouse_config::GatehouseConfig;
/// use gatehouse_access::AccessLevel;
/// use http::Method;
///
/// let config = GatehouseConfig::default();
/// let manager = config.build_access_manager().unwrap();
///
/// assert_eq!(manager.required_access("/health", &Method::GET), AccessLevel::Public);
/// assert_eq!(manager.required_access("/admin/users", &Method::GET), AccessLevel::Admin);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct GatehouseConfig {
    /// Prefix tables and default level.
    #[serde(default)]
    pub access: AccessSection,

    /// Additional rules, evaluated in order after the built-in ones.
    #[serde(default)]
    pub rules: Vec<RuleConfig>,

    /// Redirect target and admin role.
    #[serde(default)]
    pub enforcement: EnforcementConfig,

    /// Logging setup.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl GatehouseConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if:
    /// - a prefix list or rule is rejected by the policy engine
    /// - the login path is not an absolute path usable in a `Location` header
    /// - the admin role is empty
    /// - the log level is not a valid filter directive
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.access.to_access_config().validate()?;
        self.access_rules()?;

        let login_path = &self.enforcement.login_path;
        if !login_path.starts_with('/') {
            return Err(ConfigError::invalid_value(
                "enforcement.login_path",
                format!("must start with '/': {login_path}"),
            ));
        }
        if login_path.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(ConfigError::invalid_value(
                "enforcement.login_path",
                "must not contain whitespace or control characters",
            ));
        }

        if self.enforcement.admin_role.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "enforcement.admin_role",
                "must not be empty",
            ));
        }

        gatehouse_telemetry::create_env_filter(&self.logging.level)
            .map_err(|e| ConfigError::invalid_value("logging.level", e.to_string()))?;

        Ok(())
    }

    /// Returns the rule list: the built-in rules (unless disabled), then the
    /// `[[rules]]` entries in file order.
    ///
    /// # Errors
    ///
    /// Returns an error if a rule pattern or method is invalid.
    pub fn access_rules(&self) -> Result<Vec<AccessRule>, ConfigError> {
        let mut rules = if self.access.include_default_rules {
            default_rules()
        } else {
            Vec::new()
        };

        for entry in &self.rules {
            let rule = entry.to_rule()?;
            rule.validate()?;
            rules.push(rule);
        }

        Ok(rules)
    }

    /// Builds the [`AccessManager`] this configuration describes.
    ///
    /// # Errors
    ///
    /// Returns an error if the access section or a rule is invalid.
    pub fn build_access_manager(&self) -> Result<AccessManager, ConfigError> {
        let manager = AccessManager::new(self.access.to_access_config(), self.access_rules()?)?;
        Ok(manager)
    }

    /// Create a development configuration preset.
    ///
    /// Same policy as the default; pretty debug logs, so every access
    /// decision shows up with its source.
    ///
    /// # Example
    ///
    /// ```
    /// use gatehouse_config::{GatehouseConfig, LogFormat};
    ///
    /// let config = GatehouseConfig::development();
    /// assert_eq!(config.logging.level, "debug");
    /// assert_eq!(config.logging.format, LogFormat::Pretty);
    /// ```
    #[must_use]
    pub fn development() -> Self {
        Self {
            logging: LoggingConfig {
                level: "debug".to_string(),
                format: LogFormat::Pretty,
                include_location: true,
                ..LoggingConfig::default()
            },
            ..Self::default()
        }
    }

    /// Create a production configuration preset.
    ///
    /// # Example
    ///
    /// ```
    /// use gatehouse_config::{GatehouseConfig, LogFormat};
    ///
    /// let config = GatehouseConfig::production();
    /// assert_eq!(config.logging.level, "info");
    /// assert_eq!(config.logging.format, LogFormat::Json);
    /// ```
    #[must_use]
    pub fn production() -> Self {
        Self {
            logging: LoggingConfig {
                level: "info".to_string(),
                format: LogFormat::Json,
                include_location: false,
                ..LoggingConfig::default()
            },
            ..Self::default()
        }
    }
}
