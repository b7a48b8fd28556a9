//! The access manager: decides which [`AccessLevel`] a request needs.
//!
//! # Precedence
//!
//! For a `(path, method)` pair the manager answers with the first of:
//!
//! 1. **Public prefix** - `path` equals or continues a `public_paths` entry.
//! 2. **Admin prefix** - `path` equals or continues an `admin_paths` entry.
//! 3. **Rule** - the first rule, in registration order, whose pattern
//!    matches `path` and whose method list is empty or contains `method`.
//! 4. **Default** - `default_access`.
//!
//! Prefixes therefore beat rules: a rule for `/login/:provider` can never
//! make that path anything but public while `/login` is a public prefix.
//! Rules are never replaced or deduplicated; when two rules cover the same
//! path and method only the first registered one is ever used.

use crate::config::AccessConfig;
use crate::error::AccessResult;
use crate::level::AccessLevel;
use crate::pattern::matches_prefix;
use crate::rule::AccessRule;
use http::Method;
use std::fmt;

/// Why the manager settled on a level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecisionSource {
    /// Matched an entry of `public_paths`.
    PublicPath(String),
    /// Matched an entry of `admin_paths`.
    AdminPath(String),
    /// Matched a registered rule.
    Rule {
        /// Position of the rule in registration order.
        index: usize,
        /// The rule's path pattern.
        pattern: String,
    },
    /// Nothing matched; the configured default applied.
    Default,
}

impl fmt::Display for DecisionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PublicPath(prefix) => write!(f, "public_path:{prefix}"),
            Self::AdminPath(prefix) => write!(f, "admin_path:{prefix}"),
            Self::Rule { index, pattern } => write!(f, "rule[{index}]:{pattern}"),
            Self::Default => f.write_str("default"),
        }
    }
}

/// A level together with the reason it was chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessDecision {
    /// The required access level.
    pub level: AccessLevel,
    /// What produced it.
    pub source: DecisionSource,
}

/// Policy decision point mapping `(path, method)` to an [`AccessLevel`].
///
/// Populate it at startup (constructor plus [`add_rule`](Self::add_rule)),
/// then share it behind an `Arc`. Lookups take `&self`; mutation needs
/// `&mut self`, so a shared manager cannot be changed while serving.
///
/// # Example
///
/// ```
/// use gatehouse_access::{default_rules, AccessConfig, AccessLevel, AccessManager, AccessRule};
/// use http::Method;
///
/// let mut manager = AccessManager::new(AccessConfig::default_config(), default_rules()).unwrap();
/// manager.add_rule(AccessRule::new("/forms/:id/embed", AccessLevel::Public)).unwrap();
///
/// assert_eq!(manager.required_access("/login", &Method::GET), AccessLevel::Public);
/// assert_eq!(manager.required_access("/admin/users", &Method::GET), AccessLevel::Admin);
/// assert_eq!(manager.required_access("/forms/abc/embed", &Method::GET), AccessLevel::Public);
/// assert_eq!(manager.required_access("/forms", &Method::GET), AccessLevel::Authenticated);
/// ```
#[derive(Debug, Clone)]
pub struct AccessManager {
    config: AccessConfig,
    rules: Vec<AccessRule>,
}

impl AccessManager {
    /// Creates a manager after validating `config` and every rule.
    pub fn new(config: AccessConfig, rules: Vec<AccessRule>) -> AccessResult<Self> {
        config.validate()?;
        for rule in &rules {
            rule.validate()?;
        }

        tracing::debug!(
            default_access = %config.default_access,
            public_paths = config.public_paths.len(),
            admin_paths = config.admin_paths.len(),
            rules = rules.len(),
            "access manager created"
        );

        Ok(Self { config, rules })
    }

    /// Creates a manager with the default tables: [`AccessConfig::default_config`]
    /// and [`default_rules`](crate::default_rules).
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            config: AccessConfig::default_config(),
            rules: crate::defaults::default_rules(),
        }
    }

    /// Creates a manager with `config` and no rules.
    pub fn with_config(config: AccessConfig) -> AccessResult<Self> {
        Self::new(config, Vec::new())
    }

    /// Appends a rule. Rules are evaluated in the order they were added.
    ///
    /// The rule is validated the same way [`new`](Self::new) validates its
    /// rules; an invalid rule is rejected and the manager is unchanged.
    pub fn add_rule(&mut self, rule: AccessRule) -> AccessResult<()> {
        rule.validate()?;
        tracing::debug!(
            path = rule.path(),
            level = %rule.level(),
            methods = ?rule.methods(),
            index = self.rules.len(),
            "access rule added"
        );
        self.rules.push(rule);
        Ok(())
    }

    /// Appends several rules, keeping their order.
    ///
    /// Either every rule is added or, if one is invalid, none is.
    pub fn add_rules<I>(&mut self, rules: I) -> AccessResult<()>
    where
        I: IntoIterator<Item = AccessRule>,
    {
        let rules: Vec<AccessRule> = rules.into_iter().collect();
        for rule in &rules {
            rule.validate()?;
        }
        for rule in rules {
            self.add_rule(rule)?;
        }
        Ok(())
    }

    /// Returns the access level required for `path` and `method`.
    #[must_use]
    pub fn required_access(&self, path: &str, method: &Method) -> AccessLevel {
        self.explain(path, method).level
    }

    /// Returns the required level and which prefix or rule produced it.
    #[must_use]
    pub fn explain(&self, path: &str, method: &Method) -> AccessDecision {
        if let Some(prefix) = find_prefix(&self.config.public_paths, path) {
            return AccessDecision {
                level: AccessLevel::Public,
                source: DecisionSource::PublicPath(prefix.to_string()),
            };
        }

        if let Some(prefix) = find_prefix(&self.config.admin_paths, path) {
            return AccessDecision {
                level: AccessLevel::Admin,
                source: DecisionSource::AdminPath(prefix.to_string()),
            };
        }

        if let Some((index, rule)) = self
            .rules
            .iter()
            .enumerate()
            .find(|(_, rule)| rule.matches(path, method))
        {
            return AccessDecision {
                level: rule.level(),
                source: DecisionSource::Rule {
                    index,
                    pattern: rule.path().to_string(),
                },
            };
        }

        AccessDecision {
            level: self.config.default_access,
            source: DecisionSource::Default,
        }
    }

    /// Returns true if `path` falls under a public prefix.
    #[must_use]
    pub fn is_public_path(&self, path: &str) -> bool {
        find_prefix(&self.config.public_paths, path).is_some()
    }

    /// Returns true if `path` falls under an admin prefix.
    #[must_use]
    pub fn is_admin_path(&self, path: &str) -> bool {
        find_prefix(&self.config.admin_paths, path).is_some()
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &AccessConfig {
        &self.config
    }

    /// Returns the rules in evaluation order.
    #[must_use]
    pub fn rules(&self) -> &[AccessRule] {
        &self.rules
    }
}

fn find_prefix<'a>(prefixes: &'a [String], path: &str) -> Option<&'a str> {
    prefixes
        .iter()
        .map(String::as_str)
        .find(|prefix| matches_prefix(prefix, path))
}
