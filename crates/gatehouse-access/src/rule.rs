//! Access rules.

use crate::error::{AccessError, AccessResult};
use crate::level::AccessLevel;
use crate::pattern::PathPattern;
use http::Method;

/// A path pattern bound to an access level, optionally limited to methods.
///
/// An empty method list means the rule applies to every method. Methods are
/// compared exactly; `http::Method` keeps extension methods case-sensitive.
///
/// # Example
///
/// ```
/// use gatehouse_access::{AccessLevel, AccessRule};
/// use http::Method;
///
/// let rule = AccessRule::new("/forms/:id/embed", AccessLevel::Public)
///     .with_methods([Method::GET]);
///
/// assert!(rule.matches("/forms/abc/embed", &Method::GET));
/// assert!(!rule.matches("/forms/abc/embed", &Method::POST));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessRule {
    pattern: PathPattern,
    level: AccessLevel,
    methods: Vec<Method>,
}

impl AccessRule {
    /// Creates a rule that applies to every method.
    #[must_use]
    pub fn new(path: impl Into<PathPattern>, level: AccessLevel) -> Self {
        Self {
            pattern: path.into(),
            level,
            methods: Vec::new(),
        }
    }

    /// Restricts the rule to the given methods.
    #[must_use]
    pub fn with_methods<I>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = Method>,
    {
        self.methods.extend(methods);
        self
    }

    /// Restricts the rule to methods given by name, e.g. from a config file.
    ///
    /// Names are used as written; `"get"` is not `GET`.
    pub fn with_method_names<I, S>(self, names: I) -> AccessResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let methods = names
            .into_iter()
            .map(|name| {
                let name = name.as_ref();
                Method::from_bytes(name.as_bytes())
                    .map_err(|_| AccessError::InvalidMethod(name.to_string()))
            })
            .collect::<AccessResult<Vec<_>>>()?;
        Ok(self.with_methods(methods))
    }

    /// Returns the path pattern.
    #[must_use]
    pub fn path(&self) -> &str {
        self.pattern.as_str()
    }

    /// Returns the compiled pattern.
    #[must_use]
    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    /// Returns the access level granted by this rule.
    #[must_use]
    pub const fn level(&self) -> AccessLevel {
        self.level
    }

    /// Returns the methods the rule is limited to; empty means all.
    #[must_use]
    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    /// Returns true if the rule applies to `method`.
    #[must_use]
    pub fn allows_method(&self, method: &Method) -> bool {
        self.methods.is_empty() || self.methods.contains(method)
    }

    /// Returns true if both the path pattern and the method match.
    #[must_use]
    pub fn matches(&self, path: &str, method: &Method) -> bool {
        self.allows_method(method) && self.pattern.matches(path)
    }

    /// Checks that the pattern is absolute.
    pub fn validate(&self) -> AccessResult<()> {
        let raw = self.pattern.as_str();
        if raw.is_empty() {
            return Err(AccessError::invalid_pattern(raw, "must not be empty"));
        }
        if !raw.starts_with('/') {
            return Err(AccessError::invalid_pattern(raw, "must start with '/'"));
        }
        Ok(())
    }
}
