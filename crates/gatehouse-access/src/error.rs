//! Error types for the access crate.

use thiserror::Error;

/// Result type for access policy operations.
pub type AccessResult<T> = Result<T, AccessError>;

/// Errors raised while building or validating an access policy.
///
/// All of these are startup errors. Request-time decisions never fail; a
/// denied request is an ordinary response produced by the enforcement stage.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AccessError {
    /// An access level outside `[Public, Admin]`.
    #[error(
        "invalid access level '{value}': expected public (0), authenticated (1) or admin (2)"
    )]
    InvalidAccessLevel {
        /// The rejected value as written.
        value: String,
    },

    /// A malformed entry in `public_paths` or `admin_paths`.
    #[error("invalid {list} entry '{prefix}': {reason}")]
    InvalidPathPrefix {
        /// Which prefix list the entry came from.
        list: &'static str,
        /// The rejected prefix.
        prefix: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// A malformed rule path pattern.
    #[error("invalid rule pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The rejected pattern.
        pattern: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// A rule method that is not a valid HTTP method token.
    #[error("invalid HTTP method '{0}'")]
    InvalidMethod(String),
}

impl AccessError {
    /// Create an invalid access level error.
    pub fn invalid_level(value: impl ToString) -> Self {
        Self::InvalidAccessLevel {
            value: value.to_string(),
        }
    }

    /// Create an invalid prefix error.
    pub fn invalid_prefix(list: &'static str, prefix: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidPathPrefix {
            list,
            prefix: prefix.into(),
            reason,
        }
    }

    /// Create an invalid pattern error.
    pub fn invalid_pattern(pattern: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_level_display() {
        let err = AccessError::invalid_level(7);
        assert_eq!(
            err.to_string(),
            "invalid access level '7': expected public (0), authenticated (1) or admin (2)"
        );
    }

    #[test]
    fn test_invalid_prefix_display() {
        let err = AccessError::invalid_prefix("public_paths", "login", "must start with '/'");
        assert_eq!(
            err.to_string(),
            "invalid public_paths entry 'login': must start with '/'"
        );
    }

    #[test]
    fn test_invalid_method_display() {
        let err = AccessError::InvalidMethod("GE T".to_string());
        assert_eq!(err.to_string(), "invalid HTTP method 'GE T'");
    }
}
