//! Chain construction errors.

use thiserror::Error;

/// Errors raised while building chains or configuring chain stages.
///
/// These are startup failures. Authorization outcomes (redirects, 403s) are
/// ordinary responses and never surface here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ChainError {
    /// No definition exists for the requested chain type.
    #[error("unknown chain type '{0}'")]
    UnknownChainType(String),

    /// The login path cannot be used as a redirect target.
    #[error("invalid login path '{path}': {reason}")]
    InvalidLoginPath {
        /// The rejected path.
        path: String,
        /// Why it was rejected.
        reason: &'static str,
    },
}

impl ChainError {
    /// Create an unknown chain type error.
    pub fn unknown_chain_type(name: impl Into<String>) -> Self {
        Self::UnknownChainType(name.into())
    }

    /// Create an invalid login path error.
    pub fn invalid_login_path(path: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidLoginPath {
            path: path.into(),
            reason,
        }
    }
}

/// Result type for chain construction.
pub type ChainResult<T> = Result<T, ChainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            ChainError::unknown_chain_type("graphql").to_string(),
            "unknown chain type 'graphql'"
        );
        assert_eq!(
            ChainError::invalid_login_path("login", "must start with '/'").to_string(),
            "invalid login path 'login': must start with '/'"
        );
    }
}
