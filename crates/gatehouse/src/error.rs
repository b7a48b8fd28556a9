//! Gateway error types.

use gatehouse_access::AccessError;
use gatehouse_config::ConfigError;
use gatehouse_middleware::ChainError;
use thiserror::Error;

/// Errors raised while assembling a [`Gateway`](crate::Gateway).
///
/// All of them are startup errors: once a gateway is built, requests only
/// ever produce responses.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The configuration failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An extra rule was rejected by the policy engine.
    #[error(transparent)]
    Access(#[from] AccessError),

    /// A chain or an enforcement stage could not be built.
    #[error(transparent)]
    Chain(#[from] ChainError),
}

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;
