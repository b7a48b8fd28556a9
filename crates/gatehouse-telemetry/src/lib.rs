//! Logging setup for Gatehouse services.
//!
//! Gatehouse crates log through `tracing` and never install a subscriber
//! themselves. Binaries call [`init_logging`] once at startup:
//!
//! | Format    | Use                               |
//! |-----------|-----------------------------------|
//! | `json`    | production, one object per event  |
//! | `pretty`  | development, multi-line           |
//! | `compact` | development, one line per event   |
//!
//! The level is an `EnvFilter` directive, so per-crate levels work:
//! `"info,gatehouse_middleware=debug"` logs every access decision while
//! keeping everything else at `info`.
//!
//! # Example
//!
//! ```rust,ignore
//! use gatehouse_telemetry::{init_logging, LogConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     init_logging(&LogConfig::development())?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, init_logging, LogConfig, LogFormat};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
