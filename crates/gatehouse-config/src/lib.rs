//! Typed configuration for Gatehouse.
//!
//! This crate loads the access policy, the enforcement settings and the
//! logging setup of a Gatehouse service with support for:
//! - TOML and JSON configuration files
//! - Environment variable overrides
//! - Strict validation (fails on unknown fields)
//! - Layered configuration (defaults → file → env)
//!
//! # Overview
//!
//! [`GatehouseConfig`] holds four sections:
//!
//! - [`AccessSection`] - public/admin prefixes and the default level
//! - [`RuleConfig`] - ordered `[[rules]]` entries
//! - [`EnforcementConfig`] - login redirect target and admin role
//! - [`LoggingConfig`] - level and format for `gatehouse-telemetry`
//!
//! [`GatehouseConfig::build_access_manager`] turns the first two into an
//! `AccessManager`.
//!
//! # Example
//!
//! ```no_run
//! use gatehouse_config::ConfigLoader;
//!
//! # fn main() -> Result<(), gatehouse_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_dotenv()?
//!     .with_optional_file("gatehouse.toml")?
//!     .with_env_prefix("GATEHOUSE")
//!     .load()?;
//!
//! let manager = config.build_access_manager()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! [access]
//! default_access = "authenticated"   # or 0, 1, 2
//! public_paths = ["/login", "/signup", "/health", "/assets"]
//! admin_paths = ["/admin"]
//! include_default_rules = true
//!
//! [[rules]]
//! path = "/api/v1/forms/:id/schema"
//! access = "public"
//! methods = ["GET"]
//!
//! [enforcement]
//! login_path = "/login"
//! admin_role = "admin"
//!
//! [logging]
//! level = "info"
//! format = "json"
//! ```
//!
//! # Environment Variable Overrides
//!
//! Scalar and list values can be overridden with `PREFIX__SECTION__KEY`:
//!
//! - `GATEHOUSE__ACCESS__DEFAULT_ACCESS=public`
//! - `GATEHOUSE__ACCESS__ADMIN_PATHS=/admin,/ops`
//! - `GATEHOUSE__ENFORCEMENT__LOGIN_PATH=/auth/login`
//! - `GATEHOUSE__LOGGING__FORMAT=compact`

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::GatehouseConfig;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{AccessSection, EnforcementConfig, LogFormat, LoggingConfig, RuleConfig};
