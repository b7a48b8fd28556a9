//! Gatehouse Access - path based access policy decisions
//!
//! This crate is the policy decision point of Gatehouse. Given a request
//! path and method it answers which [`AccessLevel`] the request needs:
//! `Public`, `Authenticated` or `Admin`. It never looks at who the caller
//! is; enforcement against the caller's identity happens in the `access`
//! stage of `gatehouse-middleware`.
//!
//! # Architecture
//!
//! ```text
//!   (path, method)
//!        │
//!        ▼
//!   ┌──────────────────────┐  match  ┌────────────────┐
//!   │ public_paths prefix? │────────▶│ Public         │
//!   └──────────┬───────────┘         └────────────────┘
//!              ▼
//!   ┌──────────────────────┐  match  ┌────────────────┐
//!   │ admin_paths prefix?  │────────▶│ Admin          │
//!   └──────────┬───────────┘         └────────────────┘
//!              ▼
//!   ┌──────────────────────┐  first  ┌────────────────┐
//!   │ rules (in order)     │────────▶│ rule.level     │
//!   └──────────┬───────────┘         └────────────────┘
//!              ▼
//!        default_access
//! ```
//!
//! # Example
//!
//! ```
//! use gatehouse_access::{default_rules, AccessConfig, AccessLevel, AccessManager};
//! use http::Method;
//!
//! let manager = AccessManager::new(AccessConfig::default_config(), default_rules())?;
//!
//! assert_eq!(manager.required_access("/signup", &Method::POST), AccessLevel::Public);
//! assert_eq!(manager.required_access("/dashboard", &Method::GET), AccessLevel::Authenticated);
//! assert_eq!(manager.required_access("/admin/billing", &Method::GET), AccessLevel::Admin);
//! # Ok::<(), gatehouse_access::AccessError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod defaults;
pub mod error;
pub mod level;
pub mod manager;
pub mod pattern;
pub mod rule;

pub use config::AccessConfig;
pub use defaults::{default_rules, DEFAULT_ADMIN_PATHS, DEFAULT_PUBLIC_PATHS};
pub use error::{AccessError, AccessResult};
pub use level::AccessLevel;
pub use manager::{AccessDecision, AccessManager, DecisionSource};
pub use pattern::{match_path_pattern, matches_prefix, PathPattern, Segment};
pub use rule::AccessRule;
