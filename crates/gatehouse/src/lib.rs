//! # Gatehouse
//!
//! **Request middleware chains with path-based access control**
//!
//! Gatehouse assembles named middleware into ordered chains per route class
//! and enforces a path/method access policy inside them:
//!
//! - 🔗 **Chain Tables** – `default`, `api`, `web`, `auth`, `admin`, `public`
//!   and `static` chains resolved from a registry by name
//! - 🧅 **Onion Execution** – each middleware wraps the rest of the chain
//!   and may answer on its own
//! - 🛡️ **Access Policy** – public and admin prefixes, ordered rules with
//!   `:param` segments and method filters, a configurable default
//! - ↪️ **Enforcement** – 303 to the login page for anonymous callers, 403
//!   for signed-in non-admins on admin routes
//! - ⚙️ **Layered Config** – defaults, TOML/JSON file, environment
//!
//! ## Quick Start
//!
//! ```
//! use gatehouse::prelude::*;
//! use bytes::Bytes;
//! use http::StatusCode;
//!
//! let gateway = Gateway::builder(GatehouseConfig::default())
//!     .middleware(FnMiddleware::new("auth", |ctx, req, next| {
//!         if req.headers().contains_key("x-demo-user") {
//!             ctx.set_identity(CallerIdentity::user("u1", "u1@example.com"));
//!         }
//!         next.run(ctx, req)
//!     }))
//!     .build()?;
//!
//! let request = http::Request::builder()
//!     .uri("/dashboard")
//!     .body(Bytes::new())
//!     .unwrap();
//! let response = gateway.handle(ChainType::Web, &mut MiddlewareContext::new(), request, |_ctx, _req| {
//!     Response::error(StatusCode::OK, "dashboard")
//! })?;
//!
//! assert_eq!(response.status(), StatusCode::SEE_OTHER);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Request → logging → security → session → csrf → auth → access → handler
//!                                                           │
//!                                          AccessManager ◄──┘ (path, method) → level
//! ```

#![doc(html_root_url = "https://docs.rs/gatehouse/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod gateway;

pub use error::{GatewayError, GatewayResult};
pub use gateway::{Gateway, GatewayBuilder};

// Re-export core types
pub use gatehouse_core as core;

// Re-export access policy types
pub use gatehouse_access as access;

// Re-export middleware types
pub use gatehouse_middleware as middleware;

// Re-export configuration types
pub use gatehouse_config as config;

// Re-export logging setup
pub use gatehouse_telemetry as telemetry;

pub use gatehouse_access::{AccessLevel, AccessManager, AccessRule};
pub use gatehouse_config::{ConfigLoader, GatehouseConfig};
pub use gatehouse_core::CallerIdentity;
pub use gatehouse_middleware::{
    Chain, ChainDefinition, ChainType, FnMiddleware, Middleware, MiddlewareContext, Next, Request,
    Response, ResponseExt,
};
pub use gatehouse_telemetry::{init_logging, LogConfig};

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```
/// use gatehouse::prelude::*;
///
/// let manager = AccessManager::with_defaults();
/// assert_eq!(manager.required_access("/login", &http::Method::GET), AccessLevel::Public);
/// ```
pub mod prelude {
    pub use crate::{Gateway, GatewayBuilder, GatewayError};

    pub use gatehouse_core::{CallerIdentity, RequestId};

    pub use gatehouse_access::{
        AccessConfig, AccessDecision, AccessLevel, AccessManager, AccessRule, DecisionSource,
    };

    pub use gatehouse_middleware::stages::{AccessMiddleware, AccessOutcome, AdminMiddleware};
    pub use gatehouse_middleware::{
        Chain, ChainBuilder, ChainDefinition, ChainError, ChainType, FnMiddleware, Middleware,
        MiddlewareContext, MiddlewareRegistry, Next, Request, Response, ResponseExt,
    };

    pub use gatehouse_config::{ConfigLoader, GatehouseConfig};
    pub use gatehouse_telemetry::{init_logging, LogConfig};
}
