//! # Gatehouse Middleware
//!
//! Named middleware, assembled into ordered chains per route class and
//! executed onion-style.
//!
//! ## Building Blocks
//!
//! - [`Middleware`] - a named interceptor: `process(ctx, request, next)`
//! - [`MiddlewareRegistry`] - name → middleware lookup, populated at startup
//! - [`ChainBuilder`] - resolves a [`ChainType`] table into a [`Chain`]
//! - [`Chain`] - ordered, mutable sequence with onion execution
//! - [`stages`] - the built-in `access` and `admin` enforcement stages
//!
//! ## Request Flow
//!
//! ```text
//! Request → logging → security → session → csrf → auth → access → handler
//!                                                                   ↓
//! Response ← logging ← security ← session ← csrf ← auth ← access ←─┘
//! ```
//!
//! Any middleware may answer on its own instead of calling `next`; the
//! `access` stage does so with a 303 to the login path or a 403.
//!
//! ## Example
//!
//! ```
//! use gatehouse_access::AccessManager;
//! use gatehouse_middleware::stages::AccessMiddleware;
//! use gatehouse_middleware::{ChainBuilder, ChainType, FnMiddleware, MiddlewareContext, MiddlewareRegistry};
//! use bytes::Bytes;
//! use http::StatusCode;
//! use std::sync::Arc;
//!
//! let mut registry = MiddlewareRegistry::new();
//! registry.register(FnMiddleware::new("logging", |ctx, req, next| next.run(ctx, req)));
//! registry.register(AccessMiddleware::new(Arc::new(AccessManager::with_defaults())));
//!
//! // `security` and `auth` are not registered: they are left out with a warning.
//! let chain = ChainBuilder::new(&registry).build(ChainType::Api)?;
//! assert_eq!(chain.names(), vec!["logging", "access"]);
//!
//! let request = http::Request::builder().uri("/admin/users").body(Bytes::new()).unwrap();
//! let response = chain.process_with(&mut MiddlewareContext::new(), request, |_ctx, _req| {
//!     unreachable!("anonymous callers never reach admin handlers")
//! });
//! assert_eq!(response.status(), StatusCode::SEE_OTHER);
//! # Ok::<(), gatehouse_middleware::ChainError>(())
//! ```

#![doc(html_root_url = "https://docs.rs/gatehouse-middleware/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod builder;
pub mod chain;
pub mod context;
pub mod error;
pub mod middleware;
pub mod registry;
pub mod stages;
pub mod types;

// Re-export main types at crate root
pub use builder::{BuildReport, ChainBuilder, ChainDefinition, ChainType};
pub use chain::Chain;
pub use context::MiddlewareContext;
pub use error::{ChainError, ChainResult};
pub use middleware::{FnMiddleware, Handler, Middleware, Next, SharedMiddleware};
pub use registry::MiddlewareRegistry;
pub use types::{ChainExhausted, Request, Response, ResponseExt};
