//! # Gatehouse Test
//!
//! Test utilities for Gatehouse chains. Everything runs in memory and
//! synchronously: a request is built, placed in a context together with
//! the caller identity, and run through a [`Chain`](gatehouse_middleware::Chain).
//!
//! ## Key Features
//!
//! - **Request Builder**: [`TestRequest`] with headers, JSON bodies and a
//!   caller identity (`as_user`, `as_admin`)
//! - **Response Assertions**: [`TestResponse`] with `assert_redirect`,
//!   `assert_forbidden`, `assert_chain_exhausted` and friends
//! - **Recording Middleware**: [`RecordingMiddleware`] stands in for
//!   integrator stages and logs entry and exit to a [`VisitLog`]
//! - **Log Capture**: [`capture_logs`] collects `tracing` events as JSON
//!
//! ## Example
//!
//! ```
//! use gatehouse_middleware::{Chain, SharedMiddleware};
//! use gatehouse_test::{RecordingMiddleware, TestRequest, VisitLog};
//! use http::StatusCode;
//! use std::sync::Arc;
//!
//! let log = VisitLog::new();
//! let security: SharedMiddleware = Arc::new(
//!     RecordingMiddleware::new("security", &log).short_circuit(StatusCode::BAD_REQUEST),
//! );
//! let chain = Chain::from_middlewares(vec![security]);
//!
//! TestRequest::post("/forms")
//!     .as_user("u1")
//!     .build()
//!     .unwrap()
//!     .run(&chain)
//!     .assert_status(StatusCode::BAD_REQUEST);
//! assert_eq!(log.entered(), vec!["security"]);
//! ```

#![doc(html_root_url = "https://docs.rs/gatehouse-test/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod logs;
mod recorder;
mod request;
mod response;

pub use error::TestError;
pub use logs::{capture_logs, CapturedLogs};
pub use recorder::{Phase, RecordingMiddleware, Visit, VisitLog};
pub use request::{TestRequest, TestRequestBuilder};
pub use response::TestResponse;
