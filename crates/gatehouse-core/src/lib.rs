//! # Gatehouse Core
//!
//! Core types shared by every Gatehouse crate:
//!
//! - [`RequestId`] - UUID v7 request identifier
//! - [`CallerIdentity`] - the identity an upstream authentication stage
//!   attached to the request (anonymous or a signed-in user with roles)
//!
//! These types carry no policy. Deciding what a path requires lives in
//! `gatehouse-access`; enforcing it lives in `gatehouse-middleware`.

#![doc(html_root_url = "https://docs.rs/gatehouse-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod identity;
mod request_id;

pub use identity::{CallerIdentity, ADMIN_ROLE};
pub use request_id::RequestId;
