//! Built-in chain stages.
//!
//! Gatehouse ships the two enforcement stages of the chain tables. The
//! other names (`logging`, `security`, `session`, `csrf`, `auth`) belong to
//! the integrator, who registers its own middleware under them.
//!
//! - [`access`] - path policy enforcement backed by an `AccessManager`
//! - [`admin`] - administrator-only guard for the `admin` chain
//! - [`guard`] - the redirect/403 logic both stages share

pub mod access;
pub mod admin;
pub mod guard;

pub use access::{AccessMiddleware, AccessOutcome, ACCESS_STAGE};
pub use admin::{AdminMiddleware, ADMIN_STAGE};
pub use guard::{
    ContextIdentity, Enforcement, Guard, IdentityResolver, ADMIN_REQUIRED_MESSAGE,
    DEFAULT_LOGIN_PATH,
};
