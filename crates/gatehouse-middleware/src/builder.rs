//! Declarative chain types and the builder that resolves them.
//!
//! # Chain Types
//!
//! Each [`ChainType`] names an ordered list of middleware for a class of
//! routes:
//!
//! | Chain type | Middleware order                                   |
//! |------------|----------------------------------------------------|
//! | `default`  | logging, security, session, csrf, auth, access     |
//! | `api`      | logging, security, auth, access                    |
//! | `web`      | logging, security, session, csrf, auth, access     |
//! | `auth`     | logging, security, auth                            |
//! | `admin`    | logging, security, auth, access, admin             |
//! | `public`   | logging, security                                  |
//! | `static`   | logging                                            |
//!
//! The order is load-bearing. `logging` is outermost so it sees every
//! request; `session` and `csrf` run before `auth`, which may read session
//! state; `access` runs after `auth` because it needs the caller identity.
//!
//! # Missing Middleware
//!
//! A name the registry does not know is logged at `warn` and left out of the
//! chain. The build still succeeds with a shorter chain, and the omission is
//! reported in the [`BuildReport`]. Only an undefined chain type is an
//! error.

use crate::chain::Chain;
use crate::error::{ChainError, ChainResult};
use crate::registry::MiddlewareRegistry;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A class of routes sharing one middleware order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChainType {
    /// Fallback for routes with no more specific class.
    Default,
    /// JSON API endpoints.
    Api,
    /// Browser pages.
    Web,
    /// Sign-in and sign-up flows.
    Auth,
    /// Administrator pages.
    Admin,
    /// Pages anyone may see.
    Public,
    /// Static assets.
    Static,
}

impl ChainType {
    /// Returns every chain type.
    #[must_use]
    pub const fn all() -> [Self; 7] {
        [
            Self::Default,
            Self::Api,
            Self::Web,
            Self::Auth,
            Self::Admin,
            Self::Public,
            Self::Static,
        ]
    }

    /// Returns the canonical lower-case name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Api => "api",
            Self::Web => "web",
            Self::Auth => "auth",
            Self::Admin => "admin",
            Self::Public => "public",
            Self::Static => "static",
        }
    }

    /// Returns the built-in middleware order for this chain type.
    #[must_use]
    pub const fn middleware_names(self) -> &'static [&'static str] {
        match self {
            Self::Default | Self::Web => &["logging", "security", "session", "csrf", "auth", "access"],
            Self::Api => &["logging", "security", "auth", "access"],
            Self::Auth => &["logging", "security", "auth"],
            Self::Admin => &["logging", "security", "auth", "access", "admin"],
            Self::Public => &["logging", "security"],
            Self::Static => &["logging"],
        }
    }

    /// Returns a human-readable description of the built-in chain.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Default => "Default chain for browser requests with session and access control",
            Self::Api => "API requests: token auth and access control, no session or CSRF",
            Self::Web => "Web pages with session, CSRF protection and access control",
            Self::Auth => "Sign-in and sign-up endpoints: authentication without access checks",
            Self::Admin => "Administrator pages: access control plus an admin-only guard",
            Self::Public => "Public pages: logging and security headers only",
            Self::Static => "Static assets: logging only",
        }
    }
}

impl fmt::Display for ChainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ChainType {
    type Err = ChainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ChainError::unknown_chain_type(s))
    }
}

/// Ordered middleware names plus a description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainDefinition {
    names: Vec<String>,
    description: String,
}

impl ChainDefinition {
    /// Creates a definition from names in execution order.
    pub fn new<I, S>(names: I, description: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            description: description.into(),
        }
    }

    /// Returns the built-in definition for `chain_type`.
    #[must_use]
    pub fn builtin(chain_type: ChainType) -> Self {
        Self::new(
            chain_type.middleware_names().iter().copied(),
            chain_type.description(),
        )
    }

    /// Returns the middleware names in execution order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Outcome of resolving one chain definition against the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    /// The chain type that was built.
    pub chain_type: ChainType,
    /// Names resolved and placed in the chain, in order.
    pub resolved: Vec<String>,
    /// Names the registry did not know, in definition order.
    pub missing: Vec<String>,
}

impl BuildReport {
    /// Returns true if every name in the definition was resolved.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Resolves chain types into [`Chain`]s using a [`MiddlewareRegistry`].
///
/// # Example
///
/// ```
/// use gatehouse_middleware::{ChainBuilder, ChainType, FnMiddleware, MiddlewareRegistry};
///
/// let mut registry = MiddlewareRegistry::new();
/// for name in ["logging", "security", "auth", "access"] {
///     registry.register(FnMiddleware::new(name, |ctx, req, next| next.run(ctx, req)));
/// }
///
/// let chain = ChainBuilder::new(&registry).build(ChainType::Api)?;
/// assert_eq!(chain.names(), vec!["logging", "security", "auth", "access"]);
/// # Ok::<(), gatehouse_middleware::ChainError>(())
/// ```
#[derive(Debug)]
pub struct ChainBuilder<'r> {
    registry: &'r MiddlewareRegistry,
    definitions: BTreeMap<ChainType, ChainDefinition>,
}

impl<'r> ChainBuilder<'r> {
    /// Creates a builder with the built-in definition for every chain type.
    #[must_use]
    pub fn new(registry: &'r MiddlewareRegistry) -> Self {
        let definitions = ChainType::all()
            .into_iter()
            .map(|t| (t, ChainDefinition::builtin(t)))
            .collect();
        Self {
            registry,
            definitions,
        }
    }

    /// Creates a builder with no definitions at all.
    ///
    /// Every chain type must then be supplied through [`define`](Self::define).
    #[must_use]
    pub fn without_defaults(registry: &'r MiddlewareRegistry) -> Self {
        Self {
            registry,
            definitions: BTreeMap::new(),
        }
    }

    /// Sets or replaces the definition used for `chain_type`.
    #[must_use]
    pub fn define(mut self, chain_type: ChainType, definition: ChainDefinition) -> Self {
        self.definitions.insert(chain_type, definition);
        self
    }

    /// Returns the definition used for `chain_type`, if any.
    #[must_use]
    pub fn definition(&self, chain_type: ChainType) -> Option<&ChainDefinition> {
        self.definitions.get(&chain_type)
    }

    /// Builds the chain for `chain_type`.
    ///
    /// Fails only if `chain_type` has no definition; unregistered
    /// middleware are skipped with a warning.
    pub fn build(&self, chain_type: ChainType) -> ChainResult<Chain> {
        self.build_with_report(chain_type).map(|(chain, _)| chain)
    }

    /// Builds the chain named `name`, e.g. `"api"`.
    pub fn build_named(&self, name: &str) -> ChainResult<Chain> {
        self.build(name.parse()?)
    }

    /// Builds the chain for `chain_type` and reports which names were
    /// resolved or omitted.
    pub fn build_with_report(&self, chain_type: ChainType) -> ChainResult<(Chain, BuildReport)> {
        let definition = self
            .definitions
            .get(&chain_type)
            .ok_or_else(|| ChainError::unknown_chain_type(chain_type.name()))?;

        let mut chain = Chain::new();
        let mut resolved = Vec::with_capacity(definition.names.len());
        let mut missing = Vec::new();

        for name in &definition.names {
            match self.registry.get(name) {
                Some(middleware) => {
                    resolved.push(middleware.name().to_string());
                    chain.add(middleware);
                }
                None => {
                    tracing::warn!(
                        chain = %chain_type,
                        middleware = %name,
                        "middleware not registered, omitting it from the chain"
                    );
                    missing.push(name.clone());
                }
            }
        }

        tracing::info!(
            chain = %chain_type,
            middlewares = ?resolved,
            omitted = missing.len(),
            "middleware chain built"
        );

        Ok((
            chain,
            BuildReport {
                chain_type,
                resolved,
                missing,
            },
        ))
    }

    /// Builds every defined chain type.
    pub fn build_all(&self) -> ChainResult<BTreeMap<ChainType, Chain>> {
        self.definitions
            .keys()
            .map(|&chain_type| Ok((chain_type, self.build(chain_type)?)))
            .collect()
    }
}
