//! A ready-to-serve bundle of policy, registry and chains.
//!
//! The [`Gateway`] is what an integrator builds once at startup: it turns a
//! [`GatehouseConfig`] into an [`AccessManager`], registers the built-in
//! `access` and `admin` stages next to the integrator's own middleware, and
//! builds one [`Chain`] per [`ChainType`]. After that it is read-only and
//! can be shared across request threads.

use crate::error::GatewayResult;
use gatehouse_access::{AccessManager, AccessRule};
use gatehouse_config::GatehouseConfig;
use gatehouse_middleware::stages::{
    AccessMiddleware, AdminMiddleware, ContextIdentity, Guard, ACCESS_STAGE, ADMIN_STAGE,
};
use gatehouse_middleware::{
    Chain, ChainBuilder, ChainDefinition, ChainError, ChainResult, ChainType, Middleware,
    MiddlewareContext, MiddlewareRegistry, Request, Response, SharedMiddleware,
};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Builder for a [`Gateway`].
///
/// # Example
///
/// ```
/// use gatehouse::{FnMiddleware, Gateway, GatehouseConfig};
///
/// let gateway = Gateway::builder(GatehouseConfig::default())
///     .middleware(FnMiddleware::new("logging", |ctx, req, next| next.run(ctx, req)))
///     .build()?;
///
/// assert_eq!(gateway.chain(gatehouse::ChainType::Static).unwrap().names(), vec!["logging"]);
/// # Ok::<(), gatehouse::GatewayError>(())
/// ```
#[must_use]
pub struct GatewayBuilder {
    config: GatehouseConfig,
    registry: MiddlewareRegistry,
    rules: Vec<AccessRule>,
    definitions: Vec<(ChainType, ChainDefinition)>,
}

impl GatewayBuilder {
    /// Starts from `config` and an empty registry.
    pub fn new(config: GatehouseConfig) -> Self {
        Self {
            config,
            registry: MiddlewareRegistry::new(),
            rules: Vec::new(),
            definitions: Vec::new(),
        }
    }

    /// Registers a middleware under its own name.
    ///
    /// Registering `access` or `admin` replaces the built-in stage.
    pub fn middleware<M: Middleware>(mut self, middleware: M) -> Self {
        self.registry.register(middleware);
        self
    }

    /// Registers a shared middleware under `name`.
    pub fn middleware_as(mut self, name: impl Into<String>, middleware: SharedMiddleware) -> Self {
        self.registry.register_as(name, middleware);
        self
    }

    /// Adds a rule after the configured ones.
    ///
    /// Rules are first-match-wins, so a rule added here never overrides a
    /// configured rule that matches the same request.
    pub fn rule(mut self, rule: AccessRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Replaces the built-in table of `chain_type`.
    pub fn define(mut self, chain_type: ChainType, definition: ChainDefinition) -> Self {
        self.definitions.push((chain_type, definition));
        self
    }

    /// Validates the configuration and builds every chain.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration or an added rule is invalid,
    /// or the login path cannot be used as a redirect target.
    pub fn build(self) -> GatewayResult<Gateway> {
        let Self {
            config,
            mut registry,
            rules,
            definitions,
        } = self;

        config.validate()?;

        let mut manager = config.build_access_manager()?;
        manager.add_rules(rules)?;
        let manager = Arc::new(manager);

        let guard = Guard::new()
            .with_login_path(&config.enforcement.login_path)?
            .with_resolver(ContextIdentity::with_admin_role(
                config.enforcement.admin_role.as_str(),
            ));

        if registry.contains(ACCESS_STAGE) {
            tracing::debug!(middleware = ACCESS_STAGE, "using integrator-provided stage");
        } else {
            registry.register(AccessMiddleware::new(Arc::clone(&manager)).with_guard(guard.clone()));
        }
        if registry.contains(ADMIN_STAGE) {
            tracing::debug!(middleware = ADMIN_STAGE, "using integrator-provided stage");
        } else {
            registry.register(AdminMiddleware::new().with_guard(guard));
        }

        let chains = definitions
            .into_iter()
            .fold(ChainBuilder::new(&registry), |builder, (chain_type, definition)| {
                builder.define(chain_type, definition)
            })
            .build_all()?;

        tracing::info!(
            chains = chains.len(),
            middlewares = registry.len(),
            login_path = %config.enforcement.login_path,
            "gateway ready"
        );

        Ok(Gateway {
            config,
            manager,
            registry,
            chains,
        })
    }
}

impl fmt::Debug for GatewayBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayBuilder")
            .field("registry", &self.registry)
            .field("rules", &self.rules.len())
            .field("definitions", &self.definitions.len())
            .finish_non_exhaustive()
    }
}

/// Access policy, registry and one chain per chain type.
#[derive(Debug)]
pub struct Gateway {
    config: GatehouseConfig,
    manager: Arc<AccessManager>,
    registry: MiddlewareRegistry,
    chains: BTreeMap<ChainType, Chain>,
}

impl Gateway {
    /// Starts building a gateway from `config`.
    pub fn builder(config: GatehouseConfig) -> GatewayBuilder {
        GatewayBuilder::new(config)
    }

    /// Returns the configuration the gateway was built from.
    #[must_use]
    pub fn config(&self) -> &GatehouseConfig {
        &self.config
    }

    /// Returns the access manager shared by the `access` stage.
    #[must_use]
    pub fn manager(&self) -> &AccessManager {
        &self.manager
    }

    /// Returns the registry the chains were resolved from.
    #[must_use]
    pub fn registry(&self) -> &MiddlewareRegistry {
        &self.registry
    }

    /// Returns the chain for `chain_type`.
    #[must_use]
    pub fn chain(&self, chain_type: ChainType) -> Option<&Chain> {
        self.chains.get(&chain_type)
    }

    /// Returns the chain named `name`, e.g. `"web"`.
    pub fn chain_named(&self, name: &str) -> ChainResult<&Chain> {
        let chain_type: ChainType = name.parse()?;
        self.chain(chain_type)
            .ok_or_else(|| ChainError::unknown_chain_type(name))
    }

    /// Runs `request` through the chain for `chain_type`, handing off to
    /// `handler` if every middleware lets it through.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::UnknownChainType`] if no chain was built for
    /// `chain_type`.
    pub fn handle<H>(
        &self,
        chain_type: ChainType,
        ctx: &mut MiddlewareContext,
        request: Request,
        handler: H,
    ) -> ChainResult<Response>
    where
        H: FnOnce(&mut MiddlewareContext, Request) -> Response,
    {
        let chain = self
            .chain(chain_type)
            .ok_or_else(|| ChainError::unknown_chain_type(chain_type.name()))?;
        Ok(chain.process_with(ctx, request, handler))
    }

    /// Runs `request` through the chain for `chain_type` without a handler.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::UnknownChainType`] if no chain was built for
    /// `chain_type`.
    pub fn process(
        &self,
        chain_type: ChainType,
        ctx: &mut MiddlewareContext,
        request: Request,
    ) -> ChainResult<Response> {
        let chain = self
            .chain(chain_type)
            .ok_or_else(|| ChainError::unknown_chain_type(chain_type.name()))?;
        Ok(chain.process(ctx, request))
    }
}
