//! Builder for [`GeoResourceRegistry`].

use super::events::{ChangeListener, NoOpListener};
use super::fallback::FallbackSet;
use super::service::GeoResourceRegistry;
use crate::config::{Environment, RegistryConfig, StaticEnvironment};
use crate::log::{Logger, TracingLogger};
use crate::provider::{BackendBulkProvider, BackendClient, BulkProvider};
use crate::strategy::{BackendIdStrategy, ExternalUrlStrategy, ResolutionStrategy, StrategyChain};
use std::sync::Arc;

/// Collects the registry's collaborators.
///
/// Only the bulk provider is required. Defaults:
///
/// | collaborator | default                                  |
/// |--------------|------------------------------------------|
/// | strategies   | none with [`new`](Self::new); external url + backend id with [`for_backend`](Self::for_backend) |
/// | environment  | [`StaticEnvironment::backend`]           |
/// | fallback     | [`FallbackSet::default`]                 |
/// | listener     | [`NoOpListener`]                         |
/// | config       | [`RegistryConfig::default`]              |
/// | logger       | [`TracingLogger`]                        |
pub struct GeoResourceRegistryBuilder {
    provider: Arc<dyn BulkProvider>,
    strategies: StrategyChain,
    environment: Arc<dyn Environment>,
    fallback: FallbackSet,
    listener: Arc<dyn ChangeListener>,
    config: RegistryConfig,
    logger: Arc<dyn Logger>,
}

impl GeoResourceRegistryBuilder {
    pub fn new(provider: Arc<dyn BulkProvider>) -> Self {
        Self {
            provider,
            strategies: StrategyChain::default(),
            environment: Arc::new(StaticEnvironment::backend()),
            fallback: FallbackSet::default(),
            listener: Arc::new(NoOpListener),
            config: RegistryConfig::default(),
            logger: Arc::new(TracingLogger),
        }
    }

    /// Builder for a registry served by a backend.
    ///
    /// The catalog comes from [`BackendBulkProvider`]. The strategy chain is
    /// [`ExternalUrlStrategy`] followed by [`BackendIdStrategy`], both using
    /// `client`. Further `with_strategy` calls append after them.
    pub fn for_backend(client: Arc<dyn BackendClient>) -> Self {
        let provider: Arc<dyn BulkProvider> = Arc::new(BackendBulkProvider::new(client.clone()));
        let strategies: Vec<Arc<dyn ResolutionStrategy>> = vec![
            Arc::new(ExternalUrlStrategy::new()),
            Arc::new(BackendIdStrategy::new(client)),
        ];
        Self::new(provider).with_strategies(strategies)
    }

    /// Append a resolution strategy; strategies are asked in the order added.
    pub fn with_strategy(mut self, strategy: Arc<dyn ResolutionStrategy>) -> Self {
        self.strategies.push(strategy);
        self
    }

    /// Replace the strategy chain.
    pub fn with_strategies(mut self, strategies: Vec<Arc<dyn ResolutionStrategy>>) -> Self {
        self.strategies = StrategyChain::new(strategies);
        self
    }

    pub fn with_environment(mut self, environment: Arc<dyn Environment>) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_fallback(mut self, fallback: FallbackSet) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn with_listener(mut self, listener: Arc<dyn ChangeListener>) -> Self {
        self.listener = listener;
        self
    }

    pub fn with_config(mut self, config: RegistryConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn build(self) -> GeoResourceRegistry {
        GeoResourceRegistry::from_parts(
            self.provider,
            self.strategies,
            self.environment,
            self.fallback,
            self.listener,
            self.config,
            self.logger,
        )
    }
}
