//! Mediator: the command and query buses built from one container, cache and config.

use std::sync::Arc;

use crate::activator::Activator;
use crate::cache::{Cache, InMemoryCache};
use crate::config::DispatchConfig;
use crate::container::Container;
use crate::dispatcher::{CommandBus, QueryBus};
use crate::error::DispatchError;
use crate::message::{Command, Query};
use crate::module::Module;
use crate::pipeline::{Behavior, Pipeline};
use crate::resolver::Resolver;

/// Facade over both buses. Cheap to clone; share one per process.
#[derive(Clone)]
pub struct Mediator {
    commands: CommandBus,
    queries: QueryBus,
    resolver: Arc<Resolver>,
}

impl Mediator {
    pub fn builder() -> MediatorBuilder {
        MediatorBuilder::new()
    }

    pub async fn dispatch<C: Command>(&self, command: C) -> Result<C::Output, DispatchError> {
        self.commands.dispatch(command).await
    }

    pub async fn ask<Q: Query>(&self, query: Q) -> Result<Q::Output, DispatchError> {
        self.queries.ask(query).await
    }

    pub fn commands(&self) -> &CommandBus {
        &self.commands
    }

    pub fn queries(&self) -> &QueryBus {
        &self.queries
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }
}

/// Collects modules, behaviors, cache and config; `build` freezes them.
pub struct MediatorBuilder {
    container: Container,
    cache: Option<Arc<dyn Cache>>,
    config: DispatchConfig,
    command_behaviors: Vec<Arc<dyn Behavior>>,
    query_behaviors: Vec<Arc<dyn Behavior>>,
}

impl MediatorBuilder {
    pub fn new() -> Self {
        Self {
            container: Container::new(),
            cache: None,
            config: DispatchConfig::default(),
            command_behaviors: Vec::new(),
            query_behaviors: Vec::new(),
        }
    }

    /// Start from a container that already holds shared dependencies.
    pub fn with_container(mut self, container: Container) -> Self {
        self.container = container;
        self
    }

    pub fn container_mut(&mut self) -> &mut Container {
        &mut self.container
    }

    /// Register a bounded context. Like `app.register(&mut module)`.
    pub fn register(mut self, module: &mut dyn Module) -> Result<Self, DispatchError> {
        module.register_into(&mut self.container)?;
        Ok(self)
    }

    /// Resolution cache. Defaults to a fresh `InMemoryCache`.
    pub fn cache(mut self, cache: Arc<dyn Cache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn config(mut self, config: DispatchConfig) -> Self {
        self.config = config;
        self
    }

    /// Append a behavior to the command pipeline. The first one added is the outermost.
    pub fn command_behavior(mut self, behavior: Arc<dyn Behavior>) -> Self {
        self.command_behaviors.push(behavior);
        self
    }

    /// Append a behavior to the query pipeline. The first one added is the outermost.
    pub fn query_behavior(mut self, behavior: Arc<dyn Behavior>) -> Self {
        self.query_behaviors.push(behavior);
        self
    }

    pub fn build(self) -> Mediator {
        let cache = self
            .cache
            .unwrap_or_else(|| Arc::new(InMemoryCache::new()) as Arc<dyn Cache>);
        let container = Arc::new(self.container);
        let resolver = Arc::new(Resolver::new(container.clone(), cache, &self.config));
        let activator = Arc::new(Activator::new(container));
        Mediator {
            commands: CommandBus::new(
                resolver.clone(),
                activator.clone(),
                Pipeline::new(self.command_behaviors),
            ),
            queries: QueryBus::new(resolver.clone(), activator, Pipeline::new(self.query_behaviors)),
            resolver,
        }
    }
}

impl Default for MediatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
