//! Minimal DI container: shared instances by type, transient factories by string key.
//! Handlers are registered as keyed factories under their type name and built fresh per `make`.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use thiserror::Error;

use crate::handler::{
    erase_command_handler, erase_query_handler, CommandHandler, CommandHandlerInstance, QueryHandler,
    QueryHandlerInstance,
};
use crate::message::{Command, Query};

#[derive(Error, Debug)]
pub enum ContainerError {
    #[error("no registration for type {0}")]
    NotFound(&'static str),
    #[error("no registration for key {0}")]
    KeyNotFound(String),
}

type FactoryFn = Box<dyn Fn(&Container) -> Result<Box<dyn Any + Send>, ContainerError> + Send + Sync>;

/// Lets the resolver ask whether a handler name can be instantiated, without building it.
pub trait HandlerLookup: Send + Sync {
    fn contains(&self, key: &str) -> bool;
}

/// Minimal DI container: register instance by type, register factory by key, resolve or make.
pub struct Container {
    store: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
    keyed_factories: HashMap<String, FactoryFn>,
}

impl Container {
    pub fn new() -> Self {
        Self {
            store: HashMap::new(),
            keyed_factories: HashMap::new(),
        }
    }

    /// Register a ready-made shared instance (repositories, caches: usually an `Arc<dyn Trait>`).
    pub fn register_instance<T: Send + Sync + 'static>(&mut self, value: T) {
        self.store.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Resolve a shared instance by type.
    pub fn resolve<T: 'static>(&self) -> Result<&T, ContainerError> {
        self.store
            .get(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_ref::<T>())
            .ok_or(ContainerError::NotFound(type_name::<T>()))
    }

    /// Register a transient factory under a string key. Replaces any previous factory for the key.
    pub fn register_factory_with_key<K, T, F>(&mut self, key: K, f: F)
    where
        K: Into<String>,
        T: Send + 'static,
        F: Fn(&Container) -> Result<T, ContainerError> + Send + Sync + 'static,
    {
        let factory: FactoryFn = Box::new(move |c: &Container| {
            let value = f(c)?;
            Ok(Box::new(value) as Box<dyn Any + Send>)
        });
        self.keyed_factories.insert(key.into(), factory);
    }

    /// Build a new instance from the factory registered under `key`.
    pub fn make(&self, key: &str) -> Result<Box<dyn Any + Send>, ContainerError> {
        let factory = self
            .keyed_factories
            .get(key)
            .ok_or_else(|| ContainerError::KeyNotFound(key.to_owned()))?;
        factory(self)
    }

    /// Register handler `H` for command `C` under `H`'s type name.
    pub fn register_command_handler<C, H, F>(&mut self, factory: F)
    where
        C: Command,
        H: CommandHandler<C>,
        F: Fn(&Container) -> Result<H, ContainerError> + Send + Sync + 'static,
    {
        self.register_factory_with_key(type_name::<H>(), move |c: &Container| {
            let handler = factory(c)?;
            Ok(CommandHandlerInstance(erase_command_handler::<C, H>(handler)))
        });
    }

    /// Register handler `H` for query `Q` under `H`'s type name.
    pub fn register_query_handler<Q, H, F>(&mut self, factory: F)
    where
        Q: Query,
        H: QueryHandler<Q>,
        F: Fn(&Container) -> Result<H, ContainerError> + Send + Sync + 'static,
    {
        self.register_factory_with_key(type_name::<H>(), move |c: &Container| {
            let handler = factory(c)?;
            Ok(QueryHandlerInstance(erase_query_handler::<Q, H>(handler)))
        });
    }
}

impl HandlerLookup for Container {
    fn contains(&self, key: &str) -> bool {
        self.keyed_factories.contains_key(key)
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}
