//! Application wiring: shared dependencies into the container, modules, behavior pipelines.

use std::sync::Arc;

use quill_core::{
    Cache, Container, DispatchConfig, DispatchError, InMemoryCache, LoggingBehavior, Mediator,
    TransactionBehavior, TransactionManager,
};

use crate::blog::BlogModule;
use crate::domain::{BlogPostRepository, TagRepository, UserRepository};
use crate::infrastructure::InMemoryStore;
use crate::users::UsersModule;

/// Everything the handlers depend on.
pub struct Backend {
    pub posts: Arc<dyn BlogPostRepository>,
    pub tags: Arc<dyn TagRepository>,
    pub users: Arc<dyn UserRepository>,
    pub transactions: Arc<dyn TransactionManager>,
    /// Handler bindings and verification tokens.
    pub cache: Arc<dyn Cache>,
}

impl Backend {
    /// One `InMemoryStore` behind every repository, plus an in-memory cache.
    pub fn in_memory() -> (Self, InMemoryStore) {
        let store = InMemoryStore::new();
        let backend = Self {
            posts: Arc::new(store.clone()),
            tags: Arc::new(store.clone()),
            users: Arc::new(store.clone()),
            transactions: Arc::new(store.clone()),
            cache: Arc::new(InMemoryCache::new()),
        };
        (backend, store)
    }
}

/// Commands run inside `[Transaction, Logging]`, queries inside `[Logging]`.
pub fn build_mediator(backend: Backend, config: DispatchConfig) -> Result<Mediator, DispatchError> {
    let mut container = Container::new();
    container.register_instance(backend.posts);
    container.register_instance(backend.tags);
    container.register_instance(backend.users);
    container.register_instance(backend.cache.clone());

    let logging = Arc::new(LoggingBehavior::new());
    let mediator = Mediator::builder()
        .with_container(container)
        .register(&mut BlogModule)?
        .register(&mut UsersModule)?
        .cache(backend.cache)
        .config(config)
        .command_behavior(Arc::new(TransactionBehavior::new(backend.transactions)))
        .command_behavior(logging.clone())
        .query_behavior(logging)
        .build();
    Ok(mediator)
}
