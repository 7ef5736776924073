//! Quill core: in-process command/query mediator. Resolves a handler per message type
//! (explicit declaration, then naming convention), instantiates it from the container and runs
//! it through a behavior pipeline.

pub mod activator;
pub mod behaviors;
pub mod cache;
pub mod config;
pub mod container;
pub mod convention;
pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod mediator;
pub mod message;
pub mod module;
pub mod pipeline;
pub mod resolver;

pub use activator::Activator;
pub use behaviors::{LoggingBehavior, Transaction, TransactionBehavior, TransactionManager};
pub use cache::{Cache, CacheError, InMemoryCache};
#[cfg(feature = "redis")]
pub use cache::RedisCache;
pub use config::DispatchConfig;
pub use container::{Container, ContainerError, HandlerLookup};
pub use convention::conventional_handler_name;
pub use dispatcher::{CommandBus, Dispatcher, QueryBus};
pub use error::DispatchError;
pub use handler::{Capability, CommandHandler, ErasedHandler, Output, QueryHandler};
pub use mediator::{Mediator, MediatorBuilder};
pub use message::{Command, Envelope, Message, MessageKind, MessageMeta, Query};
pub use module::Module;
pub use pipeline::{Behavior, Next, Pipeline};
pub use resolver::{HandlerName, Resolver};

pub use async_trait::async_trait;
