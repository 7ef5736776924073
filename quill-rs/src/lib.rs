//! Quill: blog/users backend on top of the quill-core mediator. Messages derive `Command` or
//! `Query`, handlers live in each context's `handlers` module, `app::build_mediator` wires it up.

extern crate self as quill_rs;

pub mod app;
pub mod blog;
pub mod domain;
pub mod infrastructure;
pub mod scaffold;
pub mod users;

pub use quill_core::{
    async_trait, Behavior, Cache, CacheError, Command, CommandHandler, Container, ContainerError,
    DispatchConfig, DispatchError, Envelope, InMemoryCache, LoggingBehavior, Mediator,
    MediatorBuilder, Message, MessageKind, Module, Next, Output, Query, QueryHandler, Transaction,
    TransactionBehavior, TransactionManager,
};
pub use quill_rs_macros::{Command, Query};

pub use app::{build_mediator, Backend};
pub use blog::BlogModule;
pub use infrastructure::InMemoryStore;
pub use users::UsersModule;
