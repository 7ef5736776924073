//! Handler as type: implement `CommandHandler<C>` / `QueryHandler<Q>`, register a factory in the
//! container, and the mediator resolves, instantiates and calls it per dispatch.

use async_trait::async_trait;
use std::any::Any;
use std::fmt;
use std::marker::PhantomData;

use crate::error::DispatchError;
use crate::message::{Command, Envelope, Query};

/// Erased handler output; the bus downcasts it back to the message's `Output`.
pub type Output = Box<dyn Any + Send>;

/// Handler for command `C`. One handler type per command type.
#[async_trait]
pub trait CommandHandler<C>: Send + Sync + 'static
where
    C: Command,
{
    async fn handle(&self, command: C) -> Result<C::Output, DispatchError>;
}

/// Handler for query `Q`. One handler type per query type.
#[async_trait]
pub trait QueryHandler<Q>: Send + Sync + 'static
where
    Q: Query,
{
    async fn handle(&self, query: Q) -> Result<Q::Output, DispatchError>;
}

/// What an instantiated handler must be able to do for the dispatch in progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capability {
    CommandHandler,
    QueryHandler,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::CommandHandler => f.write_str("CommandHandler"),
            Capability::QueryHandler => f.write_str("QueryHandler"),
        }
    }
}

/// Terminal step of the pipeline: a handler with its message type hidden.
#[async_trait]
pub trait ErasedHandler: Send + Sync {
    /// Type name of the one message this handler accepts.
    fn message_type(&self) -> &'static str;

    /// Unwraps the envelope (type guard first) and runs the handler.
    async fn call(&self, envelope: Envelope) -> Result<Output, DispatchError>;
}

/// What a command handler factory puts in the container.
pub struct CommandHandlerInstance(pub Box<dyn ErasedHandler>);

/// What a query handler factory puts in the container.
pub struct QueryHandlerInstance(pub Box<dyn ErasedHandler>);

pub(crate) struct CommandAdapter<C, H> {
    handler: H,
    _message: PhantomData<fn(C)>,
}

impl<C, H> CommandAdapter<C, H> {
    pub(crate) fn new(handler: H) -> Self {
        Self {
            handler,
            _message: PhantomData,
        }
    }
}

#[async_trait]
impl<C, H> ErasedHandler for CommandAdapter<C, H>
where
    C: Command,
    H: CommandHandler<C>,
{
    fn message_type(&self) -> &'static str {
        C::type_name()
    }

    async fn call(&self, envelope: Envelope) -> Result<Output, DispatchError> {
        let command = envelope.downcast::<C>()?;
        let output = self.handler.handle(command).await?;
        Ok(Box::new(output))
    }
}

pub(crate) struct QueryAdapter<Q, H> {
    handler: H,
    _message: PhantomData<fn(Q)>,
}

impl<Q, H> QueryAdapter<Q, H> {
    pub(crate) fn new(handler: H) -> Self {
        Self {
            handler,
            _message: PhantomData,
        }
    }
}

#[async_trait]
impl<Q, H> ErasedHandler for QueryAdapter<Q, H>
where
    Q: Query,
    H: QueryHandler<Q>,
{
    fn message_type(&self) -> &'static str {
        Q::type_name()
    }

    async fn call(&self, envelope: Envelope) -> Result<Output, DispatchError> {
        let query = envelope.downcast::<Q>()?;
        let output = self.handler.handle(query).await?;
        Ok(Box::new(output))
    }
}

/// Wrap a command handler so it can run at the end of a pipeline.
pub fn erase_command_handler<C, H>(handler: H) -> Box<dyn ErasedHandler>
where
    C: Command,
    H: CommandHandler<C>,
{
    Box::new(CommandAdapter::<C, H>::new(handler))
}

/// Wrap a query handler so it can run at the end of a pipeline.
pub fn erase_query_handler<Q, H>(handler: H) -> Box<dyn ErasedHandler>
where
    Q: Query,
    H: QueryHandler<Q>,
{
    Box::new(QueryAdapter::<Q, H>::new(handler))
}
