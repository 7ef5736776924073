//! Command and query buses: resolve, instantiate, run the pipeline, hand back the typed result.

use std::any::type_name;
use std::sync::Arc;

use crate::activator::Activator;
use crate::error::DispatchError;
use crate::handler::Capability;
use crate::message::{Command, Envelope, Message, MessageKind, Query};
use crate::pipeline::Pipeline;
use crate::resolver::Resolver;

/// Shared machinery of both buses; only the message kind and behavior list differ.
#[derive(Clone)]
pub struct Dispatcher {
    kind: MessageKind,
    resolver: Arc<Resolver>,
    activator: Arc<Activator>,
    pipeline: Pipeline,
}

impl Dispatcher {
    pub fn new(
        kind: MessageKind,
        resolver: Arc<Resolver>,
        activator: Arc<Activator>,
        pipeline: Pipeline,
    ) -> Self {
        Self {
            kind,
            resolver,
            activator,
            pipeline,
        }
    }

    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    fn capability(&self) -> Capability {
        match self.kind {
            MessageKind::Command => Capability::CommandHandler,
            MessageKind::Query => Capability::QueryHandler,
        }
    }

    async fn execute<M, O>(&self, message: M) -> Result<O, DispatchError>
    where
        M: Message,
        O: Send + 'static,
    {
        let handler_name = self.resolver.resolve(&message).await?;
        let handler = self.activator.instantiate(&handler_name, self.capability())?;
        let output = self
            .pipeline
            .execute(Envelope::new(self.kind, message), handler.as_ref())
            .await?;
        output.downcast::<O>().map(|o| *o).map_err(|_| {
            DispatchError::Configuration(format!(
                "{} produced a result that is not {}",
                handler_name,
                type_name::<O>()
            ))
        })
    }
}

/// Entry point for commands.
#[derive(Clone)]
pub struct CommandBus {
    dispatcher: Dispatcher,
}

impl CommandBus {
    pub fn new(resolver: Arc<Resolver>, activator: Arc<Activator>, pipeline: Pipeline) -> Self {
        Self {
            dispatcher: Dispatcher::new(MessageKind::Command, resolver, activator, pipeline),
        }
    }

    /// Run `command` through the command pipeline. `C::Output` is `()` for commands without a result.
    pub async fn dispatch<C: Command>(&self, command: C) -> Result<C::Output, DispatchError> {
        self.dispatcher.execute::<C, C::Output>(command).await
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
}

/// Entry point for queries.
#[derive(Clone)]
pub struct QueryBus {
    dispatcher: Dispatcher,
}

impl QueryBus {
    pub fn new(resolver: Arc<Resolver>, activator: Arc<Activator>, pipeline: Pipeline) -> Self {
        Self {
            dispatcher: Dispatcher::new(MessageKind::Query, resolver, activator, pipeline),
        }
    }

    /// Run `query` through the query pipeline and return its result.
    pub async fn ask<Q: Query>(&self, query: Q) -> Result<Q::Output, DispatchError> {
        self.dispatcher.execute::<Q, Q::Output>(query).await
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
}
