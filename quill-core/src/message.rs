//! Command and Query markers, plus the type-erased envelope that travels through the pipeline.

use serde::Serialize;
use serde_json::Value;
use std::any::Any;
use std::fmt;

use crate::error::DispatchError;

/// Which bus a message belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Command,
    Query,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Command => "command",
            MessageKind::Query => "query",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anything the mediator can route. Field values are serialized only for logging.
///
/// `type_name` is the fully-qualified Rust path (`app::blog::commands::CreatePost`);
/// the naming convention works on it, so handlers must live in a sibling `handlers`
/// module for convention-based resolution.
pub trait Message: Serialize + Send + Sync + 'static {
    fn type_name() -> &'static str
    where
        Self: Sized,
    {
        std::any::type_name::<Self>()
    }

    /// Handler type name declared on the message type. Takes precedence over the convention.
    fn declared_handler() -> Option<&'static str>
    where
        Self: Sized,
    {
        None
    }
}

/// Intent to mutate state. `Output` is `()` for fire-and-forget commands.
/// Use `#[derive(Command)]` from quill-rs, or implement by hand.
pub trait Command: Message {
    type Output: Send + 'static;
}

/// Intent to read state; always produces an `Output`.
pub trait Query: Message {
    type Output: Send + 'static;
}

/// Type-level facts about a message, all the resolver needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MessageMeta {
    pub type_name: &'static str,
    pub declared_handler: Option<&'static str>,
}

impl MessageMeta {
    pub fn of<M: Message>() -> Self {
        Self {
            type_name: M::type_name(),
            declared_handler: M::declared_handler(),
        }
    }
}

trait ErasedMessage: Send + Sync {
    fn fields(&self) -> Result<Value, serde_json::Error>;
    fn into_any(self: Box<Self>) -> Box<dyn Any + Send>;
}

impl<M: Message> ErasedMessage for M {
    fn fields(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send> {
        self
    }
}

/// A message on its way through the pipeline, with its concrete type hidden.
pub struct Envelope {
    kind: MessageKind,
    type_name: &'static str,
    message: Box<dyn ErasedMessage>,
}

impl Envelope {
    pub fn new<M: Message>(kind: MessageKind, message: M) -> Self {
        Self {
            kind,
            type_name: M::type_name(),
            message: Box::new(message),
        }
    }

    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Field values as JSON, for logging.
    pub fn fields(&self) -> Value {
        self.message
            .fields()
            .unwrap_or_else(|e| Value::String(format!("<unserializable: {}>", e)))
    }

    /// Take the message back out. Fails with `InvalidArgument` unless it is exactly `M`.
    pub fn downcast<M: Message>(self) -> Result<M, DispatchError> {
        let actual = self.type_name;
        self.message
            .into_any()
            .downcast::<M>()
            .map(|m| *m)
            .map_err(|_| DispatchError::InvalidArgument {
                expected: M::type_name().to_owned(),
                actual: actual.to_owned(),
            })
    }
}

impl fmt::Debug for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Envelope")
            .field("kind", &self.kind)
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}
