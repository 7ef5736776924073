//! Behavior pipeline: an ordered chain of cross-cutting steps around the handler call.
//! The first behavior is the outermost: it runs first on the way in and last on the way out.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::DispatchError;
use crate::handler::{ErasedHandler, Output};
use crate::message::Envelope;

/// A pipeline step. Call `next.run(envelope)` to continue; returning without calling it
/// short-circuits the rest of the chain and the handler.
#[async_trait]
pub trait Behavior: Send + Sync {
    fn name(&self) -> &'static str;

    async fn handle(&self, envelope: Envelope, next: Next<'_>) -> Result<Output, DispatchError>;
}

/// The remainder of the chain after the current behavior.
pub struct Next<'a> {
    behaviors: &'a [Arc<dyn Behavior>],
    handler: &'a dyn ErasedHandler,
}

impl<'a> Next<'a> {
    pub async fn run(self, envelope: Envelope) -> Result<Output, DispatchError> {
        match self.behaviors.split_first() {
            Some((behavior, rest)) => {
                let next = Next {
                    behaviors: rest,
                    handler: self.handler,
                };
                behavior.handle(envelope, next).await
            }
            None => self.handler.call(envelope).await,
        }
    }
}

/// Behavior list for one bus. Fixed after construction.
#[derive(Clone)]
pub struct Pipeline {
    behaviors: Arc<[Arc<dyn Behavior>]>,
}

impl Pipeline {
    pub fn new(behaviors: Vec<Arc<dyn Behavior>>) -> Self {
        Self {
            behaviors: behaviors.into(),
        }
    }

    pub fn behavior_names(&self) -> Vec<&'static str> {
        self.behaviors.iter().map(|b| b.name()).collect()
    }

    /// Run `envelope` through every behavior, then `handler`.
    pub async fn execute(
        &self,
        envelope: Envelope,
        handler: &dyn ErasedHandler,
    ) -> Result<Output, DispatchError> {
        Next {
            behaviors: &self.behaviors,
            handler,
        }
        .run(envelope)
        .await
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
