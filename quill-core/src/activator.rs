//! Activator: handler name -> fresh handler instance, checked against the expected capability.

use std::sync::Arc;

use crate::container::Container;
use crate::error::DispatchError;
use crate::handler::{Capability, CommandHandlerInstance, ErasedHandler, QueryHandlerInstance};
use crate::resolver::HandlerName;

pub struct Activator {
    container: Arc<Container>,
}

impl Activator {
    pub fn new(container: Arc<Container>) -> Self {
        Self { container }
    }

    /// Ask the container for a new instance of `handler` and make sure it is a `capability`.
    pub fn instantiate(
        &self,
        handler: &HandlerName,
        capability: Capability,
    ) -> Result<Box<dyn ErasedHandler>, DispatchError> {
        let instance = self.container.make(handler.as_str())?;
        let erased = match capability {
            Capability::CommandHandler => instance
                .downcast::<CommandHandlerInstance>()
                .map(|i| i.0)
                .ok(),
            Capability::QueryHandler => instance
                .downcast::<QueryHandlerInstance>()
                .map(|i| i.0)
                .ok(),
        };
        erased.ok_or_else(|| {
            DispatchError::Configuration(format!("{} is not a {}", handler, capability))
        })
    }
}
