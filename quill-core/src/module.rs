//! Module trait: a bounded context registers its handlers and dependencies into the container.

use crate::container::Container;
use crate::error::DispatchError;

/// Module: register into the container (repositories, handler factories).
pub trait Module {
    fn register_into(&mut self, container: &mut Container) -> Result<(), DispatchError>;
}
