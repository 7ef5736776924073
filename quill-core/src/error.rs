//! Dispatch errors: resolution, activation, handler type guard and domain failures.

use thiserror::Error;

use crate::cache::CacheError;
use crate::container::ContainerError;

/// Every failure a dispatch can end with. Behaviors pass these through unchanged.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// A declared handler is not registered, or a handler has the wrong capability.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Neither an explicit declaration nor the naming convention produced a registered handler.
    #[error("no handler for {message_type} (looked for {candidate})")]
    HandlerNotFound {
        message_type: String,
        candidate: String,
    },

    /// A handler was invoked with a message of another type. Wiring bug, not a user error.
    #[error("invalid argument: expected {expected}, got {actual}")]
    InvalidArgument { expected: String, actual: String },

    /// A looked-up entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A business rule was violated.
    #[error("invariant violation: {reason}")]
    InvariantViolation { reason: String },

    /// Input failed a validation rule inside a handler.
    #[error("validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Container(#[from] ContainerError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error("transaction error: {0}")]
    Transaction(String),
}

impl DispatchError {
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DispatchError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    pub fn invariant(reason: impl Into<String>) -> Self {
        DispatchError::InvariantViolation {
            reason: reason.into(),
        }
    }

    pub fn validation(reason: impl Into<String>) -> Self {
        DispatchError::Validation(reason.into())
    }
}
