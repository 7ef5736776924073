//! Stock behaviors: transaction scope and dispatch logging.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;

use crate::error::DispatchError;
use crate::handler::Output;
use crate::message::Envelope;
use crate::pipeline::{Behavior, Next};

/// An open unit of work. Consumed by commit or rollback.
#[async_trait]
pub trait Transaction: Send {
    async fn commit(self: Box<Self>) -> Result<(), DispatchError>;
    async fn rollback(self: Box<Self>) -> Result<(), DispatchError>;
}

/// Opens transactions on the store the handlers write to.
#[async_trait]
pub trait TransactionManager: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn Transaction>, DispatchError>;
}

/// Wraps the rest of the chain in a transaction: commit on `Ok`, rollback on `Err`.
/// The chain's error is returned as is, even when the rollback itself fails.
pub struct TransactionBehavior {
    manager: Arc<dyn TransactionManager>,
}

impl TransactionBehavior {
    pub fn new(manager: Arc<dyn TransactionManager>) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl Behavior for TransactionBehavior {
    fn name(&self) -> &'static str {
        "transaction"
    }

    async fn handle(&self, envelope: Envelope, next: Next<'_>) -> Result<Output, DispatchError> {
        let message_type = envelope.type_name();
        let tx = self.manager.begin().await?;
        match next.run(envelope).await {
            Ok(output) => {
                tx.commit().await?;
                tracing::debug!(message_type, "transaction committed");
                Ok(output)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::error!(message_type, error = %rollback_err, "rollback failed");
                } else {
                    tracing::debug!(message_type, "transaction rolled back");
                }
                Err(err)
            }
        }
    }
}

/// Logs "dispatch started" with the message fields, then "dispatch completed" or "dispatch failed".
#[derive(Clone, Copy, Debug, Default)]
pub struct LoggingBehavior;

impl LoggingBehavior {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Behavior for LoggingBehavior {
    fn name(&self) -> &'static str {
        "logging"
    }

    async fn handle(&self, envelope: Envelope, next: Next<'_>) -> Result<Output, DispatchError> {
        let kind = envelope.kind();
        let message_type = envelope.type_name();
        tracing::info!(
            kind = %kind,
            message_type,
            fields = %envelope.fields(),
            "dispatch started"
        );
        let started = Instant::now();
        let result = next.run(envelope).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(_) => tracing::info!(kind = %kind, message_type, elapsed_ms, "dispatch completed"),
            Err(err) => tracing::warn!(kind = %kind, message_type, elapsed_ms, error = %err, "dispatch failed"),
        }
        result
    }
}
