//! Behavior chain: ordering, short-circuit, transaction scope, logging pass-through.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use quill_core::{
    Behavior, CommandHandler, DispatchError, Envelope, LoggingBehavior, Mediator, Next, Output,
    Transaction, TransactionBehavior, TransactionManager,
};

type Trace = Arc<Mutex<Vec<String>>>;

mod commands {
    use serde::Serialize;

    #[derive(Serialize)]
    pub struct Ping {
        pub fail: bool,
    }
    impl quill_core::Message for Ping {}
    impl quill_core::Command for Ping {
        type Output = &'static str;
    }
}

mod handlers {
    use super::*;
    use crate::commands::Ping;

    pub struct PingHandler {
        pub trace: Trace,
    }

    #[async_trait]
    impl CommandHandler<Ping> for PingHandler {
        async fn handle(&self, command: Ping) -> Result<&'static str, DispatchError> {
            self.trace.lock().unwrap().push("Handler".into());
            if command.fail {
                return Err(DispatchError::invariant("ping refused"));
            }
            Ok("pong")
        }
    }
}

struct Tracing {
    label: &'static str,
    trace: Trace,
}

#[async_trait]
impl Behavior for Tracing {
    fn name(&self) -> &'static str {
        self.label
    }

    async fn handle(&self, envelope: Envelope, next: Next<'_>) -> Result<Output, DispatchError> {
        self.trace.lock().unwrap().push(format!("{}-enter", self.label));
        let result = next.run(envelope).await;
        self.trace.lock().unwrap().push(format!("{}-exit", self.label));
        result
    }
}

struct ShortCircuit;

#[async_trait]
impl Behavior for ShortCircuit {
    fn name(&self) -> &'static str {
        "short-circuit"
    }

    async fn handle(&self, _envelope: Envelope, _next: Next<'_>) -> Result<Output, DispatchError> {
        Ok(Box::new("cached"))
    }
}

struct RecordingTransactions {
    trace: Trace,
}

struct RecordingTransaction {
    trace: Trace,
}

#[async_trait]
impl TransactionManager for RecordingTransactions {
    async fn begin(&self) -> Result<Box<dyn Transaction>, DispatchError> {
        self.trace.lock().unwrap().push("begin".into());
        Ok(Box::new(RecordingTransaction {
            trace: self.trace.clone(),
        }))
    }
}

#[async_trait]
impl Transaction for RecordingTransaction {
    async fn commit(self: Box<Self>) -> Result<(), DispatchError> {
        self.trace.lock().unwrap().push("commit".into());
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), DispatchError> {
        self.trace.lock().unwrap().push("rollback".into());
        Ok(())
    }
}

fn mediator_with(trace: &Trace, behaviors: Vec<Arc<dyn Behavior>>) -> Mediator {
    let mut builder = Mediator::builder();
    let handler_trace = trace.clone();
    builder
        .container_mut()
        .register_command_handler::<commands::Ping, handlers::PingHandler, _>(move |_| {
            Ok(handlers::PingHandler {
                trace: handler_trace.clone(),
            })
        });
    behaviors
        .into_iter()
        .fold(builder, |b, behavior| b.command_behavior(behavior))
        .build()
}

fn entries(trace: &Trace) -> Vec<String> {
    trace.lock().unwrap().clone()
}

#[tokio::test]
async fn first_behavior_is_outermost() {
    let trace = Trace::default();
    let mediator = mediator_with(
        &trace,
        vec![
            Arc::new(Tracing { label: "A", trace: trace.clone() }),
            Arc::new(Tracing { label: "B", trace: trace.clone() }),
        ],
    );
    let out = mediator.dispatch(commands::Ping { fail: false }).await.unwrap();
    assert_eq!(out, "pong");
    assert_eq!(
        entries(&trace),
        vec!["A-enter", "B-enter", "Handler", "B-exit", "A-exit"]
    );
    assert_eq!(mediator.commands().dispatcher().pipeline().behavior_names(), vec!["A", "B"]);
}

#[tokio::test]
async fn behavior_that_skips_next_short_circuits() {
    let trace = Trace::default();
    let mediator = mediator_with(
        &trace,
        vec![
            Arc::new(Tracing { label: "A", trace: trace.clone() }),
            Arc::new(ShortCircuit),
            Arc::new(Tracing { label: "B", trace: trace.clone() }),
        ],
    );
    let out = mediator.dispatch(commands::Ping { fail: false }).await.unwrap();
    assert_eq!(out, "cached");
    assert_eq!(entries(&trace), vec!["A-enter", "A-exit"]);
}

#[tokio::test]
async fn transaction_commits_on_success() {
    let trace = Trace::default();
    let manager = Arc::new(RecordingTransactions { trace: trace.clone() });
    let mediator = mediator_with(&trace, vec![Arc::new(TransactionBehavior::new(manager))]);
    mediator.dispatch(commands::Ping { fail: false }).await.unwrap();
    assert_eq!(entries(&trace), vec!["begin", "Handler", "commit"]);
}

#[tokio::test]
async fn transaction_rolls_back_and_error_is_unchanged() {
    let trace = Trace::default();
    let manager = Arc::new(RecordingTransactions { trace: trace.clone() });
    let mediator = mediator_with(
        &trace,
        vec![
            Arc::new(TransactionBehavior::new(manager)),
            Arc::new(LoggingBehavior::new()),
        ],
    );
    let err = mediator.dispatch(commands::Ping { fail: true }).await.unwrap_err();
    match err {
        DispatchError::InvariantViolation { reason } => assert_eq!(reason, "ping refused"),
        other => panic!("expected InvariantViolation, got {:?}", other),
    }
    assert_eq!(entries(&trace), vec!["begin", "Handler", "rollback"]);
}

#[tokio::test]
async fn empty_pipeline_calls_handler_directly() {
    let trace = Trace::default();
    let mediator = mediator_with(&trace, Vec::new());
    assert_eq!(mediator.dispatch(commands::Ping { fail: false }).await.unwrap(), "pong");
    assert_eq!(entries(&trace), vec!["Handler"]);
}
