//! Buses end to end: queries, type guard, capability checks, fresh handler per dispatch.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use quill_core::handler::{erase_command_handler, erase_query_handler};
use quill_core::{
    CommandHandler, DispatchError, Envelope, Mediator, MessageKind, QueryHandler,
};

mod commands {
    use serde::Serialize;

    #[derive(Serialize)]
    pub struct Increment {
        pub by: u32,
    }
    impl quill_core::Message for Increment {}
    impl quill_core::Command for Increment {
        type Output = ();
    }

    #[derive(Serialize)]
    pub struct Reset;
    impl quill_core::Message for Reset {}
    impl quill_core::Command for Reset {
        type Output = ();
    }
}

mod queries {
    use serde::Serialize;

    #[derive(Serialize)]
    pub struct Total;
    impl quill_core::Message for Total {}
    impl quill_core::Query for Total {
        type Output = usize;
    }
}

mod handlers {
    use super::*;
    use crate::commands::Increment;
    use crate::queries::Total;

    pub struct IncrementHandler {
        pub counter: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl CommandHandler<Increment> for IncrementHandler {
        async fn handle(&self, command: Increment) -> Result<(), DispatchError> {
            self.counter.fetch_add(command.by as usize, Ordering::SeqCst);
            Ok(())
        }
    }

    pub struct TotalHandler {
        pub counter: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl QueryHandler<Total> for TotalHandler {
        async fn handle(&self, _query: Total) -> Result<usize, DispatchError> {
            Ok(self.counter.load(Ordering::SeqCst))
        }
    }

    /// Registered under the name the convention derives for `Reset`, but as a query handler.
    pub struct ResetHandler {
        pub counter: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl QueryHandler<Total> for ResetHandler {
        async fn handle(&self, _query: Total) -> Result<usize, DispatchError> {
            Ok(self.counter.swap(0, Ordering::SeqCst))
        }
    }
}

struct Fixture {
    mediator: Mediator,
    counter: Arc<AtomicUsize>,
    built: Arc<AtomicUsize>,
}

fn fixture() -> Fixture {
    let counter = Arc::new(AtomicUsize::new(0));
    let built = Arc::new(AtomicUsize::new(0));
    let mut builder = Mediator::builder();
    let container = builder.container_mut();
    container.register_instance(counter.clone());
    {
        let built = built.clone();
        container.register_command_handler::<commands::Increment, handlers::IncrementHandler, _>(
            move |c| {
                built.fetch_add(1, Ordering::SeqCst);
                Ok(handlers::IncrementHandler {
                    counter: c.resolve::<Arc<AtomicUsize>>()?.clone(),
                })
            },
        );
    }
    container.register_query_handler::<queries::Total, handlers::TotalHandler, _>(|c| {
        Ok(handlers::TotalHandler {
            counter: c.resolve::<Arc<AtomicUsize>>()?.clone(),
        })
    });
    container.register_query_handler::<queries::Total, handlers::ResetHandler, _>(|c| {
        Ok(handlers::ResetHandler {
            counter: c.resolve::<Arc<AtomicUsize>>()?.clone(),
        })
    });
    Fixture {
        mediator: builder.build(),
        counter,
        built,
    }
}

#[tokio::test]
async fn commands_and_queries_reach_their_handlers() {
    let f = fixture();
    f.mediator.dispatch(commands::Increment { by: 2 }).await.unwrap();
    f.mediator.dispatch(commands::Increment { by: 3 }).await.unwrap();
    assert_eq!(f.mediator.ask(queries::Total).await.unwrap(), 5);
    assert_eq!(f.counter.load(Ordering::SeqCst), 5);
}

#[tokio::test]
async fn handler_is_instantiated_per_dispatch() {
    let f = fixture();
    for _ in 0..3 {
        f.mediator.dispatch(commands::Increment { by: 1 }).await.unwrap();
    }
    assert_eq!(f.built.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn handler_with_wrong_capability_is_rejected() {
    let f = fixture();
    let err = f.mediator.dispatch(commands::Reset).await.unwrap_err();
    match err {
        DispatchError::Configuration(msg) => {
            assert!(msg.contains("ResetHandler"), "{}", msg);
            assert!(msg.contains("CommandHandler"), "{}", msg);
        }
        other => panic!("expected Configuration, got {:?}", other),
    }
}

#[tokio::test]
async fn command_handler_rejects_other_message_types() {
    let counter = Arc::new(AtomicUsize::new(0));
    let handler = erase_command_handler::<commands::Increment, _>(handlers::IncrementHandler {
        counter: counter.clone(),
    });
    let err = handler
        .call(Envelope::new(MessageKind::Command, commands::Reset))
        .await
        .err()
        .unwrap();
    match err {
        DispatchError::InvalidArgument { expected, actual } => {
            assert!(expected.ends_with("commands::Increment"), "{}", expected);
            assert!(actual.ends_with("commands::Reset"), "{}", actual);
        }
        other => panic!("expected InvalidArgument, got {:?}", other),
    }
    assert_eq!(counter.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn query_handler_rejects_other_message_types() {
    let handler = erase_query_handler::<queries::Total, _>(handlers::TotalHandler {
        counter: Arc::new(AtomicUsize::new(0)),
    });
    assert!(handler.message_type().ends_with("queries::Total"));
    let err = handler
        .call(Envelope::new(MessageKind::Query, commands::Increment { by: 1 }))
        .await
        .err()
        .unwrap();
    assert!(matches!(err, DispatchError::InvalidArgument { .. }));
}

#[tokio::test]
async fn unknown_message_reports_handler_not_found() {
    #[derive(serde::Serialize)]
    struct Orphan;
    impl quill_core::Message for Orphan {}
    impl quill_core::Command for Orphan {
        type Output = ();
    }

    let f = fixture();
    let err = f.mediator.dispatch(Orphan).await.unwrap_err();
    assert!(matches!(err, DispatchError::HandlerNotFound { .. }), "{:?}", err);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_dispatches_share_one_mediator() {
    let f = fixture();
    let mut tasks = Vec::new();
    for _ in 0..16 {
        let mediator = f.mediator.clone();
        tasks.push(tokio::spawn(async move {
            mediator.dispatch(commands::Increment { by: 1 }).await
        }));
    }
    for task in tasks {
        task.await.unwrap().unwrap();
    }
    assert_eq!(f.mediator.ask(queries::Total).await.unwrap(), 16);
}
