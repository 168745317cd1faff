//! Integration tests for actor start-up, message delivery, and shutdown.
//!
//! Tests the complete lifecycle end to end, across real OS threads:
//! - Barrier-gated startup (no message observed before `Running`)
//! - Ordered message delivery and poison-pill termination
//! - Failed initialization and its effect on the assigned handle
//! - Dense, non-reused handle allocation across repeated `start` calls

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Arc;

use threadactor::error::ActorFailure;
use threadactor::message::{downcast_payload, payload, Payload};
use threadactor::{Actor, ActorContext, ActorParams, ActorRegistry, ActorStatus, RuntimeConfig};

struct AccumulatingActor {
    total: Arc<AtomicI64>,
    observed_running_before_process: Arc<AtomicUsize>,
}

impl Actor for AccumulatingActor {
    fn initialize(&mut self, _ctx: &ActorContext) -> Result<(), ActorFailure> {
        self.observed_running_before_process.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn process(&mut self, _kind: i32, payload: Option<Payload>, _ctx: &ActorContext) -> Result<(), ActorFailure> {
        if let Some(delta) = payload.as_ref().and_then(|p| downcast_payload::<i64>(p)) {
            self.total.fetch_add(*delta, Ordering::SeqCst);
        }
        Ok(())
    }
}

struct RefusingActor;

impl Actor for RefusingActor {
    fn initialize(&mut self, _ctx: &ActorContext) -> Result<(), ActorFailure> {
        Err("refused to start".into())
    }

    fn process(&mut self, _kind: i32, _payload: Option<Payload>, _ctx: &ActorContext) -> Result<(), ActorFailure> {
        Ok(())
    }
}

#[test]
fn messages_are_delivered_in_order_until_poison() {
    let registry = Arc::new(ActorRegistry::new(RuntimeConfig::default()));
    let total = Arc::new(AtomicI64::new(0));
    let init_marker = Arc::new(AtomicUsize::new(0));

    let handles = registry
        .start(vec![ActorParams::new(
            AccumulatingActor {
                total: Arc::clone(&total),
                observed_running_before_process: Arc::clone(&init_marker),
            },
            "accumulator",
        )])
        .unwrap();

    assert_eq!(init_marker.load(Ordering::SeqCst), 1);
    assert_eq!(registry.status_of(handles[0]), Some(ActorStatus::Running));

    for delta in [1i64, 2, 3, 4] {
        registry.enqueue(handles[0], 1, Some(payload(delta))).unwrap();
    }

    registry.stop_threads(&handles);

    assert_eq!(total.load(Ordering::SeqCst), 10);
    assert_eq!(registry.status_of(handles[0]), Some(ActorStatus::Exited));
}

#[test]
fn failed_initialization_puts_actor_in_error_state() {
    let registry = Arc::new(ActorRegistry::new(RuntimeConfig::default()));
    let result = registry.start(vec![ActorParams::new(RefusingActor, "refuser")]);

    assert!(result.is_err());
    let handle = registry.lookup("refuser").expect("handle stays allocated");
    assert_eq!(registry.status_of(handle), Some(ActorStatus::Error));

    // A handle that never reached Running is still a known, addressable
    // destination for the purposes of routing; only enqueue is refused.
    let send_result = registry.enqueue(handle, 1, None);
    assert!(send_result.is_err());
}

#[test]
fn handles_are_dense_and_never_reused_across_separate_starts() {
    let registry = Arc::new(ActorRegistry::new(RuntimeConfig::default()));
    let total = Arc::new(AtomicI64::new(0));
    let marker = Arc::new(AtomicUsize::new(0));

    let first = registry
        .start(vec![ActorParams::new(
            AccumulatingActor {
                total: Arc::clone(&total),
                observed_running_before_process: Arc::clone(&marker),
            },
            "first",
        )])
        .unwrap();
    registry.stop_threads(&first);

    let second = registry
        .start(vec![ActorParams::new(
            AccumulatingActor {
                total,
                observed_running_before_process: marker,
            },
            "second",
        )])
        .unwrap();

    assert_eq!(first[0].as_u64(), 1);
    assert_eq!(second[0].as_u64(), 2);
    assert_ne!(first[0], second[0]);
    assert_eq!(registry.status_of(first[0]), Some(ActorStatus::Exited));

    registry.stop_threads(&second);
}

#[test]
fn enqueue_after_shutdown_is_rejected() {
    let registry = Arc::new(ActorRegistry::new(RuntimeConfig::default()));
    let total = Arc::new(AtomicI64::new(0));
    let marker = Arc::new(AtomicUsize::new(0));

    let handles = registry
        .start(vec![ActorParams::new(
            AccumulatingActor {
                total,
                observed_running_before_process: marker,
            },
            "disposable",
        )])
        .unwrap();

    registry.stop_threads(&handles);

    let result = registry.enqueue(handles[0], 1, None);
    assert!(result.is_err());
    assert!(!result.unwrap_err().is_dest_invalid());
}
