//! `ActorRegistry`: the process-wide directory of running actors.

// Layer 1: Standard library imports
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

// Layer 2: Third-party crate imports
use dashmap::DashMap;
use parking_lot::RwLock;

// Layer 3: Internal module imports
use crate::actor::{ActorContext, ActorParams};
use crate::config::{clamp_mailbox_capacity, RuntimeConfig};
use crate::error::RuntimeError;
use crate::message::{Envelope, Payload};
use crate::runner::ActorRunner;
use crate::util::{ActorHandle, ActorStatus};

static GLOBAL_REGISTRY: OnceLock<Arc<ActorRegistry>> = OnceLock::new();

/// Install and return the process-wide registry. May be called only once;
/// a second call returns [`RuntimeError::AlreadyInited`].
pub fn init_global_registry(config: RuntimeConfig) -> Result<Arc<ActorRegistry>, RuntimeError> {
    let registry = Arc::new(ActorRegistry::new(config));
    GLOBAL_REGISTRY
        .set(Arc::clone(&registry))
        .map_err(|_| RuntimeError::AlreadyInited("actor registry".to_string()))?;
    Ok(registry)
}

/// Borrow the process-wide registry installed by [`init_global_registry`].
/// Returns `None` if it was never installed.
pub fn global_registry() -> Option<Arc<ActorRegistry>> {
    GLOBAL_REGISTRY.get().cloned()
}

/// Directory of every actor started in this process: handle allocation,
/// name-based routing, and batched start/stop.
///
/// Handles are dense and never reused: the allocator is a monotonic counter,
/// and a stopped actor's slot is left populated (in the `Exited`/`Error`
/// state) rather than removed, so a later `start` can never collide with an
/// old handle.
pub struct ActorRegistry {
    config: RuntimeConfig,
    next_handle: AtomicU64,
    runners: RwLock<Vec<Arc<ActorRunner>>>,
    names: DashMap<String, ActorHandle>,
}

impl ActorRegistry {
    pub fn new(config: RuntimeConfig) -> Self {
        Self {
            config,
            next_handle: AtomicU64::new(1),
            runners: RwLock::new(Vec::new()),
            names: DashMap::new(),
        }
    }

    /// Start a batch of actors.
    ///
    /// Names are validated up front: every `params.name` must be non-empty
    /// and not already registered, or the whole batch is rejected before any
    /// handle is allocated (`RuntimeError::InvalidArgs`). Handles are then
    /// allocated densely in input order and each runner's thread is spawned,
    /// after which the caller blocks on every runner's init barrier in turn.
    /// If any barrier resolves to failure, every runner spawned by this call
    /// — including siblings that already reached `Running` — is stopped via
    /// [`ActorRegistry::stop_threads`] before the error is returned. Handles
    /// are never reclaimed, so the released runners stay visible in the
    /// `Exited`/`Error` state at their allocated handles.
    pub fn start(self: &Arc<Self>, mut batch: Vec<ActorParams>) -> Result<Vec<ActorHandle>, RuntimeError> {
        for params in &batch {
            if params.name.is_empty() {
                return Err(RuntimeError::InvalidArgs("actor name must not be empty".to_string()));
            }
            if self.names.contains_key(&params.name) {
                return Err(RuntimeError::InvalidArgs(format!(
                    "actor name '{}' already registered",
                    params.name
                )));
            }
        }
        {
            let mut seen = std::collections::HashSet::new();
            for params in &batch {
                if !seen.insert(params.name.clone()) {
                    return Err(RuntimeError::InvalidArgs(format!(
                        "duplicate actor name '{}' within batch",
                        params.name
                    )));
                }
            }
        }

        let mut started = Vec::with_capacity(batch.len());
        for params in batch.drain(..) {
            let handle = ActorHandle::new(self.next_handle.fetch_add(1, Ordering::SeqCst));
            let capacity = clamp_mailbox_capacity(if params.mailbox_capacity == 0 {
                self.config.default_mailbox_capacity
            } else {
                params.mailbox_capacity
            });
            let name: Arc<str> = Arc::from(params.name.as_str());
            let runner = ActorRunner::new(handle, Arc::clone(&name), capacity);

            {
                let mut runners = self.runners.write();
                runners.push(Arc::clone(&runner));
            }
            self.names.insert(params.name.clone(), handle);

            let ctx = ActorContext::new(handle, name, params.device_id, Arc::clone(self));
            runner.start_thread(params.actor, ctx, &self.config.thread_name_prefix);
            started.push((handle, runner));
        }

        for (_, runner) in &started {
            if let Err(err) = runner.wait_for_init() {
                let handles: Vec<ActorHandle> = started.iter().map(|(handle, _)| *handle).collect();
                self.stop_threads(&handles);
                return Err(err);
            }
        }

        Ok(started.into_iter().map(|(handle, _)| handle).collect())
    }

    /// Resolve a registered actor's handle by name.
    pub fn lookup(&self, name: &str) -> Option<ActorHandle> {
        self.names.get(name).map(|entry| *entry)
    }

    /// Push a message into `destination`'s mailbox.
    ///
    /// Returns [`RuntimeError::ErrorDestInvalid`] if `destination` is `MAIN`
    /// or unknown to this registry, and whatever [`ActorRunner::enqueue`]
    /// reports (`ThreadAbnormal` / `EnqueueFailed`) otherwise.
    pub fn enqueue(&self, destination: ActorHandle, kind: i32, payload: Option<Payload>) -> Result<(), RuntimeError> {
        let runner = self
            .runner_for(destination)
            .ok_or(RuntimeError::ErrorDestInvalid(destination.as_u64() as i64))?;
        runner.enqueue(Envelope::message(destination, kind, payload))
    }

    /// Stop a batch of actors: first request-stop (poison-pill) every
    /// `Running` runner in `handles`, then join every thread. Splitting the
    /// two phases means no runner's thread can stall waiting on another's
    /// mailbox during shutdown.
    pub fn stop_threads(&self, handles: &[ActorHandle]) {
        let runners: Vec<_> = handles.iter().filter_map(|h| self.runner_for(*h)).collect();
        for runner in &runners {
            runner.request_stop();
        }
        for runner in &runners {
            runner.join_thread();
        }
    }

    /// Stop every actor currently registered.
    pub fn shutdown(&self) {
        let handles: Vec<_> = self.runners.read().iter().map(|r| r.handle()).collect();
        self.stop_threads(&handles);
    }

    /// Current lifecycle status of `handle`, or `None` if unknown.
    pub fn status_of(&self, handle: ActorHandle) -> Option<ActorStatus> {
        self.runner_for(handle).map(|r| r.status())
    }

    /// Current mailbox depth of `handle`, or `None` if unknown.
    pub fn queue_len(&self, handle: ActorHandle) -> Option<usize> {
        self.runner_for(handle).map(|r| r.queue_len())
    }

    /// Total number of actors ever registered (including exited ones, since
    /// handles are never reclaimed).
    pub fn actor_count(&self) -> usize {
        self.runners.read().len()
    }

    /// Names of every registered actor, in registration order.
    pub fn list_names(&self) -> Vec<String> {
        self.runners.read().iter().map(|r| r.name().to_string()).collect()
    }

    /// The registered name of `handle`, or `None` if unknown.
    pub fn name_of(&self, handle: ActorHandle) -> Option<String> {
        self.runner_for(handle).map(|r| r.name().to_string())
    }

    fn runner_for(&self, handle: ActorHandle) -> Option<Arc<ActorRunner>> {
        if !handle.is_valid_destination() {
            return None;
        }
        self.runners
            .read()
            .iter()
            .find(|r| r.handle() == handle)
            .cloned()
    }
}

impl Drop for ActorRegistry {
    /// Join every still-running actor thread rather than leaving it parked
    /// in `blocking_pop` forever once the registry itself goes away.
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::error::ActorFailure;
    use crate::actor::Actor;

    struct NoopActor;
    impl Actor for NoopActor {
        fn initialize(&mut self, _ctx: &ActorContext) -> Result<(), ActorFailure> {
            Ok(())
        }
        fn process(&mut self, _kind: i32, _payload: Option<Payload>, _ctx: &ActorContext) -> Result<(), ActorFailure> {
            Ok(())
        }
    }

    struct FailInitActor;
    impl Actor for FailInitActor {
        fn initialize(&mut self, _ctx: &ActorContext) -> Result<(), ActorFailure> {
            Err("nope".into())
        }
        fn process(&mut self, _kind: i32, _payload: Option<Payload>, _ctx: &ActorContext) -> Result<(), ActorFailure> {
            Ok(())
        }
    }

    #[test]
    fn start_assigns_dense_nonzero_handles() {
        let registry = Arc::new(ActorRegistry::new(RuntimeConfig::default()));
        let handles = registry
            .start(vec![ActorParams::new(NoopActor, "a"), ActorParams::new(NoopActor, "b")])
            .unwrap();
        assert_eq!(handles[0].as_u64(), 1);
        assert_eq!(handles[1].as_u64(), 2);
        registry.shutdown();
    }

    #[test]
    fn start_rejects_duplicate_names() {
        let registry = Arc::new(ActorRegistry::new(RuntimeConfig::default()));
        let result = registry.start(vec![ActorParams::new(NoopActor, "a"), ActorParams::new(NoopActor, "a")]);
        assert!(result.is_err());
        assert_eq!(registry.actor_count(), 0);
    }

    #[test]
    fn start_rejects_name_collision_with_existing() {
        let registry = Arc::new(ActorRegistry::new(RuntimeConfig::default()));
        registry.start(vec![ActorParams::new(NoopActor, "a")]).unwrap();
        let result = registry.start(vec![ActorParams::new(NoopActor, "a")]);
        assert!(result.is_err());
        registry.shutdown();
    }

    #[test]
    fn lookup_resolves_registered_name() {
        let registry = Arc::new(ActorRegistry::new(RuntimeConfig::default()));
        let handles = registry.start(vec![ActorParams::new(NoopActor, "a")]).unwrap();
        assert_eq!(registry.lookup("a"), Some(handles[0]));
        assert_eq!(registry.lookup("missing"), None);
        registry.shutdown();
    }

    #[test]
    fn enqueue_to_unknown_handle_is_dest_invalid() {
        let registry = Arc::new(ActorRegistry::new(RuntimeConfig::default()));
        let result = registry.enqueue(ActorHandle::new(999), 1, None);
        assert!(matches!(result, Err(RuntimeError::ErrorDestInvalid(_))));
    }

    #[test]
    fn enqueue_to_main_is_dest_invalid() {
        let registry = Arc::new(ActorRegistry::new(RuntimeConfig::default()));
        let result = registry.enqueue(ActorHandle::MAIN, 1, None);
        assert!(matches!(result, Err(RuntimeError::ErrorDestInvalid(_))));
    }

    #[test]
    fn failed_init_keeps_handle_allocated_in_error_state() {
        let registry = Arc::new(ActorRegistry::new(RuntimeConfig::default()));
        let result = registry.start(vec![ActorParams::new(FailInitActor, "broken")]);
        assert!(result.is_err());
        assert_eq!(registry.actor_count(), 1);
        assert_eq!(registry.lookup("broken").and_then(|h| registry.status_of(h)), Some(ActorStatus::Error));
    }

    #[test]
    fn failed_init_releases_siblings_that_already_started() {
        let registry = Arc::new(ActorRegistry::new(RuntimeConfig::default()));
        let result = registry.start(vec![
            ActorParams::new(NoopActor, "sibling"),
            ActorParams::new(FailInitActor, "broken"),
        ]);
        assert!(result.is_err());
        assert_eq!(registry.actor_count(), 2);

        let sibling = registry.lookup("sibling").unwrap();
        assert_eq!(registry.status_of(sibling), Some(ActorStatus::Exited));

        let broken = registry.lookup("broken").unwrap();
        assert_eq!(registry.status_of(broken), Some(ActorStatus::Error));
    }

    #[test]
    fn shutdown_stops_every_registered_actor() {
        let registry = Arc::new(ActorRegistry::new(RuntimeConfig::default()));
        let handles = registry
            .start(vec![ActorParams::new(NoopActor, "a"), ActorParams::new(NoopActor, "b")])
            .unwrap();
        registry.shutdown();
        for handle in handles {
            assert_eq!(registry.status_of(handle), Some(ActorStatus::Exited));
        }
    }

    #[test]
    fn list_names_reflects_registration_order() {
        let registry = Arc::new(ActorRegistry::new(RuntimeConfig::default()));
        registry.start(vec![ActorParams::new(NoopActor, "a"), ActorParams::new(NoopActor, "b")]).unwrap();
        assert_eq!(registry.list_names(), vec!["a".to_string(), "b".to_string()]);
        registry.shutdown();
    }
}
