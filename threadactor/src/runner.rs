//! `ActorRunner`: one actor, one mailbox, one OS thread, one lifecycle.

// Layer 1: Standard library imports
use std::sync::Arc;
use std::thread::JoinHandle;

// Layer 2: Third-party crate imports
use parking_lot::{Condvar, Mutex};

// Layer 3: Internal module imports
use crate::actor::{Actor, ActorContext};
use crate::error::RuntimeError;
use crate::mailbox::Mailbox;
use crate::message::Envelope;
use crate::util::{ActorHandle, ActorStatus, AtomicActorStatus};

/// Single-shot, single-resolution barrier: the runner's thread resolves it
/// exactly once (to success or failure) right after `initialize()` returns;
/// [`ActorRunner::wait_for_init`] blocks until that happens.
struct InitBarrier {
    state: Mutex<BarrierState>,
    resolved: Condvar,
}

enum BarrierState {
    Pending,
    Ready,
    Failed(String),
}

impl InitBarrier {
    fn new() -> Self {
        Self {
            state: Mutex::new(BarrierState::Pending),
            resolved: Condvar::new(),
        }
    }

    fn resolve_ok(&self) {
        let mut state = self.state.lock();
        *state = BarrierState::Ready;
        self.resolved.notify_all();
    }

    fn resolve_err(&self, reason: String) {
        let mut state = self.state.lock();
        *state = BarrierState::Failed(reason);
        self.resolved.notify_all();
    }

    fn wait(&self) -> Result<(), RuntimeError> {
        let mut state = self.state.lock();
        loop {
            match &*state {
                BarrierState::Pending => self.resolved.wait(&mut state),
                BarrierState::Ready => return Ok(()),
                BarrierState::Failed(reason) => {
                    return Err(RuntimeError::StartThreadFailed(reason.clone()))
                }
            }
        }
    }
}

/// Owns one actor, one mailbox, one OS thread, and the actor's lifecycle
/// status. Constructed by [`crate::registry::ActorRegistry::start`]; never
/// constructed directly by user code.
pub struct ActorRunner {
    handle: ActorHandle,
    name: Arc<str>,
    mailbox: Arc<Mailbox<Envelope>>,
    status: AtomicActorStatus,
    barrier: InitBarrier,
    thread: Mutex<Option<JoinHandle<()>>>,
}

impl ActorRunner {
    /// Construct a runner in the `Ready` state. The OS thread is not
    /// spawned until [`ActorRunner::start_thread`] is called.
    pub(crate) fn new(handle: ActorHandle, name: Arc<str>, mailbox_capacity: usize) -> Arc<Self> {
        Arc::new(Self {
            handle,
            name,
            mailbox: Arc::new(Mailbox::new(mailbox_capacity)),
            status: AtomicActorStatus::new(ActorStatus::Ready),
            barrier: InitBarrier::new(),
            thread: Mutex::new(None),
        })
    }

    pub fn handle(&self) -> ActorHandle {
        self.handle
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> ActorStatus {
        self.status.load()
    }

    pub fn queue_len(&self) -> usize {
        self.mailbox.len()
    }

    /// Spawn the runner's OS thread. Returns immediately; the thread body
    /// implements §4.2.1 of the design: `initialize()` once, then a loop of
    /// `blocking_pop` + `process()` until a poison pill or an error.
    pub(crate) fn start_thread(
        self: &Arc<Self>,
        mut actor: Box<dyn Actor>,
        ctx: ActorContext,
        thread_name_prefix: &str,
    ) {
        let runner = Arc::clone(self);
        let thread_name = format!("{thread_name_prefix}-{}", runner.name);

        let spawned = std::thread::Builder::new()
            .name(thread_name)
            .spawn(move || {
                tracing::debug!(actor = %runner.name, handle = %runner.handle, "actor thread started");

                if let Err(err) = actor.initialize(&ctx) {
                    tracing::warn!(actor = %runner.name, handle = %runner.handle, error = %err, "actor initialize failed");
                    runner.status.store(ActorStatus::Error);
                    runner.barrier.resolve_err(err.to_string());
                    return;
                }

                runner.status.store(ActorStatus::Running);
                runner.barrier.resolve_ok();
                tracing::debug!(actor = %runner.name, handle = %runner.handle, "actor running");

                loop {
                    match runner.mailbox.blocking_pop() {
                        Envelope::Poison { .. } => {
                            runner.status.store(ActorStatus::Exited);
                            tracing::debug!(actor = %runner.name, handle = %runner.handle, "actor exited");
                            return;
                        }
                        Envelope::Message { kind, payload, .. } => {
                            if let Err(err) = actor.process(kind, payload, &ctx) {
                                tracing::warn!(actor = %runner.name, handle = %runner.handle, error = %err, "actor process failed");
                                runner.status.store(ActorStatus::Error);
                                return;
                            }
                        }
                    }
                }
            });

        match spawned {
            Ok(join_handle) => {
                *self.thread.lock() = Some(join_handle);
            }
            Err(err) => {
                // `actor` and `ctx` were moved into the closure above and are
                // dropped along with it; only the failure needs recording here.
                self.status.store(ActorStatus::Error);
                self.barrier.resolve_err(err.to_string());
            }
        }
    }

    /// Block until the init barrier resolves. Single-shot: by contract only
    /// the registry calls this, once, on behalf of task creation.
    pub(crate) fn wait_for_init(&self) -> Result<(), RuntimeError> {
        self.barrier.wait()
    }

    /// Idempotent: blocks until the thread has terminated, or returns
    /// immediately if it already has (or never started).
    pub(crate) fn join_thread(&self) {
        if let Some(join_handle) = self.thread.lock().take() {
            let _ = join_handle.join();
        }
    }

    /// §4.2.3: reject a non-poison envelope on a terminated runner, else
    /// attempt a non-blocking push. Poison pills always succeed.
    pub(crate) fn enqueue(&self, envelope: Envelope) -> Result<(), RuntimeError> {
        if !envelope.is_poison() && self.status.load().is_terminal() {
            return Err(RuntimeError::ThreadAbnormal(self.handle));
        }

        if envelope.is_poison() {
            self.mailbox.force_push(envelope);
            return Ok(());
        }

        if self.mailbox.try_push(envelope) {
            Ok(())
        } else {
            Err(RuntimeError::EnqueueFailed(self.handle))
        }
    }

    /// Phase (a) of `stop_threads`: mark `Exiting` and deliver the poison
    /// pill, bypassing mailbox capacity so a full mailbox can never stall
    /// shutdown. No-op if the runner is not currently `Running`.
    pub(crate) fn request_stop(&self) -> bool {
        if self.status.load() != ActorStatus::Running {
            return false;
        }
        self.status.store(ActorStatus::Exiting);
        self.mailbox.force_push(Envelope::poison(self.handle));
        true
    }
}
