//! The actor capability: the trait user code implements, the read-only
//! context handed to it, and the parameter record used to start one.

// Layer 1: Standard library imports
use std::sync::Arc;

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use crate::error::{ActorFailure, RuntimeError};
use crate::message::Payload;
use crate::registry::ActorRegistry;
use crate::util::ActorHandle;

/// Capability every user-defined worker must implement to run on the
/// runtime.
///
/// Kept as a plain `dyn`-compatible trait (no associated types) because the
/// registry stores actors of many concrete types behind one
/// `Box<dyn Actor>`; see [`crate::error::ActorFailure`] for why the error
/// type is a boxed `std::error::Error` rather than an associated type.
///
/// # Examples
///
/// ```
/// use threadactor::{Actor, ActorContext};
/// use threadactor::error::ActorFailure;
///
/// struct Counter { total: i64 }
///
/// impl Actor for Counter {
///     fn initialize(&mut self, _ctx: &ActorContext) -> Result<(), ActorFailure> {
///         self.total = 0;
///         Ok(())
///     }
///
///     fn process(
///         &mut self,
///         kind: i32,
///         payload: Option<threadactor::message::Payload>,
///         _ctx: &ActorContext,
///     ) -> Result<(), ActorFailure> {
///         if let Some(delta) = payload.as_ref().and_then(|p| p.downcast_ref::<i64>()) {
///             self.total += delta;
///         }
///         let _ = kind;
///         Ok(())
///     }
/// }
/// ```
pub trait Actor: Send {
    /// Called exactly once on the runner's thread before any message is
    /// processed. Returning an error prevents the actor from starting; the
    /// runner transitions to `Error` and the init barrier resolves to
    /// failure.
    fn initialize(&mut self, ctx: &ActorContext) -> Result<(), ActorFailure>;

    /// Called once per non-poison message, in arrival order. Returning an
    /// error terminates the actor: the runner transitions to `Error` and
    /// subsequent enqueues to it fail with [`RuntimeError::ThreadAbnormal`].
    fn process(
        &mut self,
        kind: i32,
        payload: Option<Payload>,
        ctx: &ActorContext,
    ) -> Result<(), ActorFailure>;
}

/// Read-only metadata and peer-routing access handed to an actor's
/// `initialize`/`process` calls.
///
/// Populated by the registry before `initialize` runs (satisfying I5/I6:
/// no message is delivered before the context — and thus the handle and
/// name it carries — exists). Actors resolve peers by name through
/// [`ActorContext::lookup`] and push into their mailboxes through
/// [`ActorContext::enqueue`], bypassing the task manager entirely.
pub struct ActorContext {
    handle: ActorHandle,
    name: Arc<str>,
    device_id: i64,
    registry: Arc<ActorRegistry>,
}

impl ActorContext {
    pub(crate) fn new(
        handle: ActorHandle,
        name: Arc<str>,
        device_id: i64,
        registry: Arc<ActorRegistry>,
    ) -> Self {
        Self {
            handle,
            name,
            device_id,
            registry,
        }
    }

    /// This actor's assigned handle.
    pub fn handle(&self) -> ActorHandle {
        self.handle
    }

    /// This actor's unique name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The opaque device identifier forwarded from [`ActorParams`],
    /// untouched by the runtime otherwise.
    pub fn device_id(&self) -> i64 {
        self.device_id
    }

    /// Resolve a peer's handle by name through the registry.
    pub fn lookup(&self, name: &str) -> Option<ActorHandle> {
        self.registry.lookup(name)
    }

    /// Push a message into a peer's mailbox by handle.
    pub fn enqueue(
        &self,
        destination: ActorHandle,
        kind: i32,
        payload: Option<Payload>,
    ) -> Result<(), RuntimeError> {
        self.registry.enqueue(destination, kind, payload)
    }
}

/// Parameters for starting one actor, consumed by
/// [`ActorRegistry::start`](crate::registry::ActorRegistry::start) and
/// [`crate::task_manager::TaskManager::create_task`].
///
/// `name` must be non-empty and unique within the registry. `mailbox_capacity`
/// is clamped to `[1, 10_000]` via [`crate::config::clamp_mailbox_capacity`];
/// out-of-range values (including 0) fall back to the configured default.
/// The handle assigned on a successful start is returned by `start`/
/// `create_task`, not written back onto this record.
pub struct ActorParams {
    pub actor: Box<dyn Actor>,
    pub name: String,
    pub device_id: i64,
    pub mailbox_capacity: usize,
}

impl ActorParams {
    /// Build a parameter record with an explicit mailbox capacity request
    /// (clamped by the registry, not here).
    pub fn new(actor: impl Actor + 'static, name: impl Into<String>) -> Self {
        Self {
            actor: Box::new(actor),
            name: name.into(),
            device_id: 0,
            mailbox_capacity: 0,
        }
    }

    pub fn with_device_id(mut self, device_id: i64) -> Self {
        self.device_id = device_id;
        self
    }

    pub fn with_mailbox_capacity(mut self, capacity: usize) -> Self {
        self.mailbox_capacity = capacity;
        self
    }
}
