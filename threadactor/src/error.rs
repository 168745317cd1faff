//! Crate-wide error taxonomy.
//!
//! A single [`RuntimeError`] enum covers every failure surface in the core:
//! mailbox back-pressure, runner lifecycle, registry routing, and task
//! bookkeeping. `Ok` is not a variant here — success is plain `Result::Ok(())`
//! (or the value in question); this enum only names the seven failure kinds.

// Layer 1: Standard library imports
use std::fmt;

// Layer 2: Third-party crate imports
use thiserror::Error;

// Layer 3: Internal module imports
use crate::util::ActorHandle;

/// Errors returned by mailbox, runner, registry, and task-manager operations.
///
/// # Examples
///
/// ```
/// use threadactor::RuntimeError;
///
/// let err = RuntimeError::ErrorDestInvalid(0);
/// assert!(err.to_string().contains("destination"));
/// assert!(err.is_dest_invalid());
/// ```
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Generic failure with no more specific kind (fall-through).
    #[error("operation failed")]
    Error,

    /// A precondition on the inputs was violated (e.g. an empty name).
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    /// The same actor or task was configured/created more than once.
    #[error("already initialized: {0}")]
    AlreadyInited(String),

    /// Enqueue attempted on a runner that has already exited or errored.
    #[error("actor {0} is no longer running")]
    ThreadAbnormal(ActorHandle),

    /// `try_push` found the mailbox full at the time of the call.
    #[error("mailbox for actor {0} is full")]
    EnqueueFailed(ActorHandle),

    /// `initialize()` returned an error, or the init barrier resolved to failure.
    #[error("actor failed to start: {0}")]
    StartThreadFailed(String),

    /// The destination handle was zero, negative, or beyond the registry.
    #[error("invalid destination handle: {0}")]
    ErrorDestInvalid(i64),
}

impl RuntimeError {
    /// True for errors a caller can reasonably retry (mailbox momentarily full).
    pub fn is_transient(&self) -> bool {
        matches!(self, RuntimeError::EnqueueFailed(_))
    }

    /// True when the destination handle itself was the problem.
    pub fn is_dest_invalid(&self) -> bool {
        matches!(self, RuntimeError::ErrorDestInvalid(_))
    }

    /// True when the failure originated in actor start-up.
    pub fn is_start_failure(&self) -> bool {
        matches!(self, RuntimeError::StartThreadFailed(_))
    }
}

/// Error returned by a user actor's `initialize`/`process` implementation.
///
/// Kept as a boxed `std::error::Error` (rather than an associated type) so
/// that [`crate::actor::Actor`] stays object-safe: the registry stores
/// actors of many concrete types behind one `Box<dyn Actor>`.
pub type ActorFailure = Box<dyn std::error::Error + Send + Sync>;

/// Construct an [`ActorFailure`] from a displayable message, for actor
/// implementations that do not want to define their own error type.
pub fn actor_failure(message: impl fmt::Display) -> ActorFailure {
    message.to_string().into()
}
