//! Small shared value types: the actor handle and its atomic lifecycle status.

// Layer 1: Standard library imports
use std::fmt::{self, Display};
use std::sync::atomic::{AtomicU8, Ordering};

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
// (none)

/// Stable, dense, non-zero integer identifier assigned to an actor by the
/// registry. Handle `0` is reserved for the conceptual "main" actor and is
/// never a valid message destination.
///
/// # Examples
///
/// ```
/// use threadactor::ActorHandle;
///
/// let h = ActorHandle::new(1);
/// assert!(h.is_valid_destination());
/// assert!(!ActorHandle::MAIN.is_valid_destination());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorHandle(u64);

impl ActorHandle {
    /// The reserved handle of the "main" placeholder, index 0 in the registry.
    pub const MAIN: ActorHandle = ActorHandle(0);

    /// Wrap a raw integer as a handle. Used internally by the registry when
    /// allocating the next dense handle.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw integer value, as used in wire-level destination fields.
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// `false` for [`ActorHandle::MAIN`] and for any handle that did not come
    /// from a successful registry allocation.
    pub const fn is_valid_destination(self) -> bool {
        self.0 != 0
    }
}

impl Display for ActorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle status of an [`crate::runner::ActorRunner`].
///
/// Monotonic within one actor: `Ready -> Running -> Exiting -> Exited`, with
/// `Error` reachable from `Ready` or `Running` as a terminal sink. No
/// transition ever leads out of `Exited` or `Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ActorStatus {
    /// Constructed, thread not yet spawned (or spawned but not yet initialized).
    Ready = 0,
    /// `initialize()` returned success; processing messages.
    Running = 1,
    /// A poison pill has been enqueued; draining until the thread observes it.
    Exiting = 2,
    /// Thread observed the poison pill and returned normally.
    Exited = 3,
    /// `initialize()` or `process()` returned an error; thread has returned.
    Error = 4,
}

impl ActorStatus {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Ready,
            1 => Self::Running,
            2 => Self::Exiting,
            3 => Self::Exited,
            _ => Self::Error,
        }
    }

    /// True for the two states from which no further transition occurs.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Exited | Self::Error)
    }
}

/// Sequentially-consistent atomic cell holding an [`ActorStatus`].
///
/// Reading and writing a runner's status this way, rather than guarding it
/// with the mailbox's own mutex, keeps the lifecycle state machine observable
/// without adding a second lock on the runner's hot path.
#[derive(Debug)]
pub struct AtomicActorStatus(AtomicU8);

impl AtomicActorStatus {
    pub fn new(initial: ActorStatus) -> Self {
        Self(AtomicU8::new(initial as u8))
    }

    pub fn load(&self) -> ActorStatus {
        ActorStatus::from_u8(self.0.load(Ordering::SeqCst))
    }

    pub fn store(&self, status: ActorStatus) {
        self.0.store(status as u8, Ordering::SeqCst);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn main_handle_is_invalid_destination() {
        assert!(!ActorHandle::MAIN.is_valid_destination());
    }

    #[test]
    fn allocated_handle_is_valid_destination() {
        assert!(ActorHandle::new(1).is_valid_destination());
    }

    #[test]
    fn handle_display_includes_value() {
        assert_eq!(ActorHandle::new(42).to_string(), "#42");
    }

    #[test]
    fn handle_ordering_is_dense() {
        assert!(ActorHandle::new(1) < ActorHandle::new(2));
    }

    #[test]
    fn status_terminal_classification() {
        assert!(ActorStatus::Exited.is_terminal());
        assert!(ActorStatus::Error.is_terminal());
        assert!(!ActorStatus::Running.is_terminal());
        assert!(!ActorStatus::Ready.is_terminal());
        assert!(!ActorStatus::Exiting.is_terminal());
    }

    #[test]
    fn atomic_status_round_trips() {
        let cell = AtomicActorStatus::new(ActorStatus::Ready);
        assert_eq!(cell.load(), ActorStatus::Ready);
        cell.store(ActorStatus::Running);
        assert_eq!(cell.load(), ActorStatus::Running);
        cell.store(ActorStatus::Error);
        assert_eq!(cell.load(), ActorStatus::Error);
    }
}
