//! Message envelopes and the opaque, shared-ownership payload they carry.

// Layer 1: Standard library imports
use std::any::Any;
use std::fmt;
use std::sync::Arc;

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use crate::util::ActorHandle;

/// Opaque, shared-ownership payload. The same envelope may fan out across a
/// routing slip (pushed to several destinations in turn), so payload
/// ownership must outlive the sender's stack frame — hence `Arc`, not `Box`.
///
/// The receiving actor downcasts based on the envelope's `kind` field; the
/// runtime never inspects the payload's concrete type.
pub type Payload = Arc<dyn Any + Send + Sync>;

/// Wrap a value as a [`Payload`].
///
/// # Examples
///
/// ```
/// use threadactor::message::{payload, downcast_payload};
///
/// let p = payload(42i32);
/// assert_eq!(downcast_payload::<i32>(&p), Some(&42));
/// ```
pub fn payload<T: Any + Send + Sync>(value: T) -> Payload {
    Arc::new(value)
}

/// Downcast a [`Payload`] to a concrete type, mirroring the envelope's `kind`
/// discriminant. Returns `None` on a type mismatch rather than panicking.
pub fn downcast_payload<T: Any>(payload: &Payload) -> Option<&T> {
    payload.downcast_ref::<T>()
}

/// The per-message tuple routed by the registry: a destination handle, an
/// integer discriminant the receiving actor switches on, and an optional
/// shared payload — or the poison-pill sentinel that ends a runner's loop.
///
/// Envelopes are value objects, cheap to clone because payload ownership is
/// shared via `Arc`.
#[derive(Clone)]
pub enum Envelope {
    /// An ordinary message bound for `destination`.
    Message {
        destination: ActorHandle,
        kind: i32,
        payload: Option<Payload>,
    },
    /// The sentinel that instructs a runner to exit its message loop. Always
    /// accepted by [`crate::mailbox::Mailbox::force_push`], even when the
    /// mailbox is at capacity (see §4.2.3 / §5 of the design: `stop_threads`
    /// must never deadlock against a full mailbox).
    Poison { destination: ActorHandle },
}

impl Envelope {
    /// Build an ordinary message envelope.
    pub fn message(destination: ActorHandle, kind: i32, payload: Option<Payload>) -> Self {
        Self::Message {
            destination,
            kind,
            payload,
        }
    }

    /// Build a poison-pill envelope for `destination`.
    pub fn poison(destination: ActorHandle) -> Self {
        Self::Poison { destination }
    }

    /// The destination handle, common to both variants.
    pub fn destination(&self) -> ActorHandle {
        match self {
            Self::Message { destination, .. } | Self::Poison { destination } => *destination,
        }
    }

    /// `true` for the poison-pill sentinel.
    pub fn is_poison(&self) -> bool {
        matches!(self, Self::Poison { .. })
    }
}

impl fmt::Debug for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Message {
                destination, kind, ..
            } => f
                .debug_struct("Envelope::Message")
                .field("destination", destination)
                .field("kind", kind)
                .finish_non_exhaustive(),
            Self::Poison { destination } => f
                .debug_struct("Envelope::Poison")
                .field("destination", destination)
                .finish(),
        }
    }
}
