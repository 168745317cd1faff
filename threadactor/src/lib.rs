//! # threadactor
//!
//! A thread-per-actor runtime: every actor owns exactly one bounded mailbox
//! and one OS thread, started and stopped in batches through a process-wide
//! registry, with actors optionally shared across named tasks by reference
//! count.
//!
//! # Quick Start
//!
//! ```
//! use threadactor::{Actor, ActorContext, ActorParams, ActorRegistry, RuntimeConfig};
//! use threadactor::error::ActorFailure;
//! use threadactor::message::Payload;
//! use std::sync::Arc;
//!
//! struct Echo;
//!
//! impl Actor for Echo {
//!     fn initialize(&mut self, _ctx: &ActorContext) -> Result<(), ActorFailure> {
//!         Ok(())
//!     }
//!
//!     fn process(&mut self, _kind: i32, _payload: Option<Payload>, _ctx: &ActorContext) -> Result<(), ActorFailure> {
//!         Ok(())
//!     }
//! }
//!
//! let registry = Arc::new(ActorRegistry::new(RuntimeConfig::default()));
//! let handles = registry.start(vec![ActorParams::new(Echo, "echo")]).unwrap();
//! registry.enqueue(handles[0], 1, None).unwrap();
//! registry.shutdown();
//! ```
//!
//! # Module Organization
//!
//! - [`actor`] - the `Actor` trait, `ActorContext`, and `ActorParams`
//! - [`mailbox`] - the bounded FIFO mailbox (blocking pop, non-blocking push)
//! - [`message`] - message envelopes and the opaque shared payload type
//! - [`runner`] - `ActorRunner`: one actor, one thread, one lifecycle
//! - [`registry`] - `ActorRegistry`: process-wide directory and routing
//! - [`task_manager`] - `TaskManager`: reference-counted actor sharing across tasks
//! - [`config`] - `RuntimeConfig` and mailbox-capacity validation
//! - [`error`] - the `RuntimeError` taxonomy and `ActorFailure` alias
//! - [`util`] - `ActorHandle` and `ActorStatus`
//!
//! # Architecture Principles
//!
//! - **One thread per actor.** No async runtime; `ActorRunner` blocks on its
//!   mailbox between messages.
//! - **Dense, non-reused handles.** The registry never reclaims a handle, so
//!   a stale reference can never silently resolve to a different actor.
//! - **Poison pill over shared state.** Shutdown is a message, not a flag
//!   checked between reads; it bypasses mailbox capacity so it can never be
//!   blocked by back-pressure.
//! - **Object-safe `Actor`.** The registry stores many concrete actor types
//!   behind one `Box<dyn Actor>`; see [`error::ActorFailure`] for why errors
//!   are boxed rather than an associated type.

pub mod actor;
pub mod config;
pub mod error;
pub mod mailbox;
pub mod message;
pub mod registry;
pub mod runner;
pub mod task_manager;
pub mod util;

pub use actor::{Actor, ActorContext, ActorParams};
pub use config::RuntimeConfig;
pub use error::RuntimeError;
pub use registry::{global_registry, init_global_registry, ActorRegistry};
pub use runner::ActorRunner;
pub use task_manager::{global_task_manager, init_global_task_manager, TaskManager};
pub use util::{ActorHandle, ActorStatus};
