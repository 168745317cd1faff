//! Runtime configuration with validated defaults.
//!
//! There is no file or environment parsing here — that belongs to a host
//! binary built on top of this crate. [`RuntimeConfig`] is a plain value a
//! host populates however it likes and hands to [`crate::registry::ActorRegistry::new`].

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use serde::{Deserialize, Serialize};

// Layer 3: Internal module imports
use crate::error::RuntimeError;

/// Smallest mailbox capacity a caller may request.
pub const MIN_MAILBOX_CAPACITY: usize = 1;

/// Largest mailbox capacity a caller may request.
pub const MAX_MAILBOX_CAPACITY: usize = 10_000;

/// Capacity substituted when a caller requests 0 or more than
/// [`MAX_MAILBOX_CAPACITY`].
pub const DEFAULT_MAILBOX_CAPACITY: usize = 256;

/// Clamp a requested mailbox capacity to `[MIN_MAILBOX_CAPACITY,
/// MAX_MAILBOX_CAPACITY]`, falling back to [`DEFAULT_MAILBOX_CAPACITY`] for
/// out-of-range requests (including 0).
///
/// # Examples
///
/// ```
/// use threadactor::config::{clamp_mailbox_capacity, DEFAULT_MAILBOX_CAPACITY};
///
/// assert_eq!(clamp_mailbox_capacity(0), DEFAULT_MAILBOX_CAPACITY);
/// assert_eq!(clamp_mailbox_capacity(50_000), DEFAULT_MAILBOX_CAPACITY);
/// assert_eq!(clamp_mailbox_capacity(64), 64);
/// ```
pub fn clamp_mailbox_capacity(requested: usize) -> usize {
    if (MIN_MAILBOX_CAPACITY..=MAX_MAILBOX_CAPACITY).contains(&requested) {
        requested
    } else {
        DEFAULT_MAILBOX_CAPACITY
    }
}

/// Process-wide defaults for the actor registry and task manager.
///
/// # Examples
///
/// ```
/// use threadactor::RuntimeConfig;
///
/// let config = RuntimeConfig::default();
/// assert_eq!(config.default_mailbox_capacity, 256);
///
/// let config = RuntimeConfig::builder()
///     .with_mailbox_capacity(64)
///     .with_thread_name_prefix("worker")
///     .build()
///     .unwrap();
/// assert_eq!(config.default_mailbox_capacity, 64);
/// assert_eq!(config.thread_name_prefix, "worker");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Mailbox capacity used when an [`crate::actor::ActorParams`] entry
    /// does not request a specific one.
    pub default_mailbox_capacity: usize,

    /// Prefix given to spawned OS thread names, e.g. `"<prefix>-<actor name>"`.
    pub thread_name_prefix: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            default_mailbox_capacity: DEFAULT_MAILBOX_CAPACITY,
            thread_name_prefix: "actor".to_string(),
        }
    }
}

impl RuntimeConfig {
    /// Start building a configuration from the defaults.
    pub fn builder() -> RuntimeConfigBuilder {
        RuntimeConfigBuilder::default()
    }
}

/// Builder for [`RuntimeConfig`], validated on [`RuntimeConfigBuilder::build`].
#[derive(Debug, Default)]
pub struct RuntimeConfigBuilder {
    default_mailbox_capacity: Option<usize>,
    thread_name_prefix: Option<String>,
}

impl RuntimeConfigBuilder {
    pub fn with_mailbox_capacity(mut self, capacity: usize) -> Self {
        self.default_mailbox_capacity = Some(capacity);
        self
    }

    pub fn with_thread_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.thread_name_prefix = Some(prefix.into());
        self
    }

    /// Validate and produce the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::InvalidArgs`] if an explicitly requested
    /// mailbox capacity falls outside `[1, 10_000]`, or if the thread name
    /// prefix is empty.
    pub fn build(self) -> Result<RuntimeConfig, RuntimeError> {
        let default_mailbox_capacity = match self.default_mailbox_capacity {
            Some(capacity) => {
                if !(MIN_MAILBOX_CAPACITY..=MAX_MAILBOX_CAPACITY).contains(&capacity) {
                    return Err(RuntimeError::InvalidArgs(format!(
                        "mailbox capacity {capacity} out of range [{MIN_MAILBOX_CAPACITY}, {MAX_MAILBOX_CAPACITY}]"
                    )));
                }
                capacity
            }
            None => DEFAULT_MAILBOX_CAPACITY,
        };

        let thread_name_prefix = self.thread_name_prefix.unwrap_or_else(|| "actor".to_string());
        if thread_name_prefix.is_empty() {
            return Err(RuntimeError::InvalidArgs(
                "thread name prefix must not be empty".to_string(),
            ));
        }

        Ok(RuntimeConfig {
            default_mailbox_capacity,
            thread_name_prefix,
        })
    }
}
