//! `TaskManager`: reference-counted sharing of actors across named tasks.

// Layer 1: Standard library imports
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

// Layer 2: Third-party crate imports
use parking_lot::Mutex;

// Layer 3: Internal module imports
use crate::actor::ActorParams;
use crate::error::RuntimeError;
use crate::registry::ActorRegistry;
use crate::util::ActorHandle;

static GLOBAL_TASK_MANAGER: OnceLock<Arc<TaskManager>> = OnceLock::new();

/// Install and return the process-wide task manager over `registry`. May be
/// called only once; a second call returns [`RuntimeError::AlreadyInited`].
pub fn init_global_task_manager(registry: Arc<ActorRegistry>) -> Result<Arc<TaskManager>, RuntimeError> {
    let manager = Arc::new(TaskManager::new(registry));
    GLOBAL_TASK_MANAGER
        .set(Arc::clone(&manager))
        .map_err(|_| RuntimeError::AlreadyInited("task manager".to_string()))?;
    Ok(manager)
}

/// Borrow the process-wide task manager installed by
/// [`init_global_task_manager`]. Returns `None` if it was never installed.
pub fn global_task_manager() -> Option<Arc<TaskManager>> {
    GLOBAL_TASK_MANAGER.get().cloned()
}

#[derive(Default)]
struct TaskState {
    tasks: HashMap<String, Vec<ActorHandle>>,
    ref_counts: HashMap<ActorHandle, usize>,
}

/// Groups actors under named tasks and lets more than one task reference the
/// same running actor: a `create_task` batch that names an actor already
/// registered under another task reuses it in place rather than rejecting
/// the call or spawning a duplicate. An actor is only ever stopped once its
/// reference count, summed across every task that still names it, drops to
/// zero.
///
/// `create_task` and `stop_task` both run under a single mutex: the state
/// transition (task bookkeeping plus the registry calls it triggers) is
/// atomic with respect to any other task operation.
pub struct TaskManager {
    registry: Arc<ActorRegistry>,
    state: Mutex<TaskState>,
}

impl Drop for TaskManager {
    /// Stop every task still registered, so no actor thread outlives the
    /// manager that owned its last reference.
    fn drop(&mut self) {
        let task_names: Vec<String> = self.state.lock().tasks.keys().cloned().collect();
        for task_name in task_names {
            let _ = self.stop_task(&task_name);
        }
    }
}

impl TaskManager {
    pub fn new(registry: Arc<ActorRegistry>) -> Self {
        Self {
            registry,
            state: Mutex::new(TaskState::default()),
        }
    }

    /// Start (or reuse) a batch of actors and register them under
    /// `task_name`.
    ///
    /// Rejects a `task_name` already in use with
    /// [`RuntimeError::AlreadyInited`] before touching the registry.
    /// Each `params[i]` is then routed by actor name: one already known
    /// to the registry is *reused* — no new actor is spawned, its
    /// reference count is simply incremented — while an unknown name is
    /// *new* and is handed to [`ActorRegistry::start`] alongside the rest
    /// of the new names in the batch, in one call. Mixing a brand-new
    /// actor with one already running under a different task in a single
    /// `create_task` call is exactly this path.
    ///
    /// Reference counts and the task's membership are only recorded after
    /// the new-actor sub-batch has fully started, so a batch that fails
    /// partway never leaves a dangling ref count or a partially-registered
    /// task; [`ActorRegistry::start`] itself releases any new runners it
    /// spawned before reporting the failure.
    pub fn create_task(
        &self,
        task_name: impl Into<String>,
        batch: Vec<ActorParams>,
    ) -> Result<Vec<ActorHandle>, RuntimeError> {
        let task_name = task_name.into();

        let mut state = self.state.lock();
        if state.tasks.contains_key(&task_name) {
            return Err(RuntimeError::AlreadyInited(task_name));
        }

        enum Slot {
            Reused(ActorHandle),
            Fresh,
        }

        let mut slots = Vec::with_capacity(batch.len());
        let mut fresh_params = Vec::new();
        for params in batch {
            match self.registry.lookup(&params.name) {
                Some(handle) => slots.push(Slot::Reused(handle)),
                None => {
                    slots.push(Slot::Fresh);
                    fresh_params.push(params);
                }
            }
        }

        let mut fresh_handles = self.registry.start(fresh_params)?.into_iter();
        let handles: Vec<ActorHandle> = slots
            .into_iter()
            .map(|slot| match slot {
                Slot::Reused(handle) => Ok(handle),
                Slot::Fresh => fresh_handles.next().ok_or_else(|| {
                    RuntimeError::InvalidArgs("fewer handles returned than fresh actors requested".to_string())
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        for handle in &handles {
            *state.ref_counts.entry(*handle).or_insert(0) += 1;
        }
        state.tasks.insert(task_name, handles.clone());
        Ok(handles)
    }

    /// Drop `task_name`'s ownership of its actors. Each actor's reference
    /// count is decremented; an actor reaching zero references is stopped
    /// via [`ActorRegistry::stop_threads`].
    pub fn stop_task(&self, task_name: &str) -> Result<(), RuntimeError> {
        let mut state = self.state.lock();
        let handles = state
            .tasks
            .remove(task_name)
            .ok_or_else(|| RuntimeError::InvalidArgs(format!("unknown task '{task_name}'")))?;

        let mut to_stop = Vec::new();
        for handle in handles {
            if let Some(count) = state.ref_counts.get_mut(&handle) {
                *count -= 1;
                if *count == 0 {
                    state.ref_counts.remove(&handle);
                    to_stop.push(handle);
                }
            }
        }

        if !to_stop.is_empty() {
            self.registry.stop_threads(&to_stop);
        }
        Ok(())
    }

    /// Names of every currently registered task.
    pub fn list_tasks(&self) -> Vec<String> {
        self.state.lock().tasks.keys().cloned().collect()
    }

    /// Actor names owned by `task_name`, or `None` if the task is unknown.
    pub fn task_actor_names(&self, task_name: &str) -> Option<Vec<String>> {
        let state = self.state.lock();
        let handles = state.tasks.get(task_name)?;
        Some(handles.iter().filter_map(|h| self.registry.name_of(*h)).collect())
    }

    /// Current reference count of `handle` across all tasks (0 if untracked).
    pub fn ref_count(&self, handle: ActorHandle) -> usize {
        self.state.lock().ref_counts.get(&handle).copied().unwrap_or(0)
    }
}
