//! Task handles for asynchronous method results
//!
//! A [`TaskHandle`] is the opaque token an asynchronous method returns: it
//! starts pending and makes a single transition to completed-with-value,
//! completed-void, or failed. Consumers block on [`TaskHandle::wait`] until
//! that transition happens; there is no timeout and no cancellation.
//!
//! The handle is itself a described type with one read-only `"result"`
//! property, so the produced value is read through the same property path as
//! any other member.

use std::fmt;
use std::sync::Arc;
use std::thread;

use parking_lot::{Condvar, Mutex};

use crate::descriptor::{Described, TypeDescriptor};
use crate::error::{ReflectError, ReflectResult};
use crate::value::{Value, ValueKind};

/// Name of the produced-value property on a [`TaskHandle`]
pub const RESULT_PROPERTY: &str = "result";

/// Lifecycle state of a [`TaskHandle`]
#[derive(Debug, Clone, PartialEq)]
pub enum TaskState {
    /// The computation has not reached a terminal state yet
    Pending,
    /// The computation finished; `None` means it produced no value
    Completed(Option<Value>),
    /// The computation faulted
    Failed(ReflectError),
}

impl TaskState {
    /// Whether the state is terminal
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TaskState::Pending)
    }
}

/// Handle to an in-flight or finished asynchronous computation
pub struct TaskHandle {
    state: Mutex<TaskState>,
    done: Condvar,
}

impl TaskHandle {
    /// Create a pending handle
    pub fn new() -> Self {
        Self {
            state: Mutex::new(TaskState::Pending),
            done: Condvar::new(),
        }
    }

    /// Create a handle already completed with a value
    pub fn completed(value: Value) -> Arc<Self> {
        let handle = Arc::new(Self::new());
        handle.complete(value);
        handle
    }

    /// Create a handle already completed without a value
    pub fn void() -> Arc<Self> {
        let handle = Arc::new(Self::new());
        handle.complete_void();
        handle
    }

    /// Create a handle already failed
    pub fn failed(error: ReflectError) -> Arc<Self> {
        let handle = Arc::new(Self::new());
        handle.fail(error);
        handle
    }

    /// Run `f` on a new thread, completing or failing a fresh handle with
    /// its outcome. `Ok(None)` completes the handle void.
    pub fn spawn<F>(f: F) -> Arc<Self>
    where
        F: FnOnce() -> ReflectResult<Option<Value>> + Send + 'static,
    {
        let handle = Arc::new(Self::new());
        let producer = Arc::clone(&handle);
        thread::spawn(move || match f() {
            Ok(Some(value)) => producer.complete(value),
            Ok(None) => producer.complete_void(),
            Err(error) => producer.fail(error),
        });
        handle
    }

    /// Snapshot of the current state
    pub fn state(&self) -> TaskState {
        self.state.lock().clone()
    }

    /// Whether the handle has reached a terminal state
    pub fn is_terminal(&self) -> bool {
        self.state.lock().is_terminal()
    }

    /// Transition to completed with a produced value.
    ///
    /// The first terminal transition wins; later calls are ignored.
    pub fn complete(&self, value: Value) {
        self.finish(TaskState::Completed(Some(value)));
    }

    /// Transition to completed without a produced value
    pub fn complete_void(&self) {
        self.finish(TaskState::Completed(None));
    }

    /// Transition to failed
    pub fn fail(&self, error: ReflectError) {
        self.finish(TaskState::Failed(error));
    }

    fn finish(&self, terminal: TaskState) {
        let mut state = self.state.lock();
        if !state.is_terminal() {
            *state = terminal;
            self.done.notify_all();
        }
    }

    /// Block the calling thread until the handle reaches a terminal state.
    ///
    /// Returns `Ok(())` for either completed state and the stored fault for
    /// a failed one. Waits indefinitely; the caller inherits whatever
    /// completion guarantees the producer gives.
    pub fn wait(&self) -> ReflectResult<()> {
        let mut state = self.state.lock();
        while !state.is_terminal() {
            self.done.wait(&mut state);
        }
        match &*state {
            TaskState::Failed(error) => Err(error.clone()),
            _ => Ok(()),
        }
    }

    /// Current contents of the produced-value slot.
    ///
    /// A void handle has no such slot and reports `NotFound`, a failed
    /// handle reports its stored fault, and a pending handle reports an
    /// invocation error. [`crate::awaiting`] always waits before reading.
    fn result_slot(&self) -> ReflectResult<Value> {
        match &*self.state.lock() {
            TaskState::Completed(Some(value)) => Ok(value.clone()),
            TaskState::Completed(None) => {
                Err(ReflectError::not_found(RESULT_PROPERTY, Self::TYPE_NAME))
            }
            TaskState::Failed(error) => Err(error.clone()),
            TaskState::Pending => Err(ReflectError::Invocation(
                "task has not reached a terminal state".to_string(),
            )),
        }
    }
}

impl Default for TaskHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskHandle")
            .field("state", &*self.state.lock())
            .finish()
    }
}

impl Described for TaskHandle {
    const TYPE_NAME: &'static str = "TaskHandle";

    fn build_descriptor() -> TypeDescriptor {
        TypeDescriptor::builder::<Self>()
            // Read-only slot; the declared kind never participates in
            // kind-matched bulk writes
            .property_try(RESULT_PROPERTY, ValueKind::Null, TaskHandle::result_slot)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_first_terminal_transition_wins() {
        let handle = TaskHandle::new();
        handle.complete(Value::I32(1));
        handle.fail(ReflectError::Invocation("late".to_string()));
        assert_eq!(handle.state(), TaskState::Completed(Some(Value::I32(1))));
        assert!(handle.wait().is_ok());
    }

    #[test]
    fn test_wait_on_already_terminal_handle() {
        let handle = TaskHandle::void();
        assert!(handle.wait().is_ok());

        let failed = TaskHandle::failed(ReflectError::Invocation("boom".to_string()));
        assert_eq!(
            failed.wait(),
            Err(ReflectError::Invocation("boom".to_string()))
        );
    }

    #[test]
    fn test_wait_blocks_until_completion() {
        let handle = Arc::new(TaskHandle::new());
        let producer = Arc::clone(&handle);
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            producer.complete(Value::from("done"));
        });
        assert!(!handle.is_terminal());
        handle.wait().unwrap();
        assert_eq!(handle.state(), TaskState::Completed(Some(Value::from("done"))));
    }

    #[test]
    fn test_spawn_outcomes() {
        let value = TaskHandle::spawn(|| Ok(Some(Value::I32(5))));
        value.wait().unwrap();
        assert_eq!(value.state(), TaskState::Completed(Some(Value::I32(5))));

        let void = TaskHandle::spawn(|| Ok(None));
        void.wait().unwrap();
        assert_eq!(void.state(), TaskState::Completed(None));

        let failed = TaskHandle::spawn(|| Err(ReflectError::Invocation("nope".to_string())));
        assert_eq!(
            failed.wait(),
            Err(ReflectError::Invocation("nope".to_string()))
        );
    }
}
