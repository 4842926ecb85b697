// src/exec/registry.rs

//! Shared table of in-flight commands, keyed by process id.
//!
//! The registry is the only state mutated by more than one concurrently
//! running command. Writes take the exclusive lock; `lookup` and `list`
//! share it. `list` copies the entries out, so callers never hold the lock
//! while formatting or sending the result.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, error};

use crate::errors::{RelayError, Result};
use crate::exec::process::KillHandle;
use crate::types::TaskId;

/// A live command invocation.
#[derive(Debug, Clone)]
pub struct Task {
    pub id: TaskId,
    pub command: String,
    kill: KillHandle,
}

impl Task {
    pub fn new(id: TaskId, command: impl Into<String>, kill: KillHandle) -> Self {
        Self {
            id,
            command: command.into(),
            kill,
        }
    }

    /// Request termination. The owning invocation performs the reaping and
    /// deregistration.
    pub fn kill(&self) {
        self.kill.kill();
    }
}

/// Point-in-time copy of the registry, ordered by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrySnapshot {
    pub entries: Vec<(TaskId, String)>,
}

impl RegistrySnapshot {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `"<pid>, <command>"` per line, or a placeholder when nothing runs.
    pub fn render(&self) -> String {
        if self.entries.is_empty() {
            return "Task list is empty".to_string();
        }
        self.entries
            .iter()
            .map(|(id, cmd)| format!("{id}, {cmd}"))
            .collect::<Vec<_>>()
            .join("\r\n")
    }
}

#[derive(Debug, Clone, Default)]
pub struct TaskRegistry {
    tasks: Arc<RwLock<BTreeMap<TaskId, Task>>>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a task. An id that is already present is reported as an
    /// invariant violation and the existing entry is left untouched.
    pub fn register(&self, task: Task) -> Result<()> {
        let mut tasks = self.write();
        if tasks.contains_key(&task.id) {
            error!(pid = %task.id, cmd = %task.command, "duplicate task id in registry");
            return Err(RelayError::RegistryInvariantViolation(task.id.to_string()));
        }
        debug!(pid = %task.id, "task registered");
        tasks.insert(task.id, task);
        Ok(())
    }

    /// Remove a task. Returns whether an entry was present; absence is not an
    /// error.
    pub fn deregister(&self, id: TaskId) -> bool {
        let removed = self.write().remove(&id).is_some();
        if removed {
            debug!(pid = %id, "task deregistered");
        } else {
            debug!(pid = %id, "deregister for unknown task id; ignoring");
        }
        removed
    }

    pub fn lookup(&self, id: TaskId) -> Option<Task> {
        self.read().get(&id).cloned()
    }

    pub fn list(&self) -> RegistrySnapshot {
        let entries = self
            .read()
            .values()
            .map(|t| (t.id, t.command.clone()))
            .collect();
        RegistrySnapshot { entries }
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // A panicking holder cannot leave the map half-updated: every write is a
    // single insert or remove.
    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<TaskId, Task>> {
        self.tasks.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<TaskId, Task>> {
        self.tasks.write().unwrap_or_else(PoisonError::into_inner)
    }
}
