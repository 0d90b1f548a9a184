//! In-memory repository for task lifecycle tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{NewTask, Task, TaskId, TaskMutation},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
///
/// Identifiers are assigned from a monotonically increasing counter, so they
/// are never reused even after soft deletion.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: BTreeMap<TaskId, Task>,
    last_id: i64,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a stored task regardless of its soft-delete state.
    ///
    /// Lets tests observe that deleted rows are retained.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] when the lock is poisoned.
    pub fn find_any(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.tasks.get(&id).cloned())
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn insert(
        &self,
        task: &NewTask,
        created_at: DateTime<Utc>,
    ) -> TaskRepositoryResult<Task> {
        let mut state = self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;

        state.last_id += 1;
        let id = TaskId::from_persisted(state.last_id);
        let stored = Task::from_new(id, task.clone(), created_at);
        state.tasks.insert(id, stored.clone());
        Ok(stored)
    }

    async fn find_active(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.tasks.get(&id).filter(|task| task.is_active()).cloned())
    }

    async fn list_active(&self) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state
            .tasks
            .values()
            .filter(|task| task.is_active())
            .cloned()
            .collect())
    }

    async fn modify_active(
        &self,
        id: TaskId,
        mutation: &TaskMutation,
    ) -> TaskRepositoryResult<Task> {
        let mut state = self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;

        let stored = state
            .tasks
            .get_mut(&id)
            .filter(|task| task.is_active())
            .ok_or(TaskRepositoryError::NotFound(id))?;

        // Apply to a copy so a rejected mutation leaves the stored row intact.
        let mut updated = stored.clone();
        updated.apply(mutation)?;
        *stored = updated.clone();
        Ok(updated)
    }
}
