//! Service layer for task creation, lookup, update and soft deletion.

use crate::task::{
    domain::{NewTask, Task, TaskChanges, TaskDomainError, TaskId, TaskMutation},
    ports::{TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// No active task has the identifier.
    #[error("task not found or already deleted")]
    NotFound(TaskId),
    /// The task is read-only.
    #[error("task is read-only")]
    ReadOnly(TaskId),
    /// Domain validation failed.
    #[error(transparent)]
    Domain(TaskDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(TaskRepositoryError),
}

impl From<TaskDomainError> for TaskLifecycleError {
    fn from(err: TaskDomainError) -> Self {
        match err {
            TaskDomainError::ReadOnly(id) => Self::ReadOnly(id),
            TaskDomainError::AlreadyDeleted(id) => Self::NotFound(id),
            other => Self::Domain(other),
        }
    }
}

impl From<TaskRepositoryError> for TaskLifecycleError {
    fn from(err: TaskRepositoryError) -> Self {
        match err {
            TaskRepositoryError::NotFound(id) => Self::NotFound(id),
            TaskRepositoryError::Rejected(domain) => domain.into(),
            other @ TaskRepositoryError::Persistence(_) => Self::Repository(other),
        }
    }
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
///
/// The repository may be a trait object so HTTP state can hold either
/// adapter behind one type.
pub struct TaskLifecycleService<R, C>
where
    R: TaskRepository + ?Sized,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> Clone for TaskLifecycleService<R, C>
where
    R: TaskRepository + ?Sized,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R, C> TaskLifecycleService<R, C>
where
    R: TaskRepository + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Returns all active tasks in identifier order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the lookup fails.
    pub async fn list(&self) -> TaskLifecycleResult<Vec<Task>> {
        Ok(self.repository.list_active().await?)
    }

    /// Returns an active task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the task does not exist
    /// or was soft-deleted.
    pub async fn find_by_id(&self, id: TaskId) -> TaskLifecycleResult<Task> {
        self.repository
            .find_active(id)
            .await?
            .ok_or(TaskLifecycleError::NotFound(id))
    }

    /// Stores a new task stamped with the current clock time.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when persistence fails.
    pub async fn create(&self, task: NewTask) -> TaskLifecycleResult<Task> {
        let created = self.repository.insert(&task, self.clock.utc()).await?;
        info!(task_id = %created.id(), "task created");
        Ok(created)
    }

    /// Overwrites the provided fields of an active, editable task.
    ///
    /// An empty change set performs no write and returns the current task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] for missing or deleted tasks
    /// and [`TaskLifecycleError::ReadOnly`] for read-only tasks.
    pub async fn update(&self, id: TaskId, changes: TaskChanges) -> TaskLifecycleResult<Task> {
        if changes.is_empty() {
            debug!(task_id = %id, "empty update, returning current task");
            let current = self.find_by_id(id).await?;
            current.ensure_mutable()?;
            return Ok(current);
        }
        let updated = self
            .repository
            .modify_active(id, &TaskMutation::Update(changes))
            .await?;
        info!(task_id = %id, "task updated");
        Ok(updated)
    }

    /// Soft-deletes an active, editable task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] for missing or already
    /// deleted tasks and [`TaskLifecycleError::ReadOnly`] for read-only
    /// tasks.
    pub async fn delete(&self, id: TaskId) -> TaskLifecycleResult<()> {
        let mutation = TaskMutation::SoftDelete {
            deleted_at: self.clock.utc(),
        };
        self.repository.modify_active(id, &mutation).await?;
        info!(task_id = %id, "task soft-deleted");
        Ok(())
    }
}
