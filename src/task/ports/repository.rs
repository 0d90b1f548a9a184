//! Repository port for task persistence, lookup, and guarded mutation.

use crate::task::domain::{NewTask, Task, TaskDomainError, TaskId, TaskMutation};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
///
/// Soft-deleted tasks are invisible to every read and write of this port.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task and returns it with its storage-assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] when the write fails.
    async fn insert(
        &self,
        task: &NewTask,
        created_at: DateTime<Utc>,
    ) -> TaskRepositoryResult<Task>;

    /// Finds an active task by identifier.
    ///
    /// Returns `None` when the task does not exist or has been soft-deleted.
    async fn find_active(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Returns all active tasks ordered by identifier.
    async fn list_active(&self) -> TaskRepositoryResult<Vec<Task>>;

    /// Looks up an active task, checks it may be mutated, and applies the
    /// mutation as one atomic step.
    ///
    /// No write happens when the lookup or the check fails.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when no active task has the
    /// identifier, or [`TaskRepositoryError::Rejected`] when the task refuses
    /// the mutation.
    async fn modify_active(
        &self,
        id: TaskId,
        mutation: &TaskMutation,
    ) -> TaskRepositoryResult<Task>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// No active task has the identifier.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The stored task rejected the mutation.
    #[error(transparent)]
    Rejected(#[from] TaskDomainError),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
