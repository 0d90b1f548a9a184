//! Error types for task domain validation and parsing.

use super::TaskId;
use thiserror::Error;

/// Errors returned while constructing or mutating domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("title is required")]
    EmptyTitle,

    /// The task identifier is not a positive integer.
    #[error("invalid task identifier {0}, expected a positive integer")]
    InvalidTaskId(i64),

    /// The due date is not an ISO 8601 date or timestamp.
    #[error("invalid due date: {0}")]
    InvalidDueDate(String),

    /// The task is flagged read-only and rejects mutation.
    #[error("task {0} is read-only")]
    ReadOnly(TaskId),

    /// The task has already been soft-deleted.
    #[error("task {0} not found or already deleted")]
    AlreadyDeleted(TaskId),
}

/// Error returned while parsing task statuses from input or persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing task priorities from input or persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task priority: {0}")]
pub struct ParseTaskPriorityError(pub String);
