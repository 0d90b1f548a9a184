//! Task aggregate root and the values used to create and mutate it.

use super::{TaskDomainError, TaskId, TaskPriority, TaskStatus, TaskTitle};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: TaskTitle,
    description: Option<String>,
    status: TaskStatus,
    priority: TaskPriority,
    due_date: DateTime<Utc>,
    created_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
    read_only: bool,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: TaskTitle,
    /// Persisted description, if any.
    pub description: Option<String>,
    /// Persisted status.
    pub status: TaskStatus,
    /// Persisted priority.
    pub priority: TaskPriority,
    /// Persisted due date.
    pub due_date: DateTime<Utc>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted soft-delete timestamp.
    pub deleted_at: Option<DateTime<Utc>>,
    /// Persisted read-only flag.
    pub read_only: bool,
}

impl Task {
    /// Materializes a freshly inserted task from its creation payload.
    #[must_use]
    pub fn from_new(id: TaskId, new_task: NewTask, created_at: DateTime<Utc>) -> Self {
        let NewTask {
            title,
            description,
            status,
            priority,
            due_date,
            read_only,
        } = new_task;
        Self {
            id,
            title,
            description,
            status,
            priority,
            due_date,
            created_at,
            deleted_at: None,
            read_only,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            status: data.status,
            priority: data.priority,
            due_date: data.due_date,
            created_at: data.created_at,
            deleted_at: data.deleted_at,
            read_only: data.read_only,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// Returns the due date.
    #[must_use]
    pub const fn due_date(&self) -> DateTime<Utc> {
        self.due_date
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the soft-delete timestamp, if the task has been deleted.
    #[must_use]
    pub const fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    /// Returns whether the task rejects mutation.
    #[must_use]
    pub const fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Returns whether the task has not been soft-deleted.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }

    /// Checks that the task may be updated or deleted.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::AlreadyDeleted`] for soft-deleted tasks and
    /// [`TaskDomainError::ReadOnly`] for read-only tasks.
    pub const fn ensure_mutable(&self) -> Result<(), TaskDomainError> {
        if self.deleted_at.is_some() {
            return Err(TaskDomainError::AlreadyDeleted(self.id));
        }
        if self.read_only {
            return Err(TaskDomainError::ReadOnly(self.id));
        }
        Ok(())
    }

    /// Applies a mutation after checking the access-control rules.
    ///
    /// The task is left unchanged when the check fails.
    ///
    /// # Errors
    ///
    /// See [`Task::ensure_mutable`].
    pub fn apply(&mut self, mutation: &TaskMutation) -> Result<(), TaskDomainError> {
        self.ensure_mutable()?;
        match mutation {
            TaskMutation::Update(changes) => self.apply_changes(changes),
            TaskMutation::SoftDelete { deleted_at } => self.deleted_at = Some(*deleted_at),
        }
        Ok(())
    }

    fn apply_changes(&mut self, changes: &TaskChanges) {
        if let Some(title) = &changes.title {
            self.title = title.clone();
        }
        if let Some(description) = &changes.description {
            self.description.clone_from(description);
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
        if let Some(priority) = changes.priority {
            self.priority = priority;
        }
        if let Some(due_date) = changes.due_date {
            self.due_date = due_date;
        }
        if let Some(read_only) = changes.read_only {
            self.read_only = read_only;
        }
    }
}

/// Validated payload for a task that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    /// Title.
    pub title: TaskTitle,
    /// Optional description.
    pub description: Option<String>,
    /// Initial status.
    pub status: TaskStatus,
    /// Initial priority.
    pub priority: TaskPriority,
    /// Due date.
    pub due_date: DateTime<Utc>,
    /// Whether the task is created locked.
    pub read_only: bool,
}

impl NewTask {
    /// Creates an editable task payload without a description.
    #[must_use]
    pub const fn new(
        title: TaskTitle,
        status: TaskStatus,
        priority: TaskPriority,
        due_date: DateTime<Utc>,
    ) -> Self {
        Self {
            title,
            description: None,
            status,
            priority,
            due_date,
            read_only: false,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the read-only flag.
    #[must_use]
    pub const fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }
}

/// Partial update of an existing task. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskChanges {
    /// New title.
    pub title: Option<TaskTitle>,
    /// New description; `Some(None)` clears it.
    pub description: Option<Option<String>>,
    /// New status.
    pub status: Option<TaskStatus>,
    /// New priority.
    pub priority: Option<TaskPriority>,
    /// New due date.
    pub due_date: Option<DateTime<Utc>>,
    /// New read-only flag.
    pub read_only: Option<bool>,
}

impl TaskChanges {
    /// Returns whether no field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
            && self.read_only.is_none()
    }
}

/// A guarded write against an active task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskMutation {
    /// Overwrite the provided fields.
    Update(TaskChanges),
    /// Mark the task deleted at the given instant.
    SoftDelete {
        /// Deletion timestamp.
        deleted_at: DateTime<Utc>,
    },
}
