//! Diesel row models for task persistence.

use super::schema::tasks;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: i64,
    /// Title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Status string.
    pub status: String,
    /// Priority string.
    pub priority: String,
    /// Due date.
    pub due_date: DateTime<Utc>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Soft-delete timestamp.
    pub deleted_at: Option<DateTime<Utc>>,
    /// Read-only flag.
    pub read_only: bool,
}

/// Insert model for task records. The identifier comes from the sequence.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Status string.
    pub status: String,
    /// Priority string.
    pub priority: String,
    /// Due date.
    pub due_date: DateTime<Utc>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Read-only flag.
    pub read_only: bool,
}

/// Partial update for task records. `None` fields are not written.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = tasks)]
pub struct TaskChangeset {
    /// New title.
    pub title: Option<String>,
    /// New description; `Some(None)` writes `NULL`.
    pub description: Option<Option<String>>,
    /// New status string.
    pub status: Option<String>,
    /// New priority string.
    pub priority: Option<String>,
    /// New due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Soft-delete timestamp.
    pub deleted_at: Option<DateTime<Utc>>,
    /// New read-only flag.
    pub read_only: Option<bool>,
}

impl TaskChangeset {
    /// Returns whether the changeset would write nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
            && self.deleted_at.is_none()
            && self.read_only.is_none()
    }
}
