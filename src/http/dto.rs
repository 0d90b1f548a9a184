//! Wire shapes for request and response bodies.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use crate::task::domain::{Task, TaskPriority, TaskStatus};

/// Externally visible task representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    /// Database identifier.
    pub id: i64,
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Canonical status.
    #[schema(value_type = String, example = "IN_PROGRESS")]
    pub status: TaskStatus,
    /// Canonical priority.
    #[schema(value_type = String, example = "HIGH")]
    pub priority: TaskPriority,
    /// Due date as RFC 3339.
    pub due_date: String,
    /// Soft-deletion timestamp as RFC 3339; always `null` for served tasks.
    pub deleted_at: Option<String>,
    /// Whether the task rejects mutation.
    pub read_only: bool,
}

fn rfc3339(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

impl From<&Task> for TaskResponse {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id().value(),
            title: task.title().as_str().to_owned(),
            description: task.description().map(str::to_owned),
            status: task.status(),
            priority: task.priority(),
            due_date: rfc3339(task.due_date()),
            deleted_at: task.deleted_at().map(rfc3339),
            read_only: task.is_read_only(),
        }
    }
}

/// Body of `POST /api/tasks`.
///
/// Enumerations and dates arrive as strings and are checked by
/// [`super::validation`] so every bad field is reported at once.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskBody {
    /// Task title.
    pub title: Option<String>,
    /// Optional description.
    pub description: Option<String>,
    /// Status in upper snake case.
    pub status: Option<String>,
    /// Priority in upper snake case.
    pub priority: Option<String>,
    /// ISO 8601 due date.
    pub due_date: Option<String>,
    /// Read-only flag, `false` when absent.
    pub read_only: Option<bool>,
}

/// Body of `PUT /api/tasks/:id`.
///
/// `None` means the field was absent and is left unchanged. `Some(None)` is
/// an explicit `null`, which clears the description and is rejected for
/// every other field.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskBody {
    /// New title.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub title: Option<Option<String>>,
    /// `Some(None)` clears the description.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    /// New status.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub status: Option<Option<String>>,
    /// New priority.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub priority: Option<Option<String>>,
    /// New due date.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub due_date: Option<Option<String>>,
    /// New read-only flag.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<bool>)]
    pub read_only: Option<Option<bool>>,
}

/// Marks a field that is present in the body, even when it is `null`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Body of `POST /api/auth/login`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct LoginBody {
    /// Account email.
    pub email: Option<String>,
    /// Account password.
    pub password: Option<String>,
}

/// Plain acknowledgement body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    /// Human-readable message.
    pub message: String,
}

impl MessageResponse {
    /// Creates a message body.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
