//! HTTP error boundary.
//!
//! Every handler returns [`ApiError`] on failure. Internal failures are logged
//! with their detail and answered with a generic message.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::fmt;
use tracing::{error, warn};

use crate::auth::services::AuthServiceError;
use crate::task::services::TaskLifecycleError;

/// A single rejected request field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Name of the offending field as it appears on the wire.
    pub field: String,
    /// Human-readable reason.
    pub message: String,
}

impl FieldError {
    /// Creates a field error.
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Errors surfaced to HTTP clients.
#[derive(Debug)]
pub enum ApiError {
    /// Malformed request (400).
    BadRequest(String),
    /// Missing or invalid session (401).
    Unauthorized(String),
    /// Operation not allowed on the resource (403).
    Forbidden(String),
    /// Resource absent (404).
    NotFound(String),
    /// Field-level validation failure (422).
    Validation(Vec<FieldError>),
    /// Unexpected failure (500); the detail is logged, never returned.
    Internal {
        /// Client-facing message.
        message: &'static str,
        /// Logged cause.
        detail: String,
    },
}

impl ApiError {
    /// Builds a 500 error with a generic client message.
    #[must_use]
    pub fn internal(message: &'static str, detail: &impl fmt::Display) -> Self {
        Self::Internal {
            message,
            detail: detail.to_string(),
        }
    }

    /// Builds a 422 error for a single field.
    #[must_use]
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation(vec![FieldError::new(field, message)])
    }

    /// Returns the HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<&'a [FieldError]>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::BadRequest(message)
            | Self::Unauthorized(message)
            | Self::Forbidden(message)
            | Self::NotFound(message) => ErrorBody {
                message,
                errors: None,
            },
            Self::Validation(errors) => {
                warn!(count = errors.len(), "request failed validation");
                ErrorBody {
                    message: "Validation failed",
                    errors: Some(errors),
                }
            }
            Self::Internal { message, detail } => {
                error!(%detail, "{message}");
                ErrorBody {
                    message,
                    errors: None,
                }
            }
        };
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(err) => Self::invalid_field("body", err.body_text()),
            other => Self::BadRequest(other.body_text()),
        }
    }
}

impl From<AuthServiceError> for ApiError {
    fn from(err: AuthServiceError) -> Self {
        match err {
            AuthServiceError::InvalidCredentials => {
                Self::Unauthorized("Invalid credentials".into())
            }
            AuthServiceError::MissingSession => {
                Self::Unauthorized("Authentication required.".into())
            }
            AuthServiceError::InvalidSession => {
                Self::Unauthorized("Invalid or expired session.".into())
            }
            AuthServiceError::Provider(provider) => {
                Self::internal(
                    "An unexpected error occurred. Please try again later.",
                    &provider,
                )
            }
        }
    }
}

/// Maps a lifecycle failure, using `action` to word 403 and 500 messages.
pub(crate) fn lifecycle_error(err: TaskLifecycleError, action: TaskAction) -> ApiError {
    match err {
        TaskLifecycleError::NotFound(_) => match action {
            TaskAction::Read => ApiError::NotFound("Task not found".into()),
            TaskAction::Create | TaskAction::Update | TaskAction::Delete => {
                ApiError::NotFound("Task not found or already deleted".into())
            }
        },
        TaskLifecycleError::ReadOnly(_) => ApiError::Forbidden(format!(
            "Task is read-only and cannot be {}",
            action.past_participle()
        )),
        TaskLifecycleError::Domain(domain) => ApiError::invalid_field("body", domain.to_string()),
        TaskLifecycleError::Repository(repository) => {
            ApiError::internal(action.failure_message(), &repository)
        }
    }
}

/// The task operation a handler performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TaskAction {
    Read,
    Create,
    Update,
    Delete,
}

impl TaskAction {
    const fn past_participle(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Create => "created",
            Self::Update => "updated",
            Self::Delete => "deleted",
        }
    }

    const fn failure_message(self) -> &'static str {
        match self {
            Self::Read => "Failed to retrieve tasks",
            Self::Create => "Failed to create task",
            Self::Update => "Failed to update task",
            Self::Delete => "Failed to delete task",
        }
    }
}
