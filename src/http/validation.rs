//! Request validation for task and login bodies.
//!
//! Each validator checks every field and reports all failures together as a
//! 422 [`ApiError::Validation`].

use crate::auth::domain::{AuthDomainError, Credentials};
use crate::task::domain::{
    NewTask, TaskChanges, TaskId, TaskPriority, TaskStatus, TaskTitle, parse_due_date,
};

use super::dto::{CreateTaskBody, LoginBody, UpdateTaskBody};
use super::error::{ApiError, FieldError};

const TITLE_REQUIRED: &str = "Title is required";
const INVALID_STATUS: &str =
    r#"Invalid status. Status can be "TO_DO", "IN_PROGRESS", "PENDING", or "COMPLETED""#;
const INVALID_PRIORITY: &str = r#"Invalid priority. Priority can be "LOW", "MEDIUM", or "HIGH""#;
const INVALID_DATE: &str = "Invalid date format";
const READ_ONLY_NOT_NULL: &str = "readOnly must be true or false";

/// Parses a path segment as a task identifier.
///
/// # Errors
///
/// Returns 422 when the segment is not an integer and 404 when it is an
/// integer that no task can carry.
pub fn parse_task_id(raw: &str) -> Result<TaskId, ApiError> {
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| ApiError::invalid_field("id", "Task ID must be an integer"))?;
    TaskId::new(value).map_err(|_| ApiError::NotFound("Task not found".into()))
}

#[derive(Default)]
struct Collector {
    errors: Vec<FieldError>,
}

impl Collector {
    fn check<T, E>(&mut self, field: &str, message: &str, result: Result<T, E>) -> Option<T> {
        result
            .map_err(|_| self.errors.push(FieldError::new(field, message)))
            .ok()
    }

    fn require<T>(&mut self, field: &str, message: &str, value: Option<T>) -> Option<T> {
        if value.is_none() {
            self.errors.push(FieldError::new(field, message));
        }
        value
    }

    /// Unwraps a field that may be absent but must not be `null`.
    fn not_null<T>(&mut self, field: &str, message: &str, value: Option<Option<T>>) -> Option<T> {
        match value {
            Some(Some(inner)) => Some(inner),
            Some(None) => {
                self.errors.push(FieldError::new(field, message));
                None
            }
            None => None,
        }
    }

    fn finish<T>(self, value: Option<T>) -> Result<T, ApiError> {
        match value {
            Some(validated) if self.errors.is_empty() => Ok(validated),
            _ => Err(ApiError::Validation(self.errors)),
        }
    }
}

fn title(collector: &mut Collector, raw: &str) -> Option<TaskTitle> {
    collector.check("title", TITLE_REQUIRED, TaskTitle::new(raw))
}

fn status(collector: &mut Collector, raw: &str) -> Option<TaskStatus> {
    collector.check("status", INVALID_STATUS, TaskStatus::try_from(raw))
}

fn priority(collector: &mut Collector, raw: &str) -> Option<TaskPriority> {
    collector.check("priority", INVALID_PRIORITY, TaskPriority::try_from(raw))
}

fn due_date(collector: &mut Collector, raw: &str) -> Option<chrono::DateTime<chrono::Utc>> {
    collector.check("dueDate", INVALID_DATE, parse_due_date(raw))
}

fn normalize_description(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

/// Validates a create body into a [`NewTask`].
///
/// Title, status, priority and due date are required. A blank description
/// is stored as absent.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] listing every invalid field.
pub fn validate_create(body: CreateTaskBody) -> Result<NewTask, ApiError> {
    let mut collector = Collector::default();

    let raw_title = body.title.unwrap_or_default();
    let task_title = title(&mut collector, &raw_title);
    let task_status = collector
        .require("status", INVALID_STATUS, body.status)
        .and_then(|raw| status(&mut collector, &raw));
    let task_priority = collector
        .require("priority", INVALID_PRIORITY, body.priority)
        .and_then(|raw| priority(&mut collector, &raw));
    let task_due_date = collector
        .require("dueDate", INVALID_DATE, body.due_date)
        .and_then(|raw| due_date(&mut collector, &raw));

    let validated = match (task_title, task_status, task_priority, task_due_date) {
        (Some(valid_title), Some(valid_status), Some(valid_priority), Some(valid_due)) => {
            let mut task = NewTask::new(valid_title, valid_status, valid_priority, valid_due)
                .with_read_only(body.read_only.unwrap_or(false));
            task.description = body.description.as_deref().and_then(normalize_description);
            Some(task)
        }
        _ => None,
    };
    collector.finish(validated)
}

/// Validates an update body into [`TaskChanges`].
///
/// Every field is optional; present fields must be valid. An explicit `null`
/// or blank description clears it, while `null` for any other field is a
/// validation failure.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] listing every invalid field.
pub fn validate_update(body: UpdateTaskBody) -> Result<TaskChanges, ApiError> {
    let mut collector = Collector::default();
    let changes = TaskChanges {
        title: collector
            .not_null("title", TITLE_REQUIRED, body.title)
            .and_then(|raw| title(&mut collector, &raw)),
        description: body
            .description
            .map(|value| value.as_deref().and_then(normalize_description)),
        status: collector
            .not_null("status", INVALID_STATUS, body.status)
            .and_then(|raw| status(&mut collector, &raw)),
        priority: collector
            .not_null("priority", INVALID_PRIORITY, body.priority)
            .and_then(|raw| priority(&mut collector, &raw)),
        due_date: collector
            .not_null("dueDate", INVALID_DATE, body.due_date)
            .and_then(|raw| due_date(&mut collector, &raw)),
        read_only: collector.not_null("readOnly", READ_ONLY_NOT_NULL, body.read_only),
    };
    collector.finish(Some(changes))
}

/// Validates a login body into [`Credentials`].
///
/// # Errors
///
/// Returns [`ApiError::BadRequest`] when either field is missing or empty
/// and [`ApiError::Validation`] when the email is malformed or the password
/// too short.
pub fn validate_login(body: LoginBody) -> Result<Credentials, ApiError> {
    let (Some(email), Some(password)) = (body.email, body.password) else {
        return Err(ApiError::BadRequest("Email and password are required".into()));
    };
    if email.trim().is_empty() || password.is_empty() {
        return Err(ApiError::BadRequest("Email and password are required".into()));
    }

    Credentials::new(email, password).map_err(|err| match err {
        AuthDomainError::MissingEmail | AuthDomainError::InvalidEmail(_) => {
            ApiError::invalid_field("email", "Invalid email format")
        }
        AuthDomainError::MissingPassword | AuthDomainError::PasswordTooShort(_) => {
            ApiError::invalid_field("password", "Password must be at least 6 characters long")
        }
        AuthDomainError::EmptySessionToken => ApiError::BadRequest(err.to_string()),
    })
}
