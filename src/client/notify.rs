//! User-facing notifications.

use std::sync::{Arc, Mutex, PoisonError};
use tracing::{info, warn};

/// Sink for success and error messages shown to the user.
///
/// Implementations must not block or panic.
pub trait Notifier: Send + Sync {
    /// Reports a completed action.
    fn success(&self, message: &str);
    /// Reports a failed action.
    fn error(&self, message: &str);
}

/// Notifier that writes messages to the tracing subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        info!(target: "taskdesk::notify", "{message}");
    }

    fn error(&self, message: &str) {
        warn!(target: "taskdesk::notify", "{message}");
    }
}

/// Severity of a recorded notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    /// Produced by [`Notifier::success`].
    Success,
    /// Produced by [`Notifier::error`].
    Error,
}

/// A notification captured by [`RecordingNotifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Severity.
    pub level: NotificationLevel,
    /// Message text.
    pub message: String,
}

/// Notifier that keeps every message in memory, for headless front ends and
/// tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    entries: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded notifications in order.
    #[must_use]
    pub fn entries(&self) -> Vec<Notification> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn push(&self, level: NotificationLevel, message: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Notification {
                level,
                message: message.to_owned(),
            });
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.push(NotificationLevel::Success, message);
    }

    fn error(&self, message: &str) {
        self.push(NotificationLevel::Error, message);
    }
}
