//! Front-end logic for taskdesk, without the presentation layer.
//!
//! - [`fetch`]: the request helper every call goes through
//! - [`auth_gate`]: session state and the liveness probe
//! - [`guard`]: server-side redirect of unauthenticated page requests
//! - [`pagination`] and [`tasks`]: task queries, mutations and forms
//! - [`notify`]: user notifications

pub mod auth_gate;
pub mod fetch;
pub mod guard;
pub mod notify;
pub mod pagination;
pub mod tasks;


pub use auth_gate::{AuthGate, AuthState, LivenessProbe, SessionApi};
pub use fetch::{ApiClient, ApiRequest, FetchError, RequestError};
pub use guard::{GuardDecision, RouteGuard};
pub use notify::{Notifier, RecordingNotifier, TracingNotifier};
pub use pagination::Paginator;
pub use tasks::{TaskDetailController, TaskForm, TaskListController, TaskMutations};

/// Where the front end should go after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Remain on the current page.
    Stay,
    /// The login page.
    Login,
    /// The task list.
    TaskList,
}

impl Navigation {
    /// Path of the target page, `None` for [`Navigation::Stay`].
    #[must_use]
    pub const fn path(self) -> Option<&'static str> {
        match self {
            Self::Stay => None,
            Self::Login => Some(guard::LOGIN_PATH),
            Self::TaskList => Some("/tasks"),
        }
    }
}
