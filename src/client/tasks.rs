//! Task queries, mutations and form validation for the front end.

use std::sync::{
    Arc, Mutex, PoisonError,
    atomic::{AtomicBool, Ordering},
};

use reqwest::Method;
use tokio::sync::watch;
use tracing::error;

use crate::http::{
    FieldError,
    dto::{CreateTaskBody, TaskResponse, UpdateTaskBody},
    error::ApiError,
    validation::validate_create,
};
use crate::task::domain::{TaskPriority, TaskStatus};

use super::{
    Navigation,
    auth_gate::AuthState,
    fetch::{ApiClient, ApiRequest, FetchError},
    notify::Notifier,
    pagination::Paginator,
};

#[derive(Debug)]
struct TaskListState {
    paginator: Paginator<TaskResponse>,
    loading: bool,
}

/// Point-in-time view of a [`TaskListController`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListView {
    /// Tasks on the current page.
    pub displayed: Vec<TaskResponse>,
    /// Current page, starting at 1.
    pub page: usize,
    /// Number of pages.
    pub total_pages: usize,
    /// Whether a fetch is in flight.
    pub loading: bool,
    /// Whether there are no tasks at all.
    pub is_empty: bool,
}

/// Loads the task list and pages through it.
///
/// Fetches only run once the auth gate has checked the session and found it
/// valid. After [`TaskListController::unmount`], completed fetches are
/// discarded.
#[derive(Clone)]
pub struct TaskListController {
    api: ApiClient,
    auth: watch::Receiver<AuthState>,
    notifier: Arc<dyn Notifier>,
    state: Arc<Mutex<TaskListState>>,
    mounted: Arc<AtomicBool>,
}

impl TaskListController {
    /// Creates a mounted controller showing `page_size` tasks per page.
    #[must_use]
    pub fn new(
        api: ApiClient,
        auth: watch::Receiver<AuthState>,
        notifier: Arc<dyn Notifier>,
        page_size: usize,
    ) -> Self {
        Self {
            api,
            auth,
            notifier,
            state: Arc::new(Mutex::new(TaskListState {
                paginator: Paginator::new(page_size),
                loading: false,
            })),
            mounted: Arc::new(AtomicBool::new(true)),
        }
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut TaskListState) -> R) -> R {
        let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    /// Fetches `/api/tasks` when the session is known to be valid.
    ///
    /// Failures are logged and reported as "Failed to load tasks.".
    pub async fn refresh(&self) {
        let auth = *self.auth.borrow();
        if !auth.is_checked() || !auth.is_authenticated() {
            return;
        }

        if self.is_mounted() {
            self.with_state(|state| state.loading = true);
        }
        let result = self
            .api
            .fetch_api::<Option<Vec<TaskResponse>>>(ApiRequest::new("/api/tasks"))
            .await;
        if !self.is_mounted() {
            return;
        }

        match result {
            Ok(tasks) => self.with_state(|state| {
                state.paginator.refresh(tasks.unwrap_or_default());
                state.loading = false;
            }),
            Err(err) => {
                error!(error = %err, "Failed to fetch tasks");
                self.notifier.error("Failed to load tasks.");
                self.with_state(|state| state.loading = false);
            }
        }
    }

    /// Moves to `page`, clamped to the valid range.
    pub fn set_page(&self, page: usize) {
        self.with_state(|state| state.paginator.set_page(page));
    }

    /// Returns the current view.
    #[must_use]
    pub fn view(&self) -> TaskListView {
        self.with_state(|state| TaskListView {
            displayed: state.paginator.displayed().to_vec(),
            page: state.paginator.page(),
            total_pages: state.paginator.total_pages(),
            loading: state.loading,
            is_empty: state.paginator.is_empty(),
        })
    }

    /// Detaches the controller; later fetch results are ignored.
    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::Release);
    }

    /// Whether the controller still accepts fetch results.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::Acquire)
    }
}

/// Loads a single task by id.
pub struct TaskDetailController {
    api: ApiClient,
    notifier: Arc<dyn Notifier>,
    task_id: Option<String>,
    task: Option<TaskResponse>,
    loading: bool,
}

impl TaskDetailController {
    /// Creates a controller for `task_id`; `None` never fetches.
    #[must_use]
    pub fn new(api: ApiClient, notifier: Arc<dyn Notifier>, task_id: Option<String>) -> Self {
        Self {
            api,
            notifier,
            task_id,
            task: None,
            loading: false,
        }
    }

    /// Fetches the task. Does nothing without an id.
    pub async fn refresh(&mut self) {
        let Some(id) = self.task_id.as_deref() else {
            return;
        };
        self.loading = true;
        let endpoint = format!("/api/tasks/{id}");
        match self.api.fetch_api::<TaskResponse>(ApiRequest::new(endpoint)).await {
            Ok(task) => self.task = Some(task),
            Err(err) => {
                error!(error = %err, "Failed to fetch task");
                self.notifier.error("Failed to load task.");
            }
        }
        self.loading = false;
    }

    /// The loaded task, if any.
    #[must_use]
    pub const fn task(&self) -> Option<&TaskResponse> {
        self.task.as_ref()
    }

    /// Whether a fetch is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }
}

/// Create, update and delete calls with user notifications.
#[derive(Clone)]
pub struct TaskMutations {
    api: ApiClient,
    notifier: Arc<dyn Notifier>,
    loading: Arc<AtomicBool>,
}

struct LoadingGuard<'a>(&'a AtomicBool);

impl<'a> LoadingGuard<'a> {
    fn start(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::Release);
        Self(flag)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl TaskMutations {
    /// Creates the mutation helpers.
    #[must_use]
    pub fn new(api: ApiClient, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            notifier,
            loading: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether a mutation is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    async fn run(&self, request: Result<ApiRequest, FetchError>) -> Result<(), FetchError> {
        let _loading = LoadingGuard::start(&self.loading);
        self.api
            .fetch_api::<serde_json::Value>(request?)
            .await
            .map(|_| ())
    }

    fn report(
        &self,
        result: Result<(), FetchError>,
        success: &str,
        failure: &str,
        on_success: Navigation,
    ) -> Navigation {
        match result {
            Ok(()) => {
                self.notifier.success(success);
                on_success
            }
            Err(err) => {
                error!(error = %err, "{failure}");
                self.notifier.error(failure);
                Navigation::Stay
            }
        }
    }

    /// Creates a task; navigates to the task list on success.
    pub async fn create(&self, body: &CreateTaskBody) -> Navigation {
        let request = ApiRequest::new("/api/tasks").method(Method::POST).json(body);
        let result = self.run(request).await;
        self.report(
            result,
            "Task successfully created!",
            "Failed to create task. Please try again.",
            Navigation::TaskList,
        )
    }

    /// Updates a task; stays on the current page.
    pub async fn update(&self, task_id: i64, body: &UpdateTaskBody) -> Navigation {
        let request = ApiRequest::new(format!("/api/tasks/{task_id}"))
            .method(Method::PUT)
            .json(body);
        let result = self.run(request).await;
        self.report(
            result,
            "Task successfully updated!",
            "Failed to update task. Please try again.",
            Navigation::Stay,
        )
    }

    /// Deletes a task; navigates to the task list on success.
    pub async fn delete(&self, task_id: i64) -> Navigation {
        let request = ApiRequest::new(format!("/api/tasks/{task_id}")).method(Method::DELETE);
        let result = self.run(Ok(request)).await;
        self.report(
            result,
            "Task successfully deleted!",
            "Failed to delete task. Please try again.",
            Navigation::TaskList,
        )
    }
}

/// Raw form input for creating or editing a task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskForm {
    /// Title field.
    pub title: String,
    /// Description field; blank means none.
    pub description: String,
    /// Selected status value.
    pub status: String,
    /// Selected priority value.
    pub priority: String,
    /// Due date field, ISO 8601.
    pub due_date: String,
    /// Read-only checkbox.
    pub read_only: bool,
}

impl TaskForm {
    /// Pre-fills the form from a loaded task.
    #[must_use]
    pub fn from_task(task: &TaskResponse) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            status: task.status.as_str().to_owned(),
            priority: task.priority.as_str().to_owned(),
            due_date: task.due_date.clone(),
            read_only: task.read_only,
        }
    }

    /// Status choices as `(value, label)` pairs.
    #[must_use]
    pub fn status_options() -> Vec<(&'static str, &'static str)> {
        TaskStatus::ALL
            .iter()
            .map(|status| (status.as_str(), status.label()))
            .collect()
    }

    /// Priority choices as `(value, label)` pairs.
    #[must_use]
    pub fn priority_options() -> Vec<(&'static str, &'static str)> {
        TaskPriority::ALL
            .iter()
            .map(|priority| (priority.as_str(), priority.label()))
            .collect()
    }

    fn create_body(&self) -> CreateTaskBody {
        CreateTaskBody {
            title: Some(self.title.clone()),
            description: Some(self.description.clone()),
            status: Some(self.status.clone()),
            priority: Some(self.priority.clone()),
            due_date: Some(self.due_date.clone()),
            read_only: Some(self.read_only),
        }
    }

    /// Checks the form with the same rules the backend applies and returns
    /// the create body.
    ///
    /// # Errors
    ///
    /// Returns every invalid field.
    pub fn validate(&self) -> Result<CreateTaskBody, Vec<FieldError>> {
        let body = self.create_body();
        validate_create(body.clone())
            .map(|_| body)
            .map_err(form_errors)
    }

    /// Validates the form and returns a full update body.
    ///
    /// # Errors
    ///
    /// Returns every invalid field.
    pub fn validate_update(&self) -> Result<UpdateTaskBody, Vec<FieldError>> {
        let body = self.validate()?;
        Ok(UpdateTaskBody {
            title: body.title.map(Some),
            description: Some(body.description),
            status: body.status.map(Some),
            priority: body.priority.map(Some),
            due_date: body.due_date.map(Some),
            read_only: body.read_only.map(Some),
        })
    }
}

/// Field errors shown on the form. Anything other than a field-level
/// rejection becomes one generic form error.
pub(super) fn form_errors(err: ApiError) -> Vec<FieldError> {
    match err {
        ApiError::Validation(errors) => errors,
        _ => vec![FieldError::new("form", "Invalid task form")],
    }
}
