//! Shared world state for task access control BDD scenarios.

use axum::http::Method;
use eyre::{Result, eyre};
use rstest::fixture;
use serde_json::Value;
use taskdesk::task::domain::TaskId;

use crate::helpers::{TestApp, TestResponse, app};

/// Scenario world for task access behaviour tests.
pub struct TaskAccessWorld {
    pub app: TestApp,
    pub token: Option<String>,
    pub task_id: Option<TaskId>,
    pub last_response: Option<TestResponse>,
}

impl TaskAccessWorld {
    /// Creates a world with no session and an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            app: app(),
            token: None,
            task_id: None,
            last_response: None,
        }
    }

    /// Sends a request with the world's session, if any.
    pub fn send(&self, method: Method, uri: &str, body: Option<Value>) -> Result<TestResponse> {
        run_async(self.app.send(method, uri, self.token.as_deref(), body))
    }

    /// URI of the task the scenario is about.
    pub fn task_uri(&self) -> Result<String> {
        let id = self
            .task_id
            .ok_or_else(|| eyre!("missing task in scenario world"))?;
        Ok(format!("/api/tasks/{id}"))
    }

    /// Titles of every listed task.
    pub fn listed_titles(&self) -> Result<Vec<String>> {
        let response = self.send(Method::GET, "/api/tasks", None)?;
        let tasks = response
            .body
            .as_array()
            .ok_or_else(|| eyre!("expected a task array, got {}", response.body))?;
        Ok(tasks
            .iter()
            .filter_map(|task| task["title"].as_str())
            .map(str::to_owned)
            .collect())
    }
}

impl Default for TaskAccessWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TaskAccessWorld {
    TaskAccessWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
