//! Shared fixtures for the REST tests.

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use chrono::{TimeZone, Utc};
use eyre::{Result, WrapErr, eyre};
use rstest::fixture;
use serde_json::Value;
use taskdesk::{
    auth::{adapters::memory::InMemoryIdentityProvider, domain::EmailAddress},
    http::{AUTH_COOKIE, AppState, SessionCookieConfig, build_router},
    task::{
        adapters::memory::InMemoryTaskRepository,
        domain::{NewTask, Task, TaskPriority, TaskStatus, TaskTitle},
        ports::TaskRepository,
    },
};
use tower::ServiceExt;

/// Registered test account.
pub const EMAIL: &str = "ada@example.com";
/// Password of [`EMAIL`].
pub const PASSWORD: &str = "correct-horse";

/// A router over in-memory adapters.
pub struct TestApp {
    pub router: Router,
    pub repository: Arc<InMemoryTaskRepository>,
}

/// Decoded response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    /// Every `Set-Cookie` header value.
    pub fn set_cookies(&self) -> Vec<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .map(str::to_owned)
            .collect()
    }
}

/// Builds the app with one registered user and an empty task store.
#[fixture]
pub fn app() -> TestApp {
    build_app(false)
}

/// Same as [`app`] with the `OpenAPI` document routed.
#[fixture]
pub fn docs_app() -> TestApp {
    build_app(true)
}

fn build_app(api_docs: bool) -> TestApp {
    let repository = Arc::new(InMemoryTaskRepository::new());
    let email = EmailAddress::new(EMAIL).expect("valid email");
    let provider = InMemoryIdentityProvider::new()
        .with_user(&email, PASSWORD)
        .expect("register user");
    let state = AppState::new(
        repository.clone(),
        Arc::new(provider),
        SessionCookieConfig::default(),
    )
    .with_api_docs(api_docs);
    TestApp {
        router: build_router(state),
        repository,
    }
}

impl TestApp {
    /// Sends one request; `cookie` is the raw session token.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        cookie: Option<&str>,
        body: Option<Value>,
    ) -> Result<TestResponse> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = cookie {
            builder = builder.header(header::COOKIE, format!("{AUTH_COOKIE}={token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))?,
            None => builder.body(Body::empty())?,
        };

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .wrap_err("router call")?;
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .wrap_err("read body")?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).wrap_err("decode body")?
        };
        Ok(TestResponse {
            status,
            headers,
            body,
        })
    }

    /// Logs in as [`EMAIL`] and returns the session token.
    pub async fn login(&self) -> Result<String> {
        let response = self
            .send(
                Method::POST,
                "/api/auth/login",
                None,
                Some(serde_json::json!({ "email": EMAIL, "password": PASSWORD })),
            )
            .await?;
        if response.status != StatusCode::OK {
            return Err(eyre!("login failed with {}", response.status));
        }
        response
            .set_cookies()
            .iter()
            .find_map(|cookie| {
                cookie
                    .strip_prefix(&format!("{AUTH_COOKIE}="))
                    .and_then(|rest| rest.split(';').next())
                    .map(str::to_owned)
            })
            .ok_or_else(|| eyre!("login response carried no session cookie"))
    }

    /// Stores a task directly.
    pub async fn seed(&self, title: &str, read_only: bool) -> Result<Task> {
        let due = Utc
            .with_ymd_and_hms(2025, 1, 1, 0, 0, 0)
            .single()
            .ok_or_else(|| eyre!("invalid due date"))?;
        let task = NewTask::new(TaskTitle::new(title)?, TaskStatus::ToDo, TaskPriority::Low, due)
            .with_description("seeded")
            .with_read_only(read_only);
        Ok(self.repository.insert(&task, Utc::now()).await?)
    }
}
