//! Generated `OpenAPI` description of the REST surface.
//!
//! Served at `GET /api-docs/openapi.json` when the API docs flag is on.

use axum::Json;
use utoipa::{
    Modify, OpenApi,
    openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme},
};

use super::{
    AUTH_COOKIE, auth,
    dto::{CreateTaskBody, LoginBody, MessageResponse, TaskResponse, UpdateTaskBody},
    tasks,
};

/// Route the document is served on.
pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

/// `OpenAPI` document for `/api/auth` and `/api/tasks`.
#[derive(OpenApi)]
#[openapi(
    paths(
        auth::login,
        auth::logout,
        auth::status,
        auth::validate,
        tasks::list_tasks,
        tasks::get_task,
        tasks::create_task,
        tasks::update_task,
        tasks::delete_task,
    ),
    components(schemas(
        TaskResponse,
        CreateTaskBody,
        UpdateTaskBody,
        LoginBody,
        MessageResponse
    )),
    modifiers(&SessionSecurity),
    tags(
        (name = "auth", description = "Session login, logout and validation"),
        (name = "tasks", description = "Task management")
    )
)]
pub struct ApiDoc;

/// Registers the cookie and bearer session schemes.
struct SessionSecurity;

impl Modify for SessionSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let Some(components) = openapi.components.as_mut() else {
            return;
        };
        components.add_security_scheme(
            "session_cookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(AUTH_COOKIE))),
        );
        components.add_security_scheme(
            "bearer_token",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
        );
    }
}

/// `GET /api-docs/openapi.json`.
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
