//! REST surface of the taskdesk backend.
//!
//! [`build_router`] wires the `/api/auth` and `/api/tasks` routes onto an
//! [`AppState`]. Task routes pass through the session middleware, which
//! validates the `authToken` cookie (or a bearer header) with the identity
//! provider on every request.

pub mod auth;
pub mod dto;
pub mod error;
pub mod openapi;
pub mod session;
pub mod tasks;
pub mod validation;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderValue, Method, StatusCode, header},
    middleware,
    routing::{get, post},
};
use mockable::DefaultClock;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::{ports::IdentityProvider, services::AuthService};
use crate::task::{ports::TaskRepository, services::TaskLifecycleService};

pub use error::{ApiError, FieldError};
pub use session::{AUTH_COOKIE, SessionCookieConfig};

/// Task service as held by the HTTP layer.
pub type SharedTaskService = TaskLifecycleService<dyn TaskRepository, DefaultClock>;

/// Authentication service as held by the HTTP layer.
pub type SharedAuthService = AuthService<dyn IdentityProvider>;

/// Shared handler dependencies.
#[derive(Clone)]
pub struct AppState {
    /// Task lifecycle service.
    pub tasks: SharedTaskService,
    /// Login and session validation.
    pub auth: SharedAuthService,
    /// Session cookie attributes.
    pub cookies: SessionCookieConfig,
    /// Whether the `OpenAPI` document is served.
    pub api_docs: bool,
}

impl AppState {
    /// Builds state from a repository and an identity provider.
    #[must_use]
    pub fn new(
        repository: Arc<dyn TaskRepository>,
        provider: Arc<dyn IdentityProvider>,
        cookies: SessionCookieConfig,
    ) -> Self {
        Self {
            tasks: TaskLifecycleService::new(repository, Arc::new(DefaultClock)),
            auth: AuthService::new(provider),
            cookies,
            api_docs: false,
        }
    }

    /// Enables or disables `GET /api-docs/openapi.json`.
    #[must_use]
    pub const fn with_api_docs(mut self, enabled: bool) -> Self {
        self.api_docs = enabled;
        self
    }
}

/// Builds the application router with request tracing.
///
/// The `OpenAPI` document is only routed when [`AppState::api_docs`] is set.
#[must_use]
pub fn build_router(state: AppState) -> Router {
    let task_routes = Router::new()
        .route("/", get(tasks::list_tasks).post(tasks::create_task))
        .route(
            "/:id",
            get(tasks::get_task)
                .put(tasks::update_task)
                .delete(tasks::delete_task),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            session::require_session,
        ));

    let auth_routes = Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/status", get(auth::status))
        .route("/validate", get(auth::validate));

    let mut router = Router::new()
        .route("/healthz", get(|| async { StatusCode::OK }))
        .nest("/api/auth", auth_routes)
        .nest("/api/tasks", task_routes);
    if state.api_docs {
        router = router.route(openapi::OPENAPI_PATH, get(openapi::openapi_json));
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

/// CORS policy allowing credentialed requests from `origin`.
#[must_use]
pub fn cors_layer(origin: HeaderValue) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::CACHE_CONTROL,
            header::HeaderName::from_static("x-requested-with"),
        ])
}
