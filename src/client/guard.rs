//! Server-side route guard for the front end.
//!
//! Protected pages (`/` and everything under `/tasks`) are only served when
//! the request's `authToken` cookie validates against the backend. Anything
//! else is redirected to `/login`.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, header::COOKIE},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{debug, warn};

use crate::http::AUTH_COOKIE;

/// Page that unauthenticated visitors are sent to.
pub const LOGIN_PATH: &str = "/login";

/// Outcome of a guard check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Serve the page.
    Proceed,
    /// Redirect to the given path.
    Redirect(&'static str),
}

/// Validates session cookies against `GET /api/auth/validate`.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    validate_url: String,
    http: reqwest::Client,
}

impl RouteGuard {
    /// Creates a guard that validates against the API at `api_url`.
    #[must_use]
    pub fn new(api_url: &str, http: reqwest::Client) -> Self {
        Self {
            validate_url: format!("{}/api/auth/validate", api_url.trim_end_matches('/')),
            http,
        }
    }

    /// Whether `path` requires a session.
    #[must_use]
    pub fn is_protected(path: &str) -> bool {
        path == "/" || path == "/tasks" || path.starts_with("/tasks/")
    }

    /// Decides whether a request for `path` carrying `headers` may proceed.
    pub async fn check(&self, path: &str, headers: &HeaderMap) -> GuardDecision {
        if !Self::is_protected(path) {
            return GuardDecision::Proceed;
        }

        let jar = CookieJar::from_headers(headers);
        let Some(token) = jar
            .get(AUTH_COOKIE)
            .map(|cookie| cookie.value().to_owned())
            .filter(|value| !value.is_empty())
        else {
            debug!(%path, "no session cookie, redirecting to login");
            return GuardDecision::Redirect(LOGIN_PATH);
        };

        let Ok(cookie) = HeaderValue::from_str(&format!("{AUTH_COOKIE}={token}")) else {
            return GuardDecision::Redirect(LOGIN_PATH);
        };
        match self
            .http
            .get(&self.validate_url)
            .header(COOKIE, cookie)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => GuardDecision::Proceed,
            Ok(response) => {
                debug!(%path, status = response.status().as_u16(), "session rejected");
                GuardDecision::Redirect(LOGIN_PATH)
            }
            Err(err) => {
                warn!(%path, error = %err, "session validation failed");
                GuardDecision::Redirect(LOGIN_PATH)
            }
        }
    }
}

/// Axum middleware applying a [`RouteGuard`] before the page handler runs.
pub async fn guard_pages(
    State(guard): State<RouteGuard>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();
    let headers = request.headers().clone();
    match guard.check(&path, &headers).await {
        GuardDecision::Proceed => next.run(request).await,
        GuardDecision::Redirect(target) => Redirect::temporary(target).into_response(),
    }
}
