//! Session cookie handling and the authentication middleware.

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::convert::Infallible;
use time::Duration;

use super::{AppState, error::ApiError};

/// Name of the cookie carrying the session token.
pub const AUTH_COOKIE: &str = "authToken";

/// Lifetime of the session cookie.
pub const SESSION_MAX_AGE: Duration = Duration::hours(1);

/// Attributes applied to the session cookie.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionCookieConfig {
    /// Adds the `Secure` attribute.
    pub secure: bool,
    /// Adds a `Domain` attribute.
    pub domain: Option<String>,
}

impl SessionCookieConfig {
    /// Builds the cookie that stores `token`.
    #[must_use]
    pub fn session_cookie(&self, token: &str) -> Cookie<'static> {
        let mut cookie = Cookie::new(AUTH_COOKIE, token.to_owned());
        self.apply(&mut cookie);
        cookie.set_max_age(SESSION_MAX_AGE);
        cookie
    }

    /// Builds an expired, empty cookie that clears the session.
    #[must_use]
    pub fn removal_cookie(&self) -> Cookie<'static> {
        let mut cookie = Cookie::new(AUTH_COOKIE, "");
        self.apply(&mut cookie);
        cookie.make_removal();
        cookie
    }

    fn apply(&self, cookie: &mut Cookie<'static>) {
        cookie.set_http_only(true);
        cookie.set_same_site(SameSite::Strict);
        cookie.set_path("/");
        cookie.set_secure(self.secure);
        if let Some(domain) = &self.domain {
            cookie.set_domain(domain.clone());
        }
    }
}

/// Returns the session token from the cookie, falling back to a bearer
/// `Authorization` header.
#[must_use]
pub fn session_token(jar: &CookieJar, headers: &HeaderMap) -> Option<String> {
    jar.get(AUTH_COOKIE)
        .map(|cookie| cookie.value().to_owned())
        .filter(|value| !value.trim().is_empty())
        .or_else(|| bearer_token(headers))
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
}

/// Extractor for the session token a request presents, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresentedToken(pub Option<String>);

#[async_trait]
impl<S> FromRequestParts<S> for PresentedToken
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        Ok(Self(session_token(&jar, &parts.headers)))
    }
}

/// Rejects requests without a valid session and attaches the caller's
/// [`Identity`](crate::auth::domain::Identity) to the request extensions.
///
/// # Errors
///
/// Returns a 401 [`ApiError`] when the token is absent or invalid.
pub async fn require_session(
    State(state): State<AppState>,
    PresentedToken(token): PresentedToken,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = state.auth.validate(token.as_deref()).await?;
    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}
