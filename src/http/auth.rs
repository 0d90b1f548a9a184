//! Handlers under `/api/auth`.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use axum_extra::extract::cookie::CookieJar;

use super::{
    AppState,
    dto::{LoginBody, MessageResponse},
    error::ApiError,
    session::PresentedToken,
    validation::validate_login,
};

/// `POST /api/auth/login`: exchanges credentials for a session cookie.
///
/// # Errors
///
/// 400 for missing fields, 422 for malformed fields, 401 for rejected
/// credentials.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginBody,
    responses(
        (status = 200, description = "Session cookie issued", body = MessageResponse),
        (status = 400, description = "Email or password missing"),
        (status = 401, description = "Credentials rejected"),
        (status = 422, description = "Malformed email or short password")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Result<Json<LoginBody>, JsonRejection>,
) -> Result<(CookieJar, Json<MessageResponse>), ApiError> {
    let Json(login_body) = body?;
    let credentials = validate_login(login_body)?;
    let token = state.auth.login(&credentials).await?;
    let cookie = state.cookies.session_cookie(token.as_str());
    Ok((
        jar.add(cookie),
        Json(MessageResponse::new("Authentication successful")),
    ))
}

/// `POST /api/auth/logout`: clears the session cookie.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "auth",
    responses((status = 200, description = "Session cookie cleared", body = MessageResponse))
)]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    (
        jar.add(state.cookies.removal_cookie()),
        Json(MessageResponse::new("Logged out successfully")),
    )
}

/// `GET /api/auth/status`: reports whether the caller holds a valid session.
///
/// # Errors
///
/// 401 when the session is absent or invalid.
#[utoipa::path(
    get,
    path = "/api/auth/status",
    tag = "auth",
    responses(
        (status = 200, description = "Session is valid", body = MessageResponse),
        (status = 401, description = "Session absent or invalid")
    ),
    security(("session_cookie" = []), ("bearer_token" = []))
)]
pub async fn status(
    State(state): State<AppState>,
    PresentedToken(token): PresentedToken,
) -> Result<Json<MessageResponse>, ApiError> {
    state.auth.validate(token.as_deref()).await?;
    Ok(Json(MessageResponse::new("User is authenticated")))
}

/// `GET /api/auth/validate`: validates the session for the route guard.
///
/// # Errors
///
/// 401 when no token is presented or the token is invalid.
#[utoipa::path(
    get,
    path = "/api/auth/validate",
    tag = "auth",
    responses(
        (status = 200, description = "Session is valid", body = MessageResponse),
        (status = 401, description = "Session absent or invalid")
    ),
    security(("session_cookie" = []), ("bearer_token" = []))
)]
pub async fn validate(
    State(state): State<AppState>,
    PresentedToken(token): PresentedToken,
) -> Result<Json<MessageResponse>, ApiError> {
    state.auth.validate(token.as_deref()).await?;
    Ok(Json(MessageResponse::new("Authenticated")))
}
