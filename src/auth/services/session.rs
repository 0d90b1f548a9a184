//! Service layer for login and per-request session validation.

use crate::auth::{
    domain::{Credentials, Identity, SessionToken},
    ports::{IdentityProvider, IdentityProviderError},
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Service-level errors for authentication operations.
#[derive(Debug, Error)]
pub enum AuthServiceError {
    /// The provider rejected the credentials.
    #[error("invalid credentials")]
    InvalidCredentials,
    /// No session token was presented.
    #[error("authentication required")]
    MissingSession,
    /// The presented token is unknown or expired.
    #[error("invalid or expired session")]
    InvalidSession,
    /// The identity provider failed.
    #[error(transparent)]
    Provider(#[from] IdentityProviderError),
}

/// Result type for authentication service operations.
pub type AuthServiceResult<T> = Result<T, AuthServiceError>;

/// Login and session validation service.
pub struct AuthService<P>
where
    P: IdentityProvider + ?Sized,
{
    provider: Arc<P>,
}

impl<P> Clone for AuthService<P>
where
    P: IdentityProvider + ?Sized,
{
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
        }
    }
}

impl<P> AuthService<P>
where
    P: IdentityProvider + ?Sized,
{
    /// Creates a new authentication service.
    #[must_use]
    pub const fn new(provider: Arc<P>) -> Self {
        Self { provider }
    }

    /// Exchanges credentials for a session token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthServiceError::InvalidCredentials`] when the provider
    /// rejects the credentials, or [`AuthServiceError::Provider`] when the
    /// provider fails.
    pub async fn login(&self, credentials: &Credentials) -> AuthServiceResult<SessionToken> {
        let token = self
            .provider
            .sign_in(credentials)
            .await?
            .ok_or(AuthServiceError::InvalidCredentials)?;
        info!(email = %credentials.email(), "login succeeded");
        Ok(token)
    }

    /// Resolves the identity behind a raw token value.
    ///
    /// # Errors
    ///
    /// Returns [`AuthServiceError::MissingSession`] for absent or blank
    /// tokens, [`AuthServiceError::InvalidSession`] when the provider does not
    /// recognize the token, or [`AuthServiceError::Provider`] when the
    /// provider fails.
    pub async fn validate(&self, raw_token: Option<&str>) -> AuthServiceResult<Identity> {
        let token = raw_token
            .and_then(|value| SessionToken::new(value).ok())
            .ok_or(AuthServiceError::MissingSession)?;
        let identity = self
            .provider
            .verify(&token)
            .await?
            .ok_or(AuthServiceError::InvalidSession)?;
        debug!(user_id = %identity.user_id, "session validated");
        Ok(identity)
    }
}
