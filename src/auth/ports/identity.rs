//! Identity provider port: credential verification and token validation.

use crate::auth::domain::{Credentials, Identity, SessionToken};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for identity provider operations.
pub type IdentityProviderResult<T> = Result<T, IdentityProviderError>;

/// External identity provider contract.
///
/// Rejections (wrong password, expired token) are `Ok(None)`; errors are
/// reserved for provider failures.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Exchanges credentials for a session token.
    ///
    /// Returns `None` when the provider rejects the credentials.
    async fn sign_in(
        &self,
        credentials: &Credentials,
    ) -> IdentityProviderResult<Option<SessionToken>>;

    /// Resolves the identity behind a session token.
    ///
    /// Returns `None` when the token is unknown, expired, or revoked.
    async fn verify(&self, token: &SessionToken) -> IdentityProviderResult<Option<Identity>>;
}

/// Errors returned by identity provider implementations.
#[derive(Debug, Clone, Error)]
pub enum IdentityProviderError {
    /// The provider could not be reached or its reply could not be read.
    #[error("identity provider unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),

    /// The provider answered with a status outside its contract.
    #[error("identity provider returned unexpected status {0}")]
    UnexpectedStatus(u16),
}

impl IdentityProviderError {
    /// Wraps a transport or decoding error.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }
}
