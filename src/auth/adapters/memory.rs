//! In-memory identity provider for tests and local development.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use crate::auth::{
    domain::{Credentials, EmailAddress, Identity, SessionToken},
    ports::{IdentityProvider, IdentityProviderError, IdentityProviderResult},
};

/// Identity provider holding registered users and issued sessions in memory.
///
/// Passwords are stored as SHA-256 digests. Sessions never expire; call
/// [`InMemoryIdentityProvider::revoke`] to invalidate one.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIdentityProvider {
    state: Arc<RwLock<InMemoryIdentityState>>,
}

#[derive(Debug, Default)]
struct InMemoryIdentityState {
    users: HashMap<EmailAddress, RegisteredUser>,
    sessions: HashMap<String, Identity>,
}

#[derive(Debug, Clone)]
struct RegisteredUser {
    user_id: String,
    password_digest: String,
}

fn digest(password: &str) -> String {
    format!("{:x}", Sha256::digest(password.as_bytes()))
}

fn poisoned(err: &impl fmt::Display) -> IdentityProviderError {
    IdentityProviderError::unavailable(std::io::Error::other(format!("lock poisoned: {err}")))
}

impl InMemoryIdentityProvider {
    /// Creates a provider with no users.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user, replacing any previous password for the address.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityProviderError`] when the state lock is poisoned.
    pub fn register(&self, email: &EmailAddress, password: &str) -> IdentityProviderResult<()> {
        let mut state = self.state.write().map_err(|err| poisoned(&err))?;
        let user_id = state
            .users
            .get(email)
            .map_or_else(|| Uuid::new_v4().to_string(), |user| user.user_id.clone());
        state.users.insert(
            email.clone(),
            RegisteredUser {
                user_id,
                password_digest: digest(password),
            },
        );
        Ok(())
    }

    /// Builder-style registration used when wiring fixtures.
    ///
    /// # Errors
    ///
    /// See [`InMemoryIdentityProvider::register`].
    pub fn with_user(self, email: &EmailAddress, password: &str) -> IdentityProviderResult<Self> {
        self.register(email, password)?;
        Ok(self)
    }

    /// Invalidates an issued session.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityProviderError`] when the state lock is poisoned.
    pub fn revoke(&self, token: &SessionToken) -> IdentityProviderResult<()> {
        let mut state = self.state.write().map_err(|err| poisoned(&err))?;
        state.sessions.remove(token.as_str());
        Ok(())
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn sign_in(
        &self,
        credentials: &Credentials,
    ) -> IdentityProviderResult<Option<SessionToken>> {
        let mut state = self.state.write().map_err(|err| poisoned(&err))?;
        let Some(user) = state.users.get(credentials.email()).cloned() else {
            return Ok(None);
        };
        if user.password_digest != digest(credentials.password()) {
            return Ok(None);
        }

        let raw_token = Uuid::new_v4().simple().to_string();
        let token =
            SessionToken::new(raw_token.clone()).map_err(IdentityProviderError::unavailable)?;
        state.sessions.insert(
            raw_token,
            Identity {
                user_id: user.user_id,
                email: Some(credentials.email().as_str().to_owned()),
            },
        );
        Ok(Some(token))
    }

    async fn verify(&self, token: &SessionToken) -> IdentityProviderResult<Option<Identity>> {
        let state = self.state.read().map_err(|err| poisoned(&err))?;
        Ok(state.sessions.get(token.as_str()).cloned())
    }
}
