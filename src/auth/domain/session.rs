//! Session token and authenticated identity.

use super::AuthDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque bearer token issued by the identity provider.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wraps a token value.
    ///
    /// # Errors
    ///
    /// Returns [`AuthDomainError::EmptySessionToken`] for blank input.
    pub fn new(value: impl Into<String>) -> Result<Self, AuthDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AuthDomainError::EmptySessionToken);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the raw token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

/// User identity returned by the provider for a valid session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Provider-assigned user identifier.
    pub user_id: String,
    /// Email address, when the provider exposes it.
    pub email: Option<String>,
}
