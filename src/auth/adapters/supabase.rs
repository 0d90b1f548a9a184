//! Supabase (`GoTrue`) identity provider over HTTP.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::auth::{
    domain::{Credentials, Identity, SessionToken},
    ports::{IdentityProvider, IdentityProviderError, IdentityProviderResult},
};

/// Identity provider backed by a Supabase project's auth REST API.
#[derive(Debug, Clone)]
pub struct SupabaseIdentityProvider {
    base_url: String,
    anon_key: String,
    http: reqwest::Client,
}

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct UserResponse {
    id: String,
    email: Option<String>,
}

impl SupabaseIdentityProvider {
    /// Creates a provider for the project at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self::with_client(base_url, anon_key, reqwest::Client::new())
    }

    /// Creates a provider that shares an existing HTTP client.
    #[must_use]
    pub fn with_client(
        base_url: impl Into<String>,
        anon_key: impl Into<String>,
        http: reqwest::Client,
    ) -> Self {
        let url = base_url.into();
        Self {
            base_url: url.trim_end_matches('/').to_owned(),
            anon_key: anon_key.into(),
            http,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

/// Statuses `GoTrue` uses to reject credentials or tokens.
const fn is_rejection(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
    )
}

#[async_trait]
impl IdentityProvider for SupabaseIdentityProvider {
    async fn sign_in(
        &self,
        credentials: &Credentials,
    ) -> IdentityProviderResult<Option<SessionToken>> {
        let response = self
            .http
            .post(self.endpoint("/auth/v1/token?grant_type=password"))
            .header("apikey", &self.anon_key)
            .json(&PasswordGrant {
                email: credentials.email().as_str(),
                password: credentials.password(),
            })
            .send()
            .await
            .map_err(IdentityProviderError::unavailable)?;

        let status = response.status();
        if is_rejection(status) {
            warn!(status = status.as_u16(), "identity provider rejected credentials");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(IdentityProviderError::UnexpectedStatus(status.as_u16()));
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(IdentityProviderError::unavailable)?;
        Ok(SessionToken::new(body.access_token).ok())
    }

    async fn verify(&self, token: &SessionToken) -> IdentityProviderResult<Option<Identity>> {
        let response = self
            .http
            .get(self.endpoint("/auth/v1/user"))
            .header("apikey", &self.anon_key)
            .bearer_auth(token.as_str())
            .send()
            .await
            .map_err(IdentityProviderError::unavailable)?;

        let status = response.status();
        if is_rejection(status) {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(IdentityProviderError::UnexpectedStatus(status.as_u16()));
        }

        let user: UserResponse = response
            .json()
            .await
            .map_err(IdentityProviderError::unavailable)?;
        Ok(Some(Identity {
            user_id: user.id,
            email: user.email,
        }))
    }
}
