//! Client-side authentication state.
//!
//! [`AuthGate`] tracks whether the browser session is authenticated. It
//! starts [`AuthState::Unchecked`] and moves to `Authenticated` or
//! `Unauthenticated` after the first status probe. Observers subscribe to a
//! `watch` channel.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::Method;
use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, error, info, warn};

use crate::auth::domain::Credentials;
use crate::http::dto::LoginBody;

use super::{
    Navigation,
    fetch::{ApiClient, ApiRequest, FetchError},
};

/// Authentication state as seen by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    /// No status probe has completed yet.
    Unchecked,
    /// The backend accepted the session.
    Authenticated,
    /// The backend rejected the session, or could not be reached.
    Unauthenticated,
}

impl AuthState {
    /// Whether a status probe has completed.
    #[must_use]
    pub const fn is_checked(self) -> bool {
        !matches!(self, Self::Unchecked)
    }

    /// Whether the session is known to be valid.
    #[must_use]
    pub const fn is_authenticated(self) -> bool {
        matches!(self, Self::Authenticated)
    }
}

/// The session endpoints the gate relies on.
#[async_trait]
pub trait SessionApi: Send + Sync {
    /// Probes the session; `Ok(false)` means the backend rejected it.
    async fn check_status(&self) -> Result<bool, FetchError>;
    /// Submits credentials; `Ok(false)` means they were rejected.
    async fn login(&self, credentials: &Credentials) -> Result<bool, FetchError>;
    /// Ends the session.
    async fn logout(&self) -> Result<(), FetchError>;
}

#[async_trait]
impl SessionApi for ApiClient {
    async fn check_status(&self) -> Result<bool, FetchError> {
        let response = self.send(ApiRequest::new("/api/auth/status")).await?;
        Ok(response.status().is_success())
    }

    async fn login(&self, credentials: &Credentials) -> Result<bool, FetchError> {
        let body = LoginBody {
            email: Some(credentials.email().as_str().to_owned()),
            password: Some(credentials.password().to_owned()),
        };
        let request = ApiRequest::new("/api/auth/login")
            .method(Method::POST)
            .json(&body)?;
        let response = self.send(request).await?;
        Ok(response.status().is_success())
    }

    async fn logout(&self) -> Result<(), FetchError> {
        let request = ApiRequest::new("/api/auth/logout").method(Method::POST);
        self.send(request).await?;
        Ok(())
    }
}

/// Authentication gate over a [`SessionApi`].
pub struct AuthGate<S>
where
    S: SessionApi + ?Sized,
{
    api: Arc<S>,
    state: watch::Sender<AuthState>,
}

impl<S> AuthGate<S>
where
    S: SessionApi + ?Sized,
{
    /// Creates an unchecked gate.
    #[must_use]
    pub fn new(api: Arc<S>) -> Self {
        let (state, _) = watch::channel(AuthState::Unchecked);
        Self { api, state }
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> AuthState {
        *self.state.borrow()
    }

    /// Subscribes to state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    fn set(&self, next: AuthState) {
        let previous = self.state.send_replace(next);
        if previous != next {
            debug!(?previous, ?next, "auth state changed");
        }
    }

    /// Probes the session once and records the outcome.
    ///
    /// A network failure counts as unauthenticated.
    pub async fn check_status(&self) -> AuthState {
        let next = match self.api.check_status().await {
            Ok(true) => AuthState::Authenticated,
            Ok(false) => AuthState::Unauthenticated,
            Err(err) => {
                error!(error = %err, "Error checking auth status");
                AuthState::Unauthenticated
            }
        };
        self.set(next);
        next
    }

    /// Logs in, returning whether the backend accepted the credentials.
    ///
    /// Malformed input is rejected locally without a request. Rejections and
    /// failures leave the state unchanged.
    pub async fn login(&self, email: &str, password: &str) -> bool {
        let credentials = match Credentials::new(email, password) {
            Ok(valid) => valid,
            Err(err) => {
                warn!(error = %err, "login form rejected");
                return false;
            }
        };
        match self.api.login(&credentials).await {
            Ok(true) => {
                info!("logged in");
                self.set(AuthState::Authenticated);
                true
            }
            Ok(false) => false,
            Err(err) => {
                error!(error = %err, "login request failed");
                false
            }
        }
    }

    /// Logs out. The backend call is best effort; the local state always
    /// becomes unauthenticated.
    pub async fn logout(&self) -> Navigation {
        if let Err(err) = self.api.logout().await {
            warn!(error = %err, "logout request failed");
        }
        self.set(AuthState::Unauthenticated);
        Navigation::Login
    }
}

impl<S> AuthGate<S>
where
    S: SessionApi + ?Sized + 'static,
{
    /// Re-checks the session every `interval` and logs out when a probe
    /// fails. The probe stops when the returned handle is dropped.
    #[must_use]
    pub fn spawn_liveness_probe(self: &Arc<Self>, interval: Duration) -> LivenessProbe {
        let gate = Arc::clone(self);
        let handle = tokio::spawn(async move {
            let period = interval.max(Duration::from_millis(1));
            let start = tokio::time::Instant::now() + period;
            let mut ticker = tokio::time::interval_at(start, period);
            loop {
                ticker.tick().await;
                let alive = gate.api.check_status().await.unwrap_or_else(|err| {
                    error!(error = %err, "Error checking session status");
                    false
                });
                if !alive {
                    gate.logout().await;
                }
            }
        });
        LivenessProbe { handle }
    }
}

/// Handle to a running liveness probe; aborts the probe on drop.
#[derive(Debug)]
pub struct LivenessProbe {
    handle: JoinHandle<()>,
}

impl LivenessProbe {
    /// Whether the probe task has stopped.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for LivenessProbe {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
