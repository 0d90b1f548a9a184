//! Environment configuration for the server and the front-end client.
//!
//! Every setting has a default except the optional integrations (Postgres and
//! Supabase); leaving those unset selects the in-memory adapters. Values that
//! are present but malformed fail start-up with [`ConfigError`].

use std::{
    env, fmt,
    net::{Ipv4Addr, SocketAddr, SocketAddrV4},
    str::FromStr,
    time::Duration,
};

use axum::http::HeaderValue;
use thiserror::Error;

use crate::auth::domain::Credentials;
use crate::client::{fetch::ApiClient, fetch::FetchError, guard::RouteGuard};
use crate::http::SessionCookieConfig;

const DEFAULT_BIND: SocketAddr = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 4000));
const DEFAULT_POOL_SIZE: u32 = 8;
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";
const DEFAULT_API_URL: &str = "http://localhost:4000";
const DEFAULT_PROBE_INTERVAL_SECS: u64 = 60;
const DEFAULT_PAGE_SIZE: usize = 10;

/// Configuration failures detected at start-up.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A variable is set to a value that cannot be used.
    #[error("invalid value for {name}: {reason}")]
    Invalid {
        /// Variable name.
        name: &'static str,
        /// What is wrong with the value.
        reason: String,
    },
    /// A variable is required because a related one is set.
    #[error("{name} must be set when {requires} is set")]
    Incomplete {
        /// The missing variable.
        name: &'static str,
        /// The variable that requires it.
        requires: &'static str,
    },
}

impl ConfigError {
    fn invalid(name: &'static str, reason: impl fmt::Display) -> Self {
        Self::Invalid {
            name,
            reason: reason.to_string(),
        }
    }
}

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("expected `text` or `json`, got `{other}`")),
        }
    }
}

/// Postgres settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Connection URL.
    pub url: String,
    /// Maximum pooled connections.
    pub pool_size: u32,
    /// Whether to apply the schema on start.
    pub run_migrations: bool,
}

/// Which identity provider backs logins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityConfig {
    /// Supabase GoTrue.
    Supabase {
        /// Project URL.
        url: String,
        /// Anonymous API key.
        anon_key: String,
    },
    /// In-memory provider seeded with these accounts.
    Local(Vec<Credentials>),
}

/// Backend settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address.
    pub bind: SocketAddr,
    /// Postgres settings; `None` selects the in-memory store.
    pub database: Option<DatabaseConfig>,
    /// Identity provider settings.
    pub identity: IdentityConfig,
    /// Session cookie attributes.
    pub cookies: SessionCookieConfig,
    /// Origin allowed to send credentialed requests.
    pub cors_origin: HeaderValue,
    /// Log output format.
    pub log_format: LogFormat,
    /// Serve the `OpenAPI` document at `/api-docs/openapi.json`.
    pub api_docs: bool,
}

/// Reads variables through a lookup function.
struct Source<'a> {
    lookup: &'a dyn Fn(&str) -> Option<String>,
}

impl Source<'_> {
    fn text(&self, name: &str) -> Option<String> {
        (self.lookup)(name)
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
    }

    fn parsed<T>(&self, name: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        self.text(name).map_or(Ok(default), |raw| {
            raw.parse().map_err(|err| ConfigError::invalid(name, err))
        })
    }

    fn flag(&self, name: &'static str, default: bool) -> Result<bool, ConfigError> {
        let Some(raw) = self.text(name) else {
            return Ok(default);
        };
        match raw.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::invalid(name, format!("`{raw}` is not a boolean"))),
        }
    }
}

impl ServerConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is malformed or incomplete.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&|name| env::var(name).ok())
    }

    /// Reads the configuration through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is malformed or incomplete.
    pub fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let source = Source { lookup };
        let bind = source.parsed("TASKDESK_BIND", DEFAULT_BIND)?;

        let database = match source.text("DATABASE_URL") {
            Some(url) => {
                let pool_size = source.parsed("TASKDESK_DB_POOL_SIZE", DEFAULT_POOL_SIZE)?;
                if pool_size == 0 {
                    return Err(ConfigError::invalid(
                        "TASKDESK_DB_POOL_SIZE",
                        "must be at least 1",
                    ));
                }
                Some(DatabaseConfig {
                    url,
                    pool_size,
                    run_migrations: source.flag("TASKDESK_RUN_MIGRATIONS", true)?,
                })
            }
            None => None,
        };

        let identity = identity_config(&source)?;

        let cookies = SessionCookieConfig {
            secure: source.flag("TASKDESK_COOKIE_SECURE", false)?,
            domain: source.text("TASKDESK_COOKIE_DOMAIN"),
        };

        let origin = source
            .text("TASKDESK_CORS_ORIGIN")
            .unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_owned());
        let cors_origin = HeaderValue::from_str(&origin)
            .map_err(|err| ConfigError::invalid("TASKDESK_CORS_ORIGIN", err))?;

        Ok(Self {
            bind,
            database,
            identity,
            cookies,
            cors_origin,
            log_format: source.parsed("TASKDESK_LOG_FORMAT", LogFormat::Text)?,
            api_docs: source.flag("TASKDESK_ENABLE_API_DOCS", false)?,
        })
    }
}

fn identity_config(source: &Source<'_>) -> Result<IdentityConfig, ConfigError> {
    match (source.text("SUPABASE_URL"), source.text("SUPABASE_ANON_KEY")) {
        (Some(url), Some(anon_key)) => Ok(IdentityConfig::Supabase { url, anon_key }),
        (Some(_), None) => Err(ConfigError::Incomplete {
            name: "SUPABASE_ANON_KEY",
            requires: "SUPABASE_URL",
        }),
        (None, Some(_)) => Err(ConfigError::Incomplete {
            name: "SUPABASE_URL",
            requires: "SUPABASE_ANON_KEY",
        }),
        (None, None) => source
            .text("TASKDESK_DEV_USERS")
            .map_or_else(|| Ok(Vec::new()), |raw| parse_dev_users(&raw))
            .map(IdentityConfig::Local),
    }
}

/// Parses `email=password` pairs separated by commas.
fn parse_dev_users(raw: &str) -> Result<Vec<Credentials>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (email, password) = entry.split_once('=').ok_or_else(|| {
                ConfigError::invalid("TASKDESK_DEV_USERS", format!("`{entry}` is not email=password"))
            })?;
            Credentials::new(email.trim(), password)
                .map_err(|err| ConfigError::invalid("TASKDESK_DEV_USERS", err))
        })
        .collect()
}

/// Front-end settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the REST API.
    pub api_url: String,
    /// Delay between session liveness probes.
    pub probe_interval: Duration,
    /// Tasks per list page.
    pub page_size: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_owned(),
            probe_interval: Duration::from_secs(DEFAULT_PROBE_INTERVAL_SECS),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ClientConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&|name| env::var(name).ok())
    }

    /// Reads `TASKDESK_API_URL`, `TASKDESK_PROBE_INTERVAL_SECS` and
    /// `TASKDESK_PAGE_SIZE` through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is malformed.
    pub fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let source = Source { lookup };
        let api_url = source
            .text("TASKDESK_API_URL")
            .unwrap_or_else(|| DEFAULT_API_URL.to_owned());
        let probe_secs =
            source.parsed("TASKDESK_PROBE_INTERVAL_SECS", DEFAULT_PROBE_INTERVAL_SECS)?;
        if probe_secs == 0 {
            return Err(ConfigError::invalid(
                "TASKDESK_PROBE_INTERVAL_SECS",
                "must be at least 1",
            ));
        }
        let page_size = source.parsed("TASKDESK_PAGE_SIZE", DEFAULT_PAGE_SIZE)?;
        if page_size == 0 {
            return Err(ConfigError::invalid("TASKDESK_PAGE_SIZE", "must be at least 1"));
        }
        Ok(Self {
            api_url,
            probe_interval: Duration::from_secs(probe_secs),
            page_size,
        })
    }

    /// Builds an API client for [`ClientConfig::api_url`].
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Network`] when the HTTP client cannot be built.
    pub fn api_client(&self) -> Result<ApiClient, FetchError> {
        ApiClient::new(self.api_url.clone())
    }

    /// Builds a route guard validating against [`ClientConfig::api_url`].
    #[must_use]
    pub fn route_guard(&self, http: reqwest::Client) -> RouteGuard {
        RouteGuard::new(&self.api_url, http)
    }
}
