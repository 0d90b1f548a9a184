//! Request helper for the taskdesk REST API.
//!
//! [`ApiClient`] keeps a cookie store, so the session cookie set by
//! `/api/auth/login` is sent with every later request.

use reqwest::{
    Method, Response,
    header::{CACHE_CONTROL, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue},
};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::error;

/// Non-2xx response from the API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("API Error: {status} {status_text}")]
pub struct RequestError {
    /// HTTP status code.
    pub status: u16,
    /// Canonical reason phrase, empty when unknown.
    pub status_text: String,
}

/// Failures of [`ApiClient::fetch_api`].
#[derive(Debug, Error)]
pub enum FetchError {
    /// The API answered with a non-2xx status.
    #[error(transparent)]
    Status(#[from] RequestError),
    /// The request never completed.
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),
    /// The request body could not be encoded.
    #[error("invalid request body: {0}")]
    Encode(#[source] serde_json::Error),
    /// The response body did not match the expected shape.
    #[error("invalid response body: {0}")]
    Decode(#[source] serde_json::Error),
}

impl FetchError {
    /// Returns the HTTP status for [`FetchError::Status`].
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status(request) => Some(request.status),
            Self::Network(_) | Self::Encode(_) | Self::Decode(_) => None,
        }
    }
}

/// A request to an API endpoint. Defaults to `GET` with no body.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    endpoint: String,
    method: Method,
    body: Option<Vec<u8>>,
    headers: HeaderMap,
}

impl ApiRequest {
    /// Creates a `GET` request for `endpoint`, e.g. `/api/tasks`.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            method: Method::GET,
            body: None,
            headers: HeaderMap::new(),
        }
    }

    /// Sets the HTTP method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Attaches a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Encode`] when `body` cannot be serialized.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, FetchError> {
        self.body = Some(serde_json::to_vec(body).map_err(FetchError::Encode)?);
        Ok(self)
    }

    /// Adds a header, replacing any previous value with the same name.
    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Returns the endpoint path.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// HTTP client bound to one API base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    /// Creates a client with its own cookie store.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Network`] when the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .map_err(FetchError::Network)?;
        Ok(Self::with_client(base_url, http))
    }

    /// Creates a client around an existing HTTP client.
    #[must_use]
    pub fn with_client(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        let url = base_url.into();
        Self {
            base_url: url.trim_end_matches('/').to_owned(),
            http,
        }
    }

    /// Returns the API base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends a request and returns the raw response whatever its status.
    ///
    /// `Cache-Control: no-store` is always sent; `Content-Type:
    /// application/json` only with a body. Caller headers win.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Network`] when the request does not complete.
    pub async fn send(&self, request: ApiRequest) -> Result<Response, FetchError> {
        let ApiRequest {
            endpoint,
            method,
            body,
            headers,
        } = request;

        let mut all_headers = HeaderMap::new();
        all_headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
        if body.is_some() {
            all_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        all_headers.extend(headers);

        let mut builder = self
            .http
            .request(method, format!("{}{endpoint}", self.base_url))
            .headers(all_headers);
        if let Some(bytes) = body {
            builder = builder.body(bytes);
        }
        builder.send().await.map_err(|err| {
            error!(%endpoint, error = %err, "request failed");
            FetchError::Network(err)
        })
    }

    /// Sends a request and decodes a 2xx JSON response.
    ///
    /// Empty bodies decode as JSON `null`, so `()` and `Option<T>` targets
    /// accept `204 No Content`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Status`] for non-2xx responses, whose message
    /// reads `API Error: <status> <text>`, and [`FetchError::Network`] or
    /// [`FetchError::Decode`] for transport and body failures. Every failure
    /// is logged.
    pub async fn fetch_api<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<T, FetchError> {
        let endpoint = request.endpoint().to_owned();
        let response = self.send(request).await?;

        let status = response.status();
        if !status.is_success() {
            let failure = RequestError {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_owned(),
            };
            error!(%endpoint, error = %failure, "Failed to fetch {endpoint}");
            return Err(failure.into());
        }

        let bytes = response.bytes().await.map_err(|err| {
            error!(%endpoint, error = %err, "Failed to read response body");
            FetchError::Network(err)
        })?;
        let payload: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
            b"null"
        } else {
            &bytes
        };
        serde_json::from_slice(payload).map_err(|err| {
            error!(%endpoint, error = %err, "Failed to decode response body");
            FetchError::Decode(err)
        })
    }
}
