//! HTTP transport seam.
//!
//! The client builds an [`ApiRequest`] and hands it to an [`HttpTransport`].
//! [`ReqwestTransport`] talks to the network; the fake client in
//! `crate::testing` implements the same trait without I/O.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
pub use reqwest::Method;
use serde::de::DeserializeOwned;

use twilio_core::ResponseHeaders;

use crate::error::Result;

/// Credentials attached to a single outgoing request.
#[derive(Clone, PartialEq, Eq)]
pub enum RequestAuth {
    /// HTTP basic credentials.
    Basic {
        /// Username (account SID or API key).
        username: String,
        /// Password (auth token or API secret).
        password: String,
    },
    /// `Authorization: Bearer <token>`.
    Bearer(String),
}

impl fmt::Debug for RequestAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"[REDACTED]")
                .finish(),
            Self::Bearer(_) => f.debug_tuple("Bearer").field(&"[REDACTED]").finish(),
        }
    }
}

/// A request as handed to the transport.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute URL, already resolved for region/edge.
    pub url: String,
    /// Query parameters.
    pub params: Vec<(String, String)>,
    /// Form-encoded body fields.
    pub data: Vec<(String, String)>,
    /// Request headers.
    pub headers: Vec<(String, String)>,
    /// Credentials, filled in by the client.
    pub auth: Option<RequestAuth>,
}

impl ApiRequest {
    /// Create a request without parameters.
    #[must_use]
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            params: Vec::new(),
            data: Vec::new(),
            headers: Vec::new(),
            auth: None,
        }
    }

    /// Replace the form body.
    #[must_use]
    pub fn with_data(mut self, data: Vec<(String, String)>) -> Self {
        self.data = data;
        self
    }

    /// Append a query parameter.
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    /// Append a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// First value of a form field.
    #[must_use]
    pub fn data_value(&self, name: &str) -> Option<&str> {
        self.data
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// A response as returned by the transport.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw body text.
    pub body: String,
    /// Response headers.
    pub headers: ResponseHeaders,
}

impl ApiResponse {
    /// Create a response.
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>, headers: ResponseHeaders) -> Self {
        Self {
            status,
            body: body.into(),
            headers,
        }
    }

    /// Whether the status is 2xx or 3xx.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..400).contains(&self.status)
    }

    /// Deserialize the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Sends requests on behalf of the client.
#[async_trait]
pub trait HttpTransport: Send + Sync + fmt::Debug {
    /// Send one request and return the response, whatever its status.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse>;
}

/// Network transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport with the given request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`TwilioError::Http`](crate::TwilioError::Http) if the TLS
    /// backend cannot be initialised.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Wrap an existing `reqwest` client.
    #[must_use]
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let mut builder = self.client.request(request.method.clone(), &request.url);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !request.params.is_empty() {
            builder = builder.query(&request.params);
        }
        if !request.data.is_empty() {
            builder = builder.form(&request.data);
        }
        builder = match &request.auth {
            Some(RequestAuth::Basic { username, password }) => {
                builder.basic_auth(username, Some(password))
            }
            Some(RequestAuth::Bearer(token)) => builder.bearer_auth(token),
            None => builder,
        };

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers: ResponseHeaders = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.text().await?;

        Ok(ApiResponse {
            status,
            body,
            headers,
        })
    }
}
