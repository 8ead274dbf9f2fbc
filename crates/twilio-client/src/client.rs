//! Twilio REST client.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;
use twilio_core::ResponseHeaders;

use crate::auth::{BasicCredentialProvider, CredentialProvider};
use crate::config::ClientConfig;
use crate::error::{Result, TwilioError};
use crate::hostname::resolve_hostname;
use crate::http::{ApiRequest, ApiResponse, HttpTransport, Method, ReqwestTransport};
use crate::rest::{Calls, Messages, Messaging};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Twilio error body.
#[derive(Debug, Deserialize)]
struct RestErrorBody {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    more_info: Option<String>,
}

/// Twilio API client.
///
/// Generic over the transport so tests can intercept requests; the default
/// transport talks to the network through `reqwest`.
#[derive(Debug, Clone)]
pub struct TwilioClient<T: HttpTransport = ReqwestTransport> {
    transport: Arc<T>,
    provider: Arc<dyn CredentialProvider>,
    account_sid: Option<String>,
    region: Option<String>,
    edge: Option<String>,
    user_agent_extensions: Vec<String>,
    api_base_url: String,
    messaging_base_url: String,
}

// ============================================================================
// Construction
// ============================================================================

impl TwilioClient<ReqwestTransport> {
    /// Create a client authenticating with basic credentials.
    ///
    /// `username` is an account SID or API key. For API keys, set the account
    /// through [`ClientConfig::with_account_sid`] and use
    /// [`from_config`](Self::from_config).
    ///
    /// # Errors
    ///
    /// Returns [`TwilioError::Configuration`] if either value is empty.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Result<Self> {
        Self::from_config(ClientConfig::new(username, password))
    }

    /// Create a client from a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TwilioError::Configuration`] if no usable credentials are set,
    /// or [`TwilioError::Http`] if the HTTP client cannot be built.
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(Duration::from_secs(config.timeout_seconds))?;
        Self::with_transport(config, transport)
    }

    /// Create a client from `TWILIO_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`TwilioError::Configuration`] if no usable credentials are set.
    pub fn from_env() -> Result<Self> {
        Self::from_config(ClientConfig::from_env())
    }
}

impl<T: HttpTransport> TwilioClient<T> {
    /// Create a client that sends requests through `transport`.
    ///
    /// An explicit credential provider wins; otherwise basic auth is built
    /// from the configured username and password.
    ///
    /// # Errors
    ///
    /// Returns [`TwilioError::Configuration`] if no usable credentials are set.
    pub fn with_transport(config: ClientConfig, transport: T) -> Result<Self> {
        let provider: Arc<dyn CredentialProvider> = match &config.credential_provider {
            Some(provider) => Arc::clone(provider),
            None => match (config.username(), config.password()) {
                (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
                    Arc::new(BasicCredentialProvider::new(username, password))
                }
                _ => {
                    return Err(TwilioError::Configuration(
                        "Credentials are required to create a TwilioClient".to_string(),
                    ))
                }
            },
        };

        Ok(Self::assemble(config, transport, provider))
    }

    pub(crate) fn assemble(
        config: ClientConfig,
        transport: T,
        provider: Arc<dyn CredentialProvider>,
    ) -> Self {
        let account_sid = config
            .account_sid
            .clone()
            .or_else(|| config.username().map(String::from));

        Self {
            transport: Arc::new(transport),
            provider,
            account_sid,
            region: config.region,
            edge: config.edge,
            user_agent_extensions: config.user_agent_extensions,
            api_base_url: config.api_base_url,
            messaging_base_url: config.messaging_base_url,
        }
    }

    /// The account requests act on.
    #[must_use]
    pub fn account_sid(&self) -> Option<&str> {
        self.account_sid.as_deref()
    }

    /// The credential provider in use.
    #[must_use]
    pub fn credential_provider(&self) -> &Arc<dyn CredentialProvider> {
        &self.provider
    }

    /// The transport requests are sent through.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Configured routing region.
    #[must_use]
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// Configured routing edge.
    #[must_use]
    pub fn edge(&self) -> Option<&str> {
        self.edge.as_deref()
    }

    /// Rewrite `uri` for the configured edge and region.
    #[must_use]
    pub fn hostname(&self, uri: &str) -> String {
        resolve_hostname(uri, self.edge(), self.region())
    }

    /// Programmable Messaging: messages.
    #[must_use]
    pub fn messages(&self) -> Messages<'_, T> {
        Messages::new(self)
    }

    /// Programmable Voice: calls.
    #[must_use]
    pub fn calls(&self) -> Calls<'_, T> {
        Calls::new(self)
    }

    /// Messaging v1 API.
    #[must_use]
    pub fn messaging(&self) -> Messaging<'_, T> {
        Messaging::new(self)
    }

    pub(crate) fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    pub(crate) fn messaging_base_url(&self) -> &str {
        &self.messaging_base_url
    }

    pub(crate) fn require_account_sid(&self) -> Result<&str> {
        self.account_sid().ok_or_else(|| {
            TwilioError::Configuration("an account SID is required for this resource".to_string())
        })
    }

    fn user_agent(&self) -> String {
        let mut agent = format!(
            "twilio-rust/{} ({} {})",
            env!("CARGO_PKG_VERSION"),
            std::env::consts::OS,
            std::env::consts::ARCH
        );
        for extension in &self.user_agent_extensions {
            agent.push(' ');
            agent.push_str(extension);
        }
        agent
    }

    /// Send a request without interpreting the response status.
    ///
    /// The hostname is resolved for the configured edge and region, the auth
    /// strategy supplies credentials, and the standard headers are added.
    ///
    /// # Arguments
    ///
    /// * `request` - Method, absolute URL, query, form data and extra headers
    ///
    /// # Returns
    ///
    /// The raw response, including error statuses and all response headers.
    ///
    /// # Errors
    ///
    /// Returns an error if credentials cannot be obtained or the transport fails.
    pub async fn request(&self, mut request: ApiRequest) -> Result<ApiResponse> {
        request.url = self.hostname(&request.url);

        request
            .headers
            .push(("User-Agent".to_string(), self.user_agent()));
        request.headers.push((
            "X-Twilio-Client".to_string(),
            format!("rust-{}", env!("CARGO_PKG_VERSION")),
        ));
        request
            .headers
            .push(("Accept-Charset".to_string(), "utf-8".to_string()));
        if request.method == Method::POST
            && !request
                .headers
                .iter()
                .any(|(k, _)| k.eq_ignore_ascii_case("Content-Type"))
        {
            request
                .headers
                .push(("Content-Type".to_string(), FORM_CONTENT_TYPE.to_string()));
        }
        if !request
            .headers
            .iter()
            .any(|(k, _)| k.eq_ignore_ascii_case("Accept"))
        {
            request
                .headers
                .push(("Accept".to_string(), "application/json".to_string()));
        }

        let strategy = self.provider.to_auth_strategy();
        request.auth = Some(strategy.authorize().await?);

        debug!(
            method = %request.method,
            url = %request.url,
            auth = ?strategy.auth_type(),
            "Sending Twilio request"
        );

        let response = self.transport.send(request).await?;

        debug!(status = response.status, "Received Twilio response");
        Ok(response)
    }

    /// GET `uri` and return the payload with its response headers.
    ///
    /// # Errors
    ///
    /// Returns [`TwilioError::Rest`] for error statuses, or a transport or
    /// deserialization error.
    pub async fn fetch_with_headers<P: DeserializeOwned>(
        &self,
        uri: &str,
    ) -> Result<(P, ResponseHeaders)> {
        self.send_expecting(ApiRequest::new(Method::GET, uri)).await
    }

    /// POST `data` to a list `uri` and return the created payload with its headers.
    ///
    /// # Errors
    ///
    /// Returns [`TwilioError::Rest`] for error statuses, or a transport or
    /// deserialization error.
    pub async fn create_with_headers<P: DeserializeOwned>(
        &self,
        uri: &str,
        data: Vec<(String, String)>,
    ) -> Result<(P, ResponseHeaders)> {
        self.send_expecting(ApiRequest::new(Method::POST, uri).with_data(data))
            .await
    }

    /// POST `data` to an instance `uri` and return the updated payload with its headers.
    ///
    /// # Arguments
    ///
    /// * `uri` - Absolute instance URL
    /// * `data` - Form fields to update
    /// * `headers` - Preconditions such as `If-Match`
    ///
    /// # Returns
    ///
    /// The updated payload and the response headers, whose `ETag` can be
    /// passed back on the next update.
    ///
    /// # Errors
    ///
    /// Returns [`TwilioError::Rest`] for error statuses, or a transport or
    /// deserialization error.
    pub async fn update_with_headers<P: DeserializeOwned>(
        &self,
        uri: &str,
        data: Vec<(String, String)>,
        headers: Vec<(String, String)>,
    ) -> Result<(P, ResponseHeaders)> {
        let mut request = ApiRequest::new(Method::POST, uri).with_data(data);
        request.headers = headers;
        self.send_expecting(request).await
    }

    async fn send_expecting<P: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<(P, ResponseHeaders)> {
        let method = request.method.to_string();
        let uri = request.url.clone();
        let response = self.request(request).await?;

        if !response.is_success() {
            return Err(rest_error(&method, &uri, &response));
        }

        let payload = response.json()?;
        Ok((payload, response.headers))
    }
}

// ============================================================================
// Error mapping
// ============================================================================

/// Build a [`TwilioError::Rest`] from an error response.
///
/// Falls back to `HTTP <status>` when the body is not a Twilio error document.
fn rest_error(method: &str, uri: &str, response: &ApiResponse) -> TwilioError {
    let body: Option<RestErrorBody> = serde_json::from_str(&response.body).ok();
    let (code, message, more_info) = match body {
        Some(body) => (
            body.code,
            body.message
                .unwrap_or_else(|| format!("HTTP {}", response.status)),
            body.more_info,
        ),
        None => (None, format!("HTTP {}", response.status), None),
    };

    TwilioError::Rest {
        status: response.status,
        method: method.to_string(),
        uri: uri.to_string(),
        code,
        message,
        more_info,
    }
}
