//! Client configuration.

use std::fmt;
use std::sync::Arc;

use crate::auth::CredentialProvider;

/// Default REST API base URL.
pub const DEFAULT_API_BASE_URL: &str = "https://api.twilio.com";

/// Default Messaging API base URL.
pub const DEFAULT_MESSAGING_BASE_URL: &str = "https://messaging.twilio.com";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Configuration for [`TwilioClient`](crate::TwilioClient).
#[derive(Clone)]
pub struct ClientConfig {
    /// Account SID (default: `TWILIO_ACCOUNT_SID`).
    pub account_sid: Option<String>,

    /// Auth token (default: `TWILIO_AUTH_TOKEN`).
    pub auth_token: Option<String>,

    /// API key SID, used as the basic-auth username when set.
    pub api_key: Option<String>,

    /// API key secret.
    pub api_secret: Option<String>,

    /// Routing region, e.g. `au1`.
    pub region: Option<String>,

    /// Routing edge, e.g. `sydney`.
    pub edge: Option<String>,

    /// Extra tokens appended to the `User-Agent` header.
    pub user_agent_extensions: Vec<String>,

    /// Request timeout in seconds.
    pub timeout_seconds: u64,

    /// Base URL for the 2010-04-01 REST API.
    pub api_base_url: String,

    /// Base URL for the Messaging v1 API.
    pub messaging_base_url: String,

    /// Provider that takes precedence over basic credentials.
    pub credential_provider: Option<Arc<dyn CredentialProvider>>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            account_sid: None,
            auth_token: None,
            api_key: None,
            api_secret: None,
            region: None,
            edge: None,
            user_agent_extensions: Vec::new(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            messaging_base_url: DEFAULT_MESSAGING_BASE_URL.to_string(),
            credential_provider: None,
        }
    }
}

impl ClientConfig {
    /// Configuration for an account SID and auth token.
    #[must_use]
    pub fn new(account_sid: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            account_sid: Some(account_sid.into()),
            auth_token: Some(auth_token.into()),
            ..Self::default()
        }
    }

    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            account_sid: env_opt("TWILIO_ACCOUNT_SID"),
            auth_token: env_opt("TWILIO_AUTH_TOKEN"),
            api_key: env_opt("TWILIO_API_KEY"),
            api_secret: env_opt("TWILIO_API_SECRET"),
            region: env_opt("TWILIO_REGION"),
            edge: env_opt("TWILIO_EDGE"),
            user_agent_extensions: std::env::var("TWILIO_USER_AGENT_EXTENSIONS")
                .map(|s| {
                    s.split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
            timeout_seconds: std::env::var("TWILIO_TIMEOUT_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECONDS),
            ..Self::default()
        }
    }

    /// Authenticate with an API key and secret instead of the auth token.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self.api_secret = Some(api_secret.into());
        self
    }

    /// Set the account SID.
    #[must_use]
    pub fn with_account_sid(mut self, account_sid: impl Into<String>) -> Self {
        self.account_sid = Some(account_sid.into());
        self
    }

    /// Set the routing region.
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set the routing edge.
    #[must_use]
    pub fn with_edge(mut self, edge: impl Into<String>) -> Self {
        self.edge = Some(edge.into());
        self
    }

    /// Append a `User-Agent` extension.
    #[must_use]
    pub fn with_user_agent_extension(mut self, extension: impl Into<String>) -> Self {
        self.user_agent_extensions.push(extension.into());
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Override the REST API base URL.
    #[must_use]
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the Messaging API base URL.
    #[must_use]
    pub fn with_messaging_base_url(mut self, url: impl Into<String>) -> Self {
        self.messaging_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Authenticate through `provider` instead of basic credentials.
    #[must_use]
    pub fn with_credential_provider(mut self, provider: Arc<dyn CredentialProvider>) -> Self {
        self.credential_provider = Some(provider);
        self
    }

    /// Basic-auth username: the API key if set, else the account SID.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.api_key.as_deref().or(self.account_sid.as_deref())
    }

    /// Basic-auth password: the API secret if set, else the auth token.
    #[must_use]
    pub fn password(&self) -> Option<&str> {
        self.api_secret.as_deref().or(self.auth_token.as_deref())
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("ClientConfig")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &redact(&self.auth_token))
            .field("api_key", &self.api_key)
            .field("api_secret", &redact(&self.api_secret))
            .field("region", &self.region)
            .field("edge", &self.edge)
            .field("user_agent_extensions", &self.user_agent_extensions)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("api_base_url", &self.api_base_url)
            .field("messaging_base_url", &self.messaging_base_url)
            .field("credential_provider", &self.credential_provider)
            .finish()
    }
}

fn env_opt(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_key_takes_precedence_for_basic_auth() {
        let config = ClientConfig::new("ACxxx", "token").with_api_key("SKxxx", "secret");
        assert_eq!(config.username(), Some("SKxxx"));
        assert_eq!(config.password(), Some("secret"));
        assert_eq!(config.account_sid.as_deref(), Some("ACxxx"));
    }

    #[test]
    fn defaults_point_at_production() {
        let config = ClientConfig::default();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.messaging_base_url, DEFAULT_MESSAGING_BASE_URL);
        assert_eq!(config.timeout_seconds, DEFAULT_TIMEOUT_SECONDS);
    }

    #[test]
    fn base_url_overrides_drop_trailing_slash() {
        let config = ClientConfig::default().with_api_base_url("http://127.0.0.1:9000/");
        assert_eq!(config.api_base_url, "http://127.0.0.1:9000");
    }

    #[test]
    fn debug_redacts_secrets() {
        let config = ClientConfig::new("ACxxx", "tok3n").with_api_key("SKxxx", "s3cret");
        let rendered = format!("{config:?}");
        assert!(rendered.contains("ACxxx"));
        assert!(!rendered.contains("tok3n"));
        assert!(!rendered.contains("s3cret"));
    }
}
