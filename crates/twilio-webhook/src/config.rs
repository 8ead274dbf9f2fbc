//! Receiver configuration.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};

/// Default listen address.
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";

/// Default maximum request body size in bytes (1 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Default request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;

/// Webhook receiver configuration loaded from environment variables.
#[derive(Clone)]
pub struct WebhookConfig {
    /// Auth token used to verify signatures.
    pub auth_token: SecretString,

    /// Address to listen on (default: "0.0.0.0:8080").
    pub listen_addr: String,

    /// Public origin (`https://hooks.example.com`) the provider calls.
    ///
    /// When set, the signed URL is rebuilt from this instead of the
    /// request's `Host` and forwarding headers.
    pub public_base_url: Option<String>,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,

    /// Request timeout in seconds.
    pub request_timeout_seconds: u64,
}

impl WebhookConfig {
    /// Configuration with defaults for everything but the auth token.
    #[must_use]
    pub fn new(auth_token: impl Into<String>) -> Self {
        Self {
            auth_token: SecretString::from(auth_token.into()),
            listen_addr: DEFAULT_LISTEN_ADDR.into(),
            public_base_url: None,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECONDS,
        }
    }

    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            auth_token: SecretString::from(std::env::var("TWILIO_AUTH_TOKEN").unwrap_or_default()),
            listen_addr: std::env::var("LISTEN_ADDR").unwrap_or_else(|_| DEFAULT_LISTEN_ADDR.into()),
            public_base_url: std::env::var("PUBLIC_BASE_URL")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(|s| trim_origin(&s)),
            max_body_bytes: std::env::var("MAX_BODY_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MAX_BODY_BYTES),
            request_timeout_seconds: std::env::var("REQUEST_TIMEOUT_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECONDS),
        }
    }

    /// Whether an auth token is configured.
    #[must_use]
    pub fn has_auth_token(&self) -> bool {
        !self.auth_token.expose_secret().is_empty()
    }

    /// Set the listen address.
    #[must_use]
    pub fn with_listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.listen_addr = addr.into();
        self
    }

    /// Set the public origin used to rebuild signed URLs.
    #[must_use]
    pub fn with_public_base_url(mut self, url: impl AsRef<str>) -> Self {
        self.public_base_url = Some(trim_origin(url.as_ref()));
        self
    }

    /// Set the maximum request body size.
    #[must_use]
    pub fn with_max_body_bytes(mut self, bytes: usize) -> Self {
        self.max_body_bytes = bytes;
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_request_timeout_seconds(mut self, seconds: u64) -> Self {
        self.request_timeout_seconds = seconds;
        self
    }
}

fn trim_origin(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

impl fmt::Debug for WebhookConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookConfig")
            .field("auth_token", &"[REDACTED]")
            .field("listen_addr", &self.listen_addr)
            .field("public_base_url", &self.public_base_url)
            .field("max_body_bytes", &self.max_body_bytes)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_uses_defaults() {
        let config = WebhookConfig::new("token");
        assert_eq!(config.listen_addr, DEFAULT_LISTEN_ADDR);
        assert_eq!(config.max_body_bytes, 1024 * 1024);
        assert_eq!(config.request_timeout_seconds, 30);
        assert!(config.public_base_url.is_none());
        assert!(config.has_auth_token());
        assert!(!WebhookConfig::new("").has_auth_token());
    }

    #[test]
    fn public_base_url_drops_trailing_slash() {
        let config = WebhookConfig::new("token").with_public_base_url("https://hooks.example.com/");
        assert_eq!(
            config.public_base_url.as_deref(),
            Some("https://hooks.example.com")
        );
    }

    #[test]
    fn debug_redacts_token() {
        let debug = format!("{:?}", WebhookConfig::new("super-secret"));
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
