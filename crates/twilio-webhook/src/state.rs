//! Receiver state.

use secrecy::ExposeSecret;

use crate::config::WebhookConfig;
use crate::validator::RequestValidator;

/// State shared by the signature middleware and handlers.
#[derive(Debug)]
pub struct WebhookState {
    /// Receiver configuration.
    pub config: WebhookConfig,

    /// Validator keyed with the configured auth token.
    pub validator: RequestValidator,
}

impl WebhookState {
    /// Build state from configuration.
    #[must_use]
    pub fn new(config: WebhookConfig) -> Self {
        let validator = RequestValidator::new(config.auth_token.expose_secret());
        Self { config, validator }
    }
}
