use std::fmt;
use std::sync::{Arc, OnceLock};

use secrecy::{ExposeSecret, SecretString};
use twilio_core::{AuthType, Credential};

use super::{AuthStrategy, OrgTokenManager, TokenManager, DEFAULT_TOKEN_URL};
use crate::error::{Result, TwilioError};

/// Supplies the auth strategy a client uses.
pub trait CredentialProvider: Send + Sync + fmt::Debug {
    /// The mechanism this provider produces.
    fn auth_type(&self) -> AuthType;

    /// The strategy for outgoing requests.
    ///
    /// Repeated calls return the same instance.
    fn to_auth_strategy(&self) -> &AuthStrategy;
}

/// Basic-auth provider for account tokens and API keys.
#[derive(Debug)]
pub struct BasicCredentialProvider {
    strategy: AuthStrategy,
}

impl BasicCredentialProvider {
    /// Create a provider for `username` and `password`.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            strategy: AuthStrategy::basic(username, password),
        }
    }
}

impl CredentialProvider for BasicCredentialProvider {
    fn auth_type(&self) -> AuthType {
        AuthType::Basic
    }

    fn to_auth_strategy(&self) -> &AuthStrategy {
        &self.strategy
    }
}

/// OAuth client-credentials provider for organization APIs.
///
/// The token manager and strategy are built on first use and shared by every
/// later request through this provider.
pub struct OrgsCredentialProvider {
    client_id: String,
    client_secret: SecretString,
    token_url: String,
    token_manager: Option<Arc<dyn TokenManager>>,
    strategy: OnceLock<AuthStrategy>,
}

impl OrgsCredentialProvider {
    /// Create a provider for a client id and secret.
    ///
    /// # Errors
    ///
    /// Returns [`TwilioError::Configuration`] if either value is empty.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Result<Self> {
        let client_id = client_id.into();
        let client_secret = client_secret.into();
        if client_id.is_empty() || client_secret.is_empty() {
            return Err(TwilioError::Configuration(
                "Client id and Client secret are mandatory".to_string(),
            ));
        }

        Ok(Self {
            client_id,
            client_secret: SecretString::from(client_secret),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            token_manager: None,
            strategy: OnceLock::new(),
        })
    }

    /// Use `manager` instead of building an [`OrgTokenManager`].
    #[must_use]
    pub fn with_token_manager(mut self, manager: Arc<dyn TokenManager>) -> Self {
        self.token_manager = Some(manager);
        self
    }

    /// Token endpoint for the default token manager.
    #[must_use]
    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    /// OAuth client id.
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }
}

impl CredentialProvider for OrgsCredentialProvider {
    fn auth_type(&self) -> AuthType {
        AuthType::ClientCredentials
    }

    fn to_auth_strategy(&self) -> &AuthStrategy {
        self.strategy.get_or_init(|| {
            let manager: Arc<dyn TokenManager> = match &self.token_manager {
                Some(manager) => Arc::clone(manager),
                None => Arc::new(
                    OrgTokenManager::new(
                        self.client_id.clone(),
                        self.client_secret.expose_secret().to_string(),
                    )
                    .with_token_url(self.token_url.clone()),
                ),
            };
            AuthStrategy::token(manager)
        })
    }
}

impl fmt::Debug for OrgsCredentialProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrgsCredentialProvider")
            .field("client_id", &self.client_id)
            .field("token_url", &self.token_url)
            .field("resolved", &self.strategy.get().is_some())
            .finish_non_exhaustive()
    }
}

/// Build the provider matching a credential's kind.
///
/// # Errors
///
/// Returns [`TwilioError::Configuration`] if the credential is incomplete.
pub fn provider_for(credential: Credential) -> Result<Arc<dyn CredentialProvider>> {
    match credential {
        Credential::AccountToken {
            account_sid,
            auth_token,
        } => Ok(Arc::new(BasicCredentialProvider::new(
            account_sid,
            auth_token.expose_secret(),
        ))),
        Credential::ApiKey {
            api_key,
            api_secret,
            ..
        } => Ok(Arc::new(BasicCredentialProvider::new(
            api_key,
            api_secret.expose_secret(),
        ))),
        Credential::ClientCredentials {
            client_id,
            client_secret,
        } => Ok(Arc::new(OrgsCredentialProvider::new(
            client_id,
            client_secret.expose_secret(),
        )?)),
    }
}
