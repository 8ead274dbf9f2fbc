use std::fmt;
use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use twilio_core::AuthType;

use super::TokenManager;
use crate::error::Result;
use crate::http::RequestAuth;

/// How a client authenticates its outgoing requests.
#[derive(Debug)]
pub enum AuthStrategy {
    /// HTTP basic credentials.
    Basic {
        /// Account SID or API key.
        username: String,
        /// Auth token or API secret.
        password: SecretString,
    },
    /// Bearer token obtained from a token manager.
    Token(TokenAuth),
}

impl AuthStrategy {
    /// Basic strategy for a username and password.
    #[must_use]
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }

    /// Token strategy backed by `manager`.
    #[must_use]
    pub fn token(manager: Arc<dyn TokenManager>) -> Self {
        Self::Token(TokenAuth::new(manager))
    }

    /// The mechanism this strategy implements.
    #[must_use]
    pub fn auth_type(&self) -> AuthType {
        match self {
            Self::Basic { .. } => AuthType::Basic,
            Self::Token(_) => AuthType::ClientCredentials,
        }
    }

    /// Credentials to attach to the next request.
    ///
    /// # Errors
    ///
    /// Returns an error if a bearer token cannot be obtained.
    pub async fn authorize(&self) -> Result<RequestAuth> {
        match self {
            Self::Basic { username, password } => Ok(RequestAuth::Basic {
                username: username.clone(),
                password: password.expose_secret().to_string(),
            }),
            Self::Token(auth) => auth.authorize().await,
        }
    }
}

/// Bearer-token authentication.
#[derive(Clone)]
pub struct TokenAuth {
    manager: Arc<dyn TokenManager>,
}

impl TokenAuth {
    /// Wrap a token manager.
    #[must_use]
    pub fn new(manager: Arc<dyn TokenManager>) -> Self {
        Self { manager }
    }

    /// The underlying token manager.
    #[must_use]
    pub fn manager(&self) -> &Arc<dyn TokenManager> {
        &self.manager
    }

    async fn authorize(&self) -> Result<RequestAuth> {
        let token = self.manager.fetch_access_token().await?;
        Ok(RequestAuth::Bearer(token))
    }
}

impl fmt::Debug for TokenAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenAuth").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    #[derive(Debug)]
    struct StaticToken(&'static str);

    #[async_trait]
    impl TokenManager for StaticToken {
        async fn fetch_access_token(&self) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    #[tokio::test]
    async fn basic_strategy_yields_basic_credentials() {
        let strategy = AuthStrategy::basic("ACxxx", "token");
        assert_eq!(strategy.auth_type(), AuthType::Basic);
        assert_eq!(
            strategy.authorize().await.unwrap(),
            RequestAuth::Basic {
                username: "ACxxx".into(),
                password: "token".into(),
            }
        );
    }

    #[tokio::test]
    async fn token_strategy_yields_bearer() {
        let strategy = AuthStrategy::token(Arc::new(StaticToken("jwt")));
        assert_eq!(strategy.auth_type(), AuthType::ClientCredentials);
        assert_eq!(
            strategy.authorize().await.unwrap(),
            RequestAuth::Bearer("jwt".into())
        );
    }

    #[test]
    fn debug_hides_password() {
        let strategy = AuthStrategy::basic("ACxxx", "hunter2");
        assert!(!format!("{strategy:?}").contains("hunter2"));
    }
}
