//! Credential types.
//!
//! A [`Credential`] is the raw material an auth strategy is built from. It is
//! immutable once constructed; secrets are kept in [`SecretString`] so they
//! never show up in `Debug` output or logs.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// How outgoing requests authenticate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthType {
    /// HTTP basic credentials (account SID + token, or API key + secret).
    Basic,
    /// OAuth client-credentials flow producing a bearer token.
    ClientCredentials,
}

/// A set of credentials for the Twilio API.
#[derive(Debug)]
pub enum Credential {
    /// Account SID and auth token.
    AccountToken {
        /// Account SID (`AC...`).
        account_sid: String,
        /// Auth token.
        auth_token: SecretString,
    },
    /// API key and secret, scoped to an account.
    ApiKey {
        /// API key SID (`SK...`).
        api_key: String,
        /// API key secret.
        api_secret: SecretString,
        /// Account the key belongs to.
        account_sid: String,
    },
    /// OAuth client id and secret.
    ClientCredentials {
        /// OAuth client id.
        client_id: String,
        /// OAuth client secret.
        client_secret: SecretString,
    },
}

impl Credential {
    /// Create an account SID + auth token credential.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MissingCredential`] if either value is empty.
    pub fn account_token(
        account_sid: impl Into<String>,
        auth_token: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self::AccountToken {
            account_sid: non_empty(account_sid.into(), "account_sid")?,
            auth_token: SecretString::from(non_empty(auth_token.into(), "auth_token")?),
        })
    }

    /// Create an API key + secret credential.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MissingCredential`] if any value is empty.
    pub fn api_key(
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        account_sid: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self::ApiKey {
            api_key: non_empty(api_key.into(), "api_key")?,
            api_secret: SecretString::from(non_empty(api_secret.into(), "api_secret")?),
            account_sid: non_empty(account_sid.into(), "account_sid")?,
        })
    }

    /// Create an OAuth client-credentials credential.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MissingCredential`] if either value is empty.
    pub fn client_credentials(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self::ClientCredentials {
            client_id: non_empty(client_id.into(), "client_id")?,
            client_secret: SecretString::from(non_empty(client_secret.into(), "client_secret")?),
        })
    }

    /// The authentication mechanism this credential maps to.
    #[must_use]
    pub fn auth_type(&self) -> AuthType {
        match self {
            Self::AccountToken { .. } | Self::ApiKey { .. } => AuthType::Basic,
            Self::ClientCredentials { .. } => AuthType::ClientCredentials,
        }
    }

    /// Basic-auth `(username, password)` pair, if this is a basic credential.
    #[must_use]
    pub fn basic_pair(&self) -> Option<(&str, &str)> {
        match self {
            Self::AccountToken {
                account_sid,
                auth_token,
            } => Some((account_sid.as_str(), auth_token.expose_secret())),
            Self::ApiKey {
                api_key,
                api_secret,
                ..
            } => Some((api_key.as_str(), api_secret.expose_secret())),
            Self::ClientCredentials { .. } => None,
        }
    }

    /// The account the credential acts on, when known.
    #[must_use]
    pub fn account_sid(&self) -> Option<&str> {
        match self {
            Self::AccountToken { account_sid, .. } | Self::ApiKey { account_sid, .. } => {
                Some(account_sid.as_str())
            }
            Self::ClientCredentials { .. } => None,
        }
    }
}

fn non_empty(value: String, field: &'static str) -> Result<String> {
    if value.is_empty() {
        Err(CoreError::MissingCredential(field))
    } else {
        Ok(value)
    }
}
