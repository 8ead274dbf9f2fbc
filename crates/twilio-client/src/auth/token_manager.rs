use std::fmt;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::{DecodingKey, Validation};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{error, info};

use crate::error::{Result, TwilioError};

/// OAuth token endpoint for organization credentials.
pub const DEFAULT_TOKEN_URL: &str = "https://preview-iam.twilio.com/v1/token";

const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(30);

/// Source of bearer tokens.
#[async_trait]
pub trait TokenManager: Send + Sync + fmt::Debug {
    /// Return a valid access token, fetching a new one if needed.
    async fn fetch_access_token(&self) -> Result<String>;
}

struct CachedToken {
    token: String,
    refresh_at: Instant,
}

impl CachedToken {
    fn is_stale(&self) -> bool {
        Instant::now() >= self.refresh_at
    }
}

impl fmt::Debug for CachedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedToken")
            .field("refresh_at", &self.refresh_at)
            .finish_non_exhaustive()
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[derive(Deserialize)]
struct ExpiryClaims {
    exp: Option<i64>,
}

/// Client-credentials token manager for Twilio organizations.
pub struct OrgTokenManager {
    http: Client,
    token_url: String,
    client_id: String,
    client_secret: SecretString,
    cache: RwLock<Option<CachedToken>>,
}

impl OrgTokenManager {
    /// Create a manager for the given client credentials.
    #[must_use]
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            client_id: client_id.into(),
            client_secret: SecretString::from(client_secret.into()),
            cache: RwLock::new(None),
        }
    }

    /// Use a different token endpoint.
    #[must_use]
    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    /// Use a preconfigured HTTP client.
    #[must_use]
    pub fn with_http_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }

    async fn request_token(&self) -> Result<TokenResponse> {
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.expose_secret()),
        ];

        let response = self.http.post(&self.token_url).form(&form).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Token request rejected");
            return Err(TwilioError::Token(format!(
                "token endpoint returned {status}"
            )));
        }

        response
            .json::<TokenResponse>()
            .await
            .map_err(|e| TwilioError::Token(format!("invalid token response: {e}")))
    }
}

/// Seconds until the token's `exp` claim, read without verifying the signature.
fn jwt_lifetime(token: &str) -> Option<Duration> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data =
        jsonwebtoken::decode::<ExpiryClaims>(token, &DecodingKey::from_secret(&[]), &validation)
            .ok()?;
    let remaining = data.claims.exp? - chrono::Utc::now().timestamp();
    u64::try_from(remaining).ok().map(Duration::from_secs)
}

#[async_trait]
impl TokenManager for OrgTokenManager {
    async fn fetch_access_token(&self) -> Result<String> {
        if let Some(cached) = self.cache.read().await.as_ref() {
            if !cached.is_stale() {
                return Ok(cached.token.clone());
            }
        }

        let mut cache = self.cache.write().await;
        // Another task may have refreshed while we waited for the lock.
        if let Some(cached) = cache.as_ref() {
            if !cached.is_stale() {
                return Ok(cached.token.clone());
            }
        }

        let response = self.request_token().await?;
        let lifetime = response
            .expires_in
            .map(Duration::from_secs)
            .or_else(|| jwt_lifetime(&response.access_token));

        info!(
            client_id = %self.client_id,
            expires_in = ?lifetime.map(|d| d.as_secs()),
            "Obtained access token"
        );

        *cache = lifetime
            .and_then(|ttl| ttl.checked_sub(TOKEN_REFRESH_MARGIN))
            .map(|ttl| CachedToken {
                token: response.access_token.clone(),
                refresh_at: Instant::now() + ttl,
            });

        Ok(response.access_token)
    }
}

impl fmt::Debug for OrgTokenManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrgTokenManager")
            .field("token_url", &self.token_url)
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header};
    use serde::Serialize;

    #[derive(Serialize)]
    struct Claims {
        exp: i64,
        sub: &'static str,
    }

    #[test]
    fn jwt_lifetime_reads_exp() {
        let exp = chrono::Utc::now().timestamp() + 3600;
        let token = jsonwebtoken::encode(
            &Header::default(),
            &Claims { exp, sub: "client" },
            &EncodingKey::from_secret(b"anything"),
        )
        .unwrap();

        let lifetime = jwt_lifetime(&token).unwrap();
        assert!(lifetime > Duration::from_secs(3500));
        assert!(lifetime <= Duration::from_secs(3600));
    }

    #[test]
    fn jwt_lifetime_ignores_garbage_and_past_tokens() {
        assert!(jwt_lifetime("not-a-jwt").is_none());

        let token = jsonwebtoken::encode(
            &Header::default(),
            &Claims {
                exp: chrono::Utc::now().timestamp() - 10,
                sub: "client",
            },
            &EncodingKey::from_secret(b"anything"),
        )
        .unwrap();
        assert!(jwt_lifetime(&token).is_none());
    }

    #[test]
    fn debug_hides_secret() {
        let manager = OrgTokenManager::new("client", "very-secret");
        let rendered = format!("{manager:?}");
        assert!(rendered.contains("client"));
        assert!(!rendered.contains("very-secret"));
    }
}
