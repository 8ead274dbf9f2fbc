//! Messaging link-shortening domain configuration.
//!
//! The only resource here that supports conditional updates: pass the ETag of
//! a previous fetch to [`UpdateDomainConfig::with_if_match`] and the update
//! fails if the configuration changed in between.

use serde::{Deserialize, Serialize};
use twilio_core::Resource;

use super::push_opt;
use crate::error::Result;
use crate::http::HttpTransport;
use crate::TwilioClient;

/// Configuration of a link-shortening domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainConfig {
    /// Domain SID (`DN...`).
    pub domain_sid: String,
    /// Configuration SID.
    pub config_sid: Option<String>,
    /// Fallback URL when a shortened link cannot be resolved.
    pub fallback_url: Option<String>,
    /// URL notified on link clicks.
    pub callback_url: Option<String>,
    /// Whether to redirect to the fallback URL on failure.
    pub continue_on_failure: Option<bool>,
    /// Whether HTTPS is disabled for shortened links.
    pub disable_https: Option<bool>,
    /// ISO 8601 creation timestamp.
    pub date_created: Option<String>,
    /// ISO 8601 update timestamp.
    pub date_updated: Option<String>,
    /// Absolute URL of this resource.
    pub url: Option<String>,
}

/// Parameters for updating a domain configuration.
#[derive(Debug, Clone, Default)]
pub struct UpdateDomainConfig {
    fallback_url: Option<String>,
    callback_url: Option<String>,
    continue_on_failure: Option<bool>,
    disable_https: Option<bool>,
    if_match: Option<String>,
}

impl UpdateDomainConfig {
    /// An update that changes nothing yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fallback URL.
    #[must_use]
    pub fn with_fallback_url(mut self, url: impl Into<String>) -> Self {
        self.fallback_url = Some(url.into());
        self
    }

    /// Set the click callback URL.
    #[must_use]
    pub fn with_callback_url(mut self, url: impl Into<String>) -> Self {
        self.callback_url = Some(url.into());
        self
    }

    /// Set whether to continue on failure.
    #[must_use]
    pub fn with_continue_on_failure(mut self, value: bool) -> Self {
        self.continue_on_failure = Some(value);
        self
    }

    /// Set whether HTTPS is disabled.
    #[must_use]
    pub fn with_disable_https(mut self, value: bool) -> Self {
        self.disable_https = Some(value);
        self
    }

    /// Only apply the update if the resource still has this ETag.
    #[must_use]
    pub fn with_if_match(mut self, etag: impl Into<String>) -> Self {
        self.if_match = Some(etag.into());
        self
    }

    fn to_form(&self) -> Vec<(String, String)> {
        let mut form = Vec::new();
        push_opt(&mut form, "FallbackUrl", self.fallback_url.as_deref());
        push_opt(&mut form, "CallbackUrl", self.callback_url.as_deref());
        if let Some(value) = self.continue_on_failure {
            form.push(("ContinueOnFailure".to_string(), value.to_string()));
        }
        if let Some(value) = self.disable_https {
            form.push(("DisableHttps".to_string(), value.to_string()));
        }
        form
    }

    fn to_headers(&self) -> Vec<(String, String)> {
        self.if_match
            .iter()
            .map(|etag| ("If-Match".to_string(), etag.clone()))
            .collect()
    }
}

/// Messaging v1 API.
#[derive(Debug)]
pub struct Messaging<'a, T: HttpTransport> {
    client: &'a TwilioClient<T>,
}

impl<'a, T: HttpTransport> Messaging<'a, T> {
    pub(crate) fn new(client: &'a TwilioClient<T>) -> Self {
        Self { client }
    }

    /// Configuration of the link-shortening domain `domain_sid`.
    #[must_use]
    pub fn domain_config(&self, domain_sid: impl Into<String>) -> DomainConfigContext<'a, T> {
        DomainConfigContext {
            client: self.client,
            domain_sid: domain_sid.into(),
        }
    }
}

/// Operations on one domain configuration.
#[derive(Debug)]
pub struct DomainConfigContext<'a, T: HttpTransport> {
    client: &'a TwilioClient<T>,
    domain_sid: String,
}

impl<T: HttpTransport> DomainConfigContext<'_, T> {
    fn uri(&self) -> String {
        format!(
            "{}/v1/LinkShortening/Domains/{}/Config",
            self.client.messaging_base_url(),
            self.domain_sid
        )
    }

    /// Fetch the configuration together with its ETag.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the domain does not exist.
    pub async fn fetch(&self) -> Result<Resource<DomainConfig>> {
        let (config, headers) = self.client.fetch_with_headers(&self.uri()).await?;
        Ok(Resource::new(config, headers))
    }

    /// Update the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, or the API rejects it (for
    /// example with HTTP 412 when an `If-Match` precondition fails).
    pub async fn update(&self, params: UpdateDomainConfig) -> Result<Resource<DomainConfig>> {
        let (config, headers) = self
            .client
            .update_with_headers(&self.uri(), params.to_form(), params.to_headers())
            .await?;
        Ok(Resource::new(config, headers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn if_match_becomes_a_header_not_a_field() {
        let update = UpdateDomainConfig::new()
            .with_fallback_url("https://example.com")
            .with_continue_on_failure(true)
            .with_if_match("\"etag-1\"");

        let form = update.to_form();
        assert!(form.contains(&("FallbackUrl".to_string(), "https://example.com".to_string())));
        assert!(form.contains(&("ContinueOnFailure".to_string(), "true".to_string())));
        assert!(!form.iter().any(|(k, _)| k == "If-Match"));

        assert_eq!(
            update.to_headers(),
            vec![("If-Match".to_string(), "\"etag-1\"".to_string())]
        );
    }

    #[test]
    fn no_if_match_means_no_headers() {
        assert!(UpdateDomainConfig::new().to_headers().is_empty());
    }
}
