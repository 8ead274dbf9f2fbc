use serde::{Deserialize, Serialize};
use twilio_core::Resource;

use super::{push_opt, API_VERSION};
use crate::error::Result;
use crate::http::HttpTransport;
use crate::TwilioClient;

/// A call resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Call {
    /// Call SID (`CA...`).
    pub sid: String,
    /// Owning account.
    pub account_sid: Option<String>,
    /// Caller.
    pub from: Option<String>,
    /// Callee.
    pub to: Option<String>,
    /// Call status, e.g. `queued` or `completed`.
    pub status: Option<String>,
    /// `inbound`, `outbound-api`, ...
    pub direction: Option<String>,
    /// RFC 2822 creation timestamp.
    pub date_created: Option<String>,
    /// RFC 2822 update timestamp.
    pub date_updated: Option<String>,
    /// RFC 2822 start timestamp.
    pub start_time: Option<String>,
    /// RFC 2822 end timestamp.
    pub end_time: Option<String>,
    /// Duration in seconds.
    pub duration: Option<String>,
    /// Price as a decimal string.
    pub price: Option<String>,
    /// Currency of `price`.
    pub price_unit: Option<String>,
    /// API version that handled the request.
    pub api_version: Option<String>,
    /// Relative URI of this resource.
    pub uri: Option<String>,
    /// Relative URIs of sub-resources.
    pub subresource_uris: Option<serde_json::Value>,
}

/// Parameters for placing a call.
#[derive(Debug, Clone, Default)]
pub struct CreateCall {
    to: String,
    from: String,
    url: Option<String>,
    twiml: Option<String>,
    application_sid: Option<String>,
    status_callback: Option<String>,
}

impl CreateCall {
    /// Call from `from` to `to`.
    ///
    /// Call instructions (`url`, `twiml` or an application) must also be set.
    #[must_use]
    pub fn new(to: impl Into<String>, from: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            from: from.into(),
            ..Self::default()
        }
    }

    /// URL returning TwiML instructions.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Inline TwiML instructions.
    #[must_use]
    pub fn with_twiml(mut self, twiml: impl Into<String>) -> Self {
        self.twiml = Some(twiml.into());
        self
    }

    /// TwiML application SID.
    #[must_use]
    pub fn with_application_sid(mut self, sid: impl Into<String>) -> Self {
        self.application_sid = Some(sid.into());
        self
    }

    /// URL notified on status changes.
    #[must_use]
    pub fn with_status_callback(mut self, url: impl Into<String>) -> Self {
        self.status_callback = Some(url.into());
        self
    }

    fn to_form(&self) -> Vec<(String, String)> {
        let mut form = vec![
            ("To".to_string(), self.to.clone()),
            ("From".to_string(), self.from.clone()),
        ];
        push_opt(&mut form, "Url", self.url.as_deref());
        push_opt(&mut form, "Twiml", self.twiml.as_deref());
        push_opt(&mut form, "ApplicationSid", self.application_sid.as_deref());
        push_opt(&mut form, "StatusCallback", self.status_callback.as_deref());
        form
    }
}

/// Call operations for the client's account.
#[derive(Debug)]
pub struct Calls<'a, T: HttpTransport> {
    client: &'a TwilioClient<T>,
}

impl<'a, T: HttpTransport> Calls<'a, T> {
    pub(crate) fn new(client: &'a TwilioClient<T>) -> Self {
        Self { client }
    }

    /// Place a call.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects it.
    pub async fn create(&self, params: CreateCall) -> Result<Resource<Call>> {
        let uri = format!(
            "{}/{API_VERSION}/Accounts/{}/Calls.json",
            self.client.api_base_url(),
            self.client.require_account_sid()?
        );
        let (call, headers) = self
            .client
            .create_with_headers(&uri, params.to_form())
            .await?;
        Ok(Resource::new(call, headers))
    }

    /// Fetch a call by SID.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the call does not exist.
    pub async fn fetch(&self, sid: &str) -> Result<Resource<Call>> {
        let uri = format!(
            "{}/{API_VERSION}/Accounts/{}/Calls/{sid}.json",
            self.client.api_base_url(),
            self.client.require_account_sid()?
        );
        let (call, headers) = self.client.fetch_with_headers(&uri).await?;
        Ok(Resource::new(call, headers))
    }
}
