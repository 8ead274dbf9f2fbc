use serde::{Deserialize, Serialize};
use twilio_core::Resource;

use super::{push_opt, API_VERSION};
use crate::error::Result;
use crate::http::HttpTransport;
use crate::TwilioClient;

/// A message resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Message SID (`SM...` or `MM...`).
    pub sid: String,
    /// Owning account.
    pub account_sid: Option<String>,
    /// Sender.
    pub from: Option<String>,
    /// Recipient.
    pub to: Option<String>,
    /// Message text.
    pub body: Option<String>,
    /// Delivery status, e.g. `queued` or `sent`.
    pub status: Option<String>,
    /// `inbound`, `outbound-api`, ...
    pub direction: Option<String>,
    /// Messaging service the message was sent through.
    pub messaging_service_sid: Option<String>,
    /// RFC 2822 creation timestamp.
    pub date_created: Option<String>,
    /// RFC 2822 update timestamp.
    pub date_updated: Option<String>,
    /// RFC 2822 send timestamp.
    pub date_sent: Option<String>,
    /// Price as a decimal string.
    pub price: Option<String>,
    /// Currency of `price`.
    pub price_unit: Option<String>,
    /// Error code for failed messages.
    pub error_code: Option<i64>,
    /// Error description for failed messages.
    pub error_message: Option<String>,
    /// Number of segments.
    pub num_segments: Option<String>,
    /// Number of media attachments.
    pub num_media: Option<String>,
    /// API version that handled the request.
    pub api_version: Option<String>,
    /// Relative URI of this resource.
    pub uri: Option<String>,
    /// Relative URIs of sub-resources.
    pub subresource_uris: Option<serde_json::Value>,
}

/// Parameters for sending a message.
#[derive(Debug, Clone, Default)]
pub struct CreateMessage {
    to: String,
    from: Option<String>,
    messaging_service_sid: Option<String>,
    body: Option<String>,
    media_url: Vec<String>,
    content_sid: Option<String>,
    status_callback: Option<String>,
}

impl CreateMessage {
    /// Message to `to`.
    ///
    /// A sender (`from` or a messaging service) and some content (body,
    /// media or a content template) must also be set.
    #[must_use]
    pub fn new(to: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            ..Self::default()
        }
    }

    /// Sender phone number or short code.
    #[must_use]
    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    /// Send through a messaging service instead of a fixed sender.
    #[must_use]
    pub fn with_messaging_service_sid(mut self, sid: impl Into<String>) -> Self {
        self.messaging_service_sid = Some(sid.into());
        self
    }

    /// Message text.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Attach media. May be called repeatedly.
    #[must_use]
    pub fn with_media_url(mut self, url: impl Into<String>) -> Self {
        self.media_url.push(url.into());
        self
    }

    /// Content template SID.
    #[must_use]
    pub fn with_content_sid(mut self, sid: impl Into<String>) -> Self {
        self.content_sid = Some(sid.into());
        self
    }

    /// URL notified on status changes.
    #[must_use]
    pub fn with_status_callback(mut self, url: impl Into<String>) -> Self {
        self.status_callback = Some(url.into());
        self
    }

    fn to_form(&self) -> Vec<(String, String)> {
        let mut form = vec![("To".to_string(), self.to.clone())];
        push_opt(&mut form, "From", self.from.as_deref());
        push_opt(
            &mut form,
            "MessagingServiceSid",
            self.messaging_service_sid.as_deref(),
        );
        push_opt(&mut form, "Body", self.body.as_deref());
        for url in &self.media_url {
            form.push(("MediaUrl".to_string(), url.clone()));
        }
        push_opt(&mut form, "ContentSid", self.content_sid.as_deref());
        push_opt(&mut form, "StatusCallback", self.status_callback.as_deref());
        form
    }
}

/// Message operations for the client's account.
#[derive(Debug)]
pub struct Messages<'a, T: HttpTransport> {
    client: &'a TwilioClient<T>,
}

impl<'a, T: HttpTransport> Messages<'a, T> {
    pub(crate) fn new(client: &'a TwilioClient<T>) -> Self {
        Self { client }
    }

    fn list_uri(&self) -> Result<String> {
        Ok(format!(
            "{}/{API_VERSION}/Accounts/{}/Messages.json",
            self.client.api_base_url(),
            self.client.require_account_sid()?
        ))
    }

    /// Send a message.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects it.
    pub async fn create(&self, params: CreateMessage) -> Result<Resource<Message>> {
        let uri = self.list_uri()?;
        let (message, headers) = self
            .client
            .create_with_headers(&uri, params.to_form())
            .await?;
        Ok(Resource::new(message, headers))
    }

    /// Fetch a message by SID.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the message does not exist.
    pub async fn fetch(&self, sid: &str) -> Result<Resource<Message>> {
        let uri = format!(
            "{}/{API_VERSION}/Accounts/{}/Messages/{sid}.json",
            self.client.api_base_url(),
            self.client.require_account_sid()?
        );
        let (message, headers) = self.client.fetch_with_headers(&uri).await?;
        Ok(Resource::new(message, headers))
    }
}
