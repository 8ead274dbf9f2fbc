//! Messaging, voice and event callback handlers.
//!
//! Requests only reach these handlers after the signature middleware has
//! accepted them.

use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Form, Json};
use serde::Deserialize;
use serde_json::Value;

/// An empty TwiML document: acknowledge without further instructions.
pub const EMPTY_TWIML: &str = r#"<?xml version="1.0" encoding="UTF-8"?><Response/>"#;

/// Incoming message or message status callback.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MessageEvent {
    /// Message SID.
    #[serde(default)]
    pub message_sid: String,
    /// Account the message belongs to.
    pub account_sid: Option<String>,
    /// Sender.
    pub from: Option<String>,
    /// Recipient.
    pub to: Option<String>,
    /// Message text.
    pub body: Option<String>,
    /// Number of attached media items.
    pub num_media: Option<String>,
    /// Delivery status, on status callbacks.
    pub message_status: Option<String>,
}

/// Incoming call or call status callback.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VoiceEvent {
    /// Call SID.
    #[serde(default)]
    pub call_sid: String,
    /// Account the call belongs to.
    pub account_sid: Option<String>,
    /// Caller.
    pub from: Option<String>,
    /// Callee.
    pub to: Option<String>,
    /// Call status.
    pub call_status: Option<String>,
    /// `inbound` or one of the outbound directions.
    pub direction: Option<String>,
}

fn twiml() -> impl IntoResponse {
    ([(CONTENT_TYPE, "application/xml")], EMPTY_TWIML)
}

/// Handle messaging webhooks.
pub async fn message_webhook(Form(event): Form<MessageEvent>) -> impl IntoResponse {
    tracing::info!(
        message_sid = %event.message_sid,
        from = ?event.from,
        to = ?event.to,
        status = ?event.message_status,
        num_media = ?event.num_media,
        has_body = event.body.is_some(),
        "Received message webhook"
    );

    twiml()
}

/// Handle voice webhooks.
pub async fn voice_webhook(Form(event): Form<VoiceEvent>) -> impl IntoResponse {
    tracing::info!(
        call_sid = %event.call_sid,
        from = ?event.from,
        to = ?event.to,
        status = ?event.call_status,
        direction = ?event.direction,
        "Received voice webhook"
    );

    twiml()
}

/// Handle JSON event callbacks.
///
/// These arrive as a raw body signed through `bodySHA256`. The payload is
/// either one event object or an array of them.
pub async fn event_webhook(Json(payload): Json<Value>) -> StatusCode {
    let events: Vec<&Value> = match &payload {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    };

    for event in &events {
        tracing::info!(
            event_type = event.get("type").and_then(serde_json::Value::as_str).unwrap_or("unknown"),
            id = ?event.get("id").and_then(serde_json::Value::as_str),
            "Received event webhook"
        );
    }

    StatusCode::NO_CONTENT
}
