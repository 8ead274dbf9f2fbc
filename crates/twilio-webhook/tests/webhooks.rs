//! Signed callback integration tests against the receiver router.

mod common;

use axum::body::Bytes;
use axum::http::StatusCode;
use serde_json::Value;

use common::{inbound_message, TestHarness, AUTH_TOKEN, PUBLIC_BASE_URL};
use twilio_webhook::handlers::webhooks::EMPTY_TWIML;
use twilio_webhook::validator::BODY_HASH_PARAM;
use twilio_webhook::{compute_hash, WebhookConfig};

const SIGNATURE_HEADER: &str = "x-twilio-signature";

#[tokio::test]
async fn signed_message_callback_is_acknowledged_with_twiml() {
    let harness = TestHarness::new();
    let params = inbound_message();
    let signature = harness.sign_form("/webhooks/messages", &params);

    let response = harness
        .server
        .post("/webhooks/messages")
        .add_header(SIGNATURE_HEADER, signature)
        .form(&params)
        .await;

    response.assert_status_ok();
    assert_eq!(response.text(), EMPTY_TWIML);
    assert_eq!(response.header("content-type"), "application/xml");
}

#[tokio::test]
async fn tampered_callback_is_forbidden() {
    let harness = TestHarness::new();
    let params = inbound_message();
    let signature = harness.sign_form("/webhooks/messages", &params);

    let mut tampered = params.clone();
    tampered[4] = ("Body", "Send me your password");

    let response = harness
        .server
        .post("/webhooks/messages")
        .add_header(SIGNATURE_HEADER, signature)
        .form(&tampered)
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "invalid_signature");
}

#[tokio::test]
async fn missing_signature_is_forbidden() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/webhooks/messages")
        .form(&inbound_message())
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "missing_signature");
}

#[tokio::test]
async fn signature_for_another_route_is_forbidden() {
    let harness = TestHarness::new();
    let params = inbound_message();
    let signature = harness.sign_form("/webhooks/voice", &params);

    let response = harness
        .server
        .post("/webhooks/messages")
        .add_header(SIGNATURE_HEADER, signature)
        .form(&params)
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn voice_callback_signed_with_explicit_port_is_accepted() {
    let harness = TestHarness::new();
    let params = [
        ("CallSid", "CA1234567890abcdef1234567890abcdef"),
        ("From", "+15558675310"),
        ("To", "+15017122661"),
        ("CallStatus", "ringing"),
        ("Direction", "inbound"),
    ];
    let signature = harness
        .signer
        .compute_signature("https://hooks.example.com:443/webhooks/voice", &params);

    let response = harness
        .server
        .post("/webhooks/voice")
        .add_header(SIGNATURE_HEADER, signature)
        .form(&params)
        .await;

    response.assert_status_ok();
    assert_eq!(response.text(), EMPTY_TWIML);
}

#[tokio::test]
async fn forwarding_headers_rebuild_the_signed_url() {
    let harness = TestHarness::with_config(WebhookConfig::new(AUTH_TOKEN));
    let params = inbound_message();
    let signature = harness.signer.compute_signature(
        "https://proxy.example.com/webhooks/messages",
        &params,
    );

    let response = harness
        .server
        .post("/webhooks/messages")
        .add_header("x-forwarded-proto", "https")
        .add_header("x-forwarded-host", "proxy.example.com")
        .add_header(SIGNATURE_HEADER, signature)
        .form(&params)
        .await;

    response.assert_status_ok();
}

#[tokio::test]
async fn repeated_form_fields_are_all_signed() {
    let harness = TestHarness::new();
    let mut params = inbound_message();
    params.push(("MediaUrl0", "https://example.com/a.png"));
    params.push(("Tag", "b"));
    params.push(("Tag", "a"));
    let signature = harness.sign_form("/webhooks/messages", &params);

    let response = harness
        .server
        .post("/webhooks/messages")
        .add_header(SIGNATURE_HEADER, signature)
        .form(&params)
        .await;

    response.assert_status_ok();
}

const EVENTS: &str = r#"[{"id":"EV1","type":"com.twilio.messaging.message.delivered","data":{}}]"#;

#[tokio::test]
async fn signed_json_events_are_accepted() {
    let harness = TestHarness::new();
    let hash = compute_hash(EVENTS);
    let signature =
        harness.sign_url(&format!("{PUBLIC_BASE_URL}/webhooks/events?{BODY_HASH_PARAM}={hash}"));

    let response = harness
        .server
        .post("/webhooks/events")
        .add_query_param(BODY_HASH_PARAM, &hash)
        .add_header(SIGNATURE_HEADER, signature)
        .bytes(Bytes::from_static(EVENTS.as_bytes()))
        .content_type("application/json")
        .await;

    response.assert_status(StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn json_events_with_body_stripped_are_forbidden() {
    let harness = TestHarness::new();
    let hash = compute_hash(EVENTS);
    let signature =
        harness.sign_url(&format!("{PUBLIC_BASE_URL}/webhooks/events?{BODY_HASH_PARAM}={hash}"));

    let response = harness
        .server
        .post("/webhooks/events")
        .add_query_param(BODY_HASH_PARAM, &hash)
        .add_header(SIGNATURE_HEADER, signature)
        .bytes(Bytes::new())
        .content_type("application/json")
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "invalid_signature");
}
