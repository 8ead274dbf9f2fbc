//! Raw-body (JSON) callbacks through the signature middleware.

mod common;

use std::sync::Arc;

use axum::body::Bytes;
use axum::http::StatusCode;
use axum::middleware::from_fn_with_state;
use axum::routing::post;
use axum::Router;

use common::{TestHarness, AUTH_TOKEN, PUBLIC_BASE_URL};
use twilio_webhook::middleware::verify_signature;
use twilio_webhook::validator::BODY_HASH_PARAM;
use twilio_webhook::{compute_hash, WebhookConfig, WebhookState};

const SIGNATURE_HEADER: &str = "x-twilio-signature";
const BODY: &str = r#"{"property": "value", "boolean": true}"#;

fn json_harness(max_body_bytes: usize) -> TestHarness {
    let config = WebhookConfig::new(AUTH_TOKEN)
        .with_public_base_url(PUBLIC_BASE_URL)
        .with_max_body_bytes(max_body_bytes);
    let state = Arc::new(WebhookState::new(config));

    let router = Router::new()
        .route("/hooks/events", post(|body: String| async move { body }))
        .route_layer(from_fn_with_state(state.clone(), verify_signature))
        .with_state(state);

    TestHarness::with_router(router)
}

#[tokio::test]
async fn json_body_matching_its_hash_reaches_the_handler_intact() {
    let harness = json_harness(1024);
    let hash = compute_hash(BODY);
    let signature =
        harness.sign_url(&format!("{PUBLIC_BASE_URL}/hooks/events?{BODY_HASH_PARAM}={hash}"));

    let response = harness
        .server
        .post("/hooks/events")
        .add_query_param(BODY_HASH_PARAM, &hash)
        .add_header(SIGNATURE_HEADER, signature)
        .bytes(Bytes::from_static(BODY.as_bytes()))
        .content_type("application/json")
        .await;

    response.assert_status_ok();
    assert_eq!(response.text(), BODY);
}

#[tokio::test]
async fn json_body_not_matching_its_hash_is_forbidden() {
    let harness = json_harness(1024);
    let hash = compute_hash(BODY);
    let signature =
        harness.sign_url(&format!("{PUBLIC_BASE_URL}/hooks/events?{BODY_HASH_PARAM}={hash}"));

    let response = harness
        .server
        .post("/hooks/events")
        .add_query_param(BODY_HASH_PARAM, &hash)
        .add_header(SIGNATURE_HEADER, signature)
        .bytes(Bytes::from_static(br#"{"property": "other", "boolean": true}"#))
        .content_type("application/json")
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn oversized_body_is_a_bad_request() {
    let harness = json_harness(8);
    let signature = harness.sign_url(&format!("{PUBLIC_BASE_URL}/hooks/events"));

    let response = harness
        .server
        .post("/hooks/events")
        .add_header(SIGNATURE_HEADER, signature)
        .bytes(Bytes::from_static(BODY.as_bytes()))
        .content_type("application/json")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn signed_hash_with_body_stripped_is_forbidden() {
    let harness = json_harness(1024);
    let hash = compute_hash(BODY);
    let signature =
        harness.sign_url(&format!("{PUBLIC_BASE_URL}/hooks/events?{BODY_HASH_PARAM}={hash}"));

    let response = harness
        .server
        .post("/hooks/events")
        .add_query_param(BODY_HASH_PARAM, &hash)
        .add_header(SIGNATURE_HEADER, signature)
        .bytes(Bytes::new())
        .content_type("application/json")
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn signed_hash_with_body_relabelled_as_form_is_forbidden() {
    let harness = json_harness(1024);
    let hash = compute_hash(BODY);
    let signature =
        harness.sign_url(&format!("{PUBLIC_BASE_URL}/hooks/events?{BODY_HASH_PARAM}={hash}"));

    let response = harness
        .server
        .post("/hooks/events")
        .add_query_param(BODY_HASH_PARAM, &hash)
        .add_header(SIGNATURE_HEADER, signature)
        .bytes(Bytes::new())
        .content_type("application/x-www-form-urlencoded")
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn empty_body_without_hash_signs_the_url_alone() {
    let harness = json_harness(1024);
    let signature = harness.sign_url(&format!("{PUBLIC_BASE_URL}/hooks/events"));

    let response = harness
        .server
        .post("/hooks/events")
        .add_header(SIGNATURE_HEADER, signature)
        .bytes(Bytes::new())
        .content_type("application/json")
        .await;

    response.assert_status_ok();
    assert_eq!(response.text(), "");
}
