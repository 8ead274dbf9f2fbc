//! Router configuration.

use std::sync::Arc;
use std::time::Duration;

use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::Router;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{health, webhooks};
use crate::middleware::verify_signature;
use crate::state::WebhookState;

/// Maximum concurrent webhook requests.
const WEBHOOK_MAX_CONCURRENT_REQUESTS: usize = 100;

/// Create the receiver router.
///
/// # Routes
///
/// - `GET /health` - Health check (unsigned)
/// - `POST /webhooks/messages` - Messaging callbacks (signature verified)
/// - `POST /webhooks/voice` - Voice callbacks (signature verified)
/// - `POST /webhooks/events` - JSON event callbacks (signature and body hash verified)
pub fn create_router(state: WebhookState) -> Router {
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout_seconds = state.config.request_timeout_seconds;

    let state = Arc::new(state);

    let webhook_routes = Router::new()
        .route("/webhooks/messages", post(webhooks::message_webhook))
        .route("/webhooks/voice", post(webhooks::voice_webhook))
        .route("/webhooks/events", post(webhooks::event_webhook))
        .route_layer(from_fn_with_state(state.clone(), verify_signature))
        .layer(ConcurrencyLimitLayer::new(WEBHOOK_MAX_CONCURRENT_REQUESTS));

    Router::new()
        .route("/health", get(health::health))
        .merge(webhook_routes)
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            request_timeout_seconds,
        )))
        .with_state(state)
}
