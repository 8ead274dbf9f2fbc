use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::WebhookState;

/// Liveness and signing setup of the receiver.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `ok` while the process serves requests.
    pub status: &'static str,
    /// Crate version.
    pub version: &'static str,
    /// Origin used for signed URLs, or `null` when taken from request headers.
    pub public_base_url: Option<String>,
}

/// `GET /health`. Not signature checked.
pub async fn health(State(state): State<Arc<WebhookState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        public_base_url: state.config.public_base_url.clone(),
    })
}
