//! Twilio webhook receiver.
//!
//! Verifies callback signatures and acknowledges messaging and voice events.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use twilio_webhook::{create_router, WebhookConfig, WebhookState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,twilio_webhook=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = WebhookConfig::from_env();
    if !config.has_auth_token() {
        return Err("TWILIO_AUTH_TOKEN must be set to verify webhook signatures".into());
    }

    tracing::info!(
        listen_addr = %config.listen_addr,
        public_base_url = ?config.public_base_url,
        max_body_bytes = config.max_body_bytes,
        "Webhook configuration loaded"
    );

    let listen_addr = config.listen_addr.clone();
    let app = create_router(WebhookState::new(config));

    tracing::info!(listen_addr = %listen_addr, "Starting webhook receiver");
    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
