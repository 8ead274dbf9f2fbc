//! Common test utilities for webhook integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use axum::Router;
use axum_test::TestServer;

use twilio_webhook::{create_router, RequestValidator, WebhookConfig, WebhookState};

/// Auth token the test receiver verifies against.
pub const AUTH_TOKEN: &str = "test-auth-token";

/// Public origin the provider is assumed to call.
pub const PUBLIC_BASE_URL: &str = "https://hooks.example.com";

/// Test harness with a receiver and a validator keyed the same way.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// Signs requests the way the provider would.
    pub signer: RequestValidator,
}

impl TestHarness {
    /// A receiver behind a known public origin.
    pub fn new() -> Self {
        Self::with_config(WebhookConfig::new(AUTH_TOKEN).with_public_base_url(PUBLIC_BASE_URL))
    }

    /// A receiver with custom configuration.
    pub fn with_config(config: WebhookConfig) -> Self {
        let router: Router = create_router(WebhookState::new(config));
        Self::with_router(router)
    }

    /// Serve an arbitrary router.
    pub fn with_router(router: Router) -> Self {
        let server = TestServer::new(router).expect("Failed to create test server");
        Self {
            server,
            signer: RequestValidator::new(AUTH_TOKEN),
        }
    }

    /// Signature for a form POST to `path` under the public origin.
    pub fn sign_form(&self, path: &str, params: &[(&str, &str)]) -> String {
        self.signer
            .compute_signature(&format!("{PUBLIC_BASE_URL}{path}"), &params)
    }

    /// Signature for an absolute URL with no signed parameters.
    pub fn sign_url(&self, url: &str) -> String {
        let none: [(&str, &str); 0] = [];
        self.signer.compute_signature(url, &none)
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// A typical inbound SMS callback.
pub fn inbound_message() -> Vec<(&'static str, &'static str)> {
    vec![
        ("MessageSid", "SM1234567890abcdef1234567890abcdef"),
        ("AccountSid", "ACaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"),
        ("From", "+15558675310"),
        ("To", "+15017122661"),
        ("Body", "Hello there"),
        ("NumMedia", "0"),
    ]
}
