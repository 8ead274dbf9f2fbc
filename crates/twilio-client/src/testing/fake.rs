use std::collections::HashMap;
use std::fmt::Write as _;
use std::ops::Deref;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Map, Value};
use tracing::debug;
use twilio_core::ResponseHeaders;

use crate::auth::BasicCredentialProvider;
use crate::config::ClientConfig;
use crate::error::{Result, TwilioError, ValidationError};
use crate::http::{ApiRequest, ApiResponse, HttpTransport, Method};
use crate::TwilioClient;

/// Account SID used by [`FakeTwilioClient::new`].
pub const DEFAULT_ACCOUNT_SID: &str = "ACtest123";

/// Auth token used by [`FakeTwilioClient::new`].
pub const DEFAULT_AUTH_TOKEN: &str = "test_token";

const UNKNOWN: &str = "unknown";

/// Request fields echoed into `.create` responses.
const ECHOED_FIELDS: &[(&str, &str)] = &[
    ("To", "to"),
    ("From", "from"),
    ("Body", "body"),
    ("MessagingServiceSid", "messaging_service_sid"),
];

/// One intercepted request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeCall {
    /// HTTP method.
    pub method: String,
    /// Operation name, e.g. `messages.create`, or `unknown`.
    pub resource: String,
    /// Form fields in request order.
    pub params: Vec<(String, String)>,
    /// When the request was intercepted.
    pub timestamp: DateTime<Utc>,
}

impl FakeCall {
    /// First value of a form field.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn has(&self, name: &str) -> bool {
        self.param(name).is_some_and(|v| !v.is_empty())
    }
}

/// A failed [`FakeTwilioClient::assert_called_with`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct AssertionFailure {
    message: String,
}

impl AssertionFailure {
    /// The failure description.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Default)]
struct FakeState {
    calls: Vec<FakeCall>,
    responses: HashMap<String, Value>,
}

/// Transport that records requests and answers with canned payloads.
#[derive(Debug)]
pub struct FakeTransport {
    account_sid: String,
    state: Mutex<FakeState>,
}

impl FakeTransport {
    /// Create a transport whose default payloads belong to `account_sid`.
    #[must_use]
    pub fn new(account_sid: impl Into<String>) -> Self {
        Self {
            account_sid: account_sid.into(),
            state: Mutex::new(FakeState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Answer `operation` with `payload` instead of the built-in default.
    pub fn configure_response(&self, operation: impl Into<String>, payload: Value) {
        self.state().responses.insert(operation.into(), payload);
    }

    /// Snapshot of every intercepted call, oldest first.
    #[must_use]
    pub fn recorded_calls(&self) -> Vec<FakeCall> {
        self.state().calls.clone()
    }

    /// Intercepted calls for one operation, oldest first.
    #[must_use]
    pub fn calls_by_resource(&self, operation: &str) -> Vec<FakeCall> {
        self.state()
            .calls
            .iter()
            .filter(|c| c.resource == operation)
            .cloned()
            .collect()
    }

    /// Forget all intercepted calls. Configured responses are kept.
    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }

    /// Check that some call to `operation` carried every `(field, value)` in `expected`.
    ///
    /// # Errors
    ///
    /// Returns an [`AssertionFailure`] naming the actual calls when none matches.
    pub fn assert_called_with(
        &self,
        operation: &str,
        expected: &[(&str, &str)],
    ) -> std::result::Result<(), AssertionFailure> {
        let calls = self.calls_by_resource(operation);
        if calls.is_empty() {
            return Err(AssertionFailure {
                message: format!("No calls made to {operation}"),
            });
        }

        let matched = calls.iter().any(|call| {
            expected
                .iter()
                .all(|(key, value)| call.param(key) == Some(*value))
        });
        if matched {
            return Ok(());
        }

        let actual: Vec<String> = calls.iter().map(|c| render_params(&c.params)).collect();
        Err(AssertionFailure {
            message: format!(
                "No call to {operation} found with parameters {}. Actual calls: [{}]",
                render_params(expected),
                actual.join(", ")
            ),
        })
    }

    fn default_response(&self, operation: &str) -> Value {
        let sid = &self.account_sid;
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        match operation {
            "messages.create" | "messages.fetch" => json!({
                "sid": "SMtest123456789",
                "account_sid": sid,
                "from": "+15551234567",
                "to": "+15559876543",
                "body": "Test message",
                "status": "sent",
                "direction": "outbound-api",
                "date_created": now,
                "date_sent": now,
                "date_updated": now,
                "price": "-0.0075",
                "price_unit": "USD",
                "error_code": null,
                "error_message": null,
                "uri": format!("/2010-04-01/Accounts/{sid}/Messages/SMtest123456789.json"),
                "api_version": "2010-04-01",
                "num_segments": "1",
                "num_media": "0",
                "messaging_service_sid": null,
                "subresource_uris": {
                    "media": format!("/2010-04-01/Accounts/{sid}/Messages/SMtest123456789/Media.json"),
                    "feedback": format!("/2010-04-01/Accounts/{sid}/Messages/SMtest123456789/Feedback.json"),
                },
            }),
            "calls.create" | "calls.fetch" => json!({
                "sid": "CAtest123456789",
                "account_sid": sid,
                "from": "+15551234567",
                "to": "+15559876543",
                "status": "queued",
                "direction": "outbound-api",
                "date_created": now,
                "date_updated": now,
                "price": null,
                "price_unit": "USD",
                "uri": format!("/2010-04-01/Accounts/{sid}/Calls/CAtest123456789.json"),
                "api_version": "2010-04-01",
            }),
            _ => Value::Object(Map::new()),
        }
    }

    fn response_for(&self, call: &FakeCall) -> Value {
        let configured = self.state().responses.get(&call.resource).cloned();
        let mut payload = configured.unwrap_or_else(|| self.default_response(&call.resource));

        if call.resource.ends_with(".create") {
            if let Value::Object(fields) = &mut payload {
                for (request_field, response_field) in ECHOED_FIELDS {
                    if let Some(value) = call.param(request_field) {
                        fields.insert((*response_field).to_string(), Value::from(value));
                    }
                }
            }
        }
        payload
    }
}

#[async_trait]
impl HttpTransport for FakeTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let call = FakeCall {
            method: request.method.to_string(),
            resource: classify(&request.method, &request.url).to_string(),
            params: request.data,
            timestamp: Utc::now(),
        };
        debug!(method = %call.method, resource = %call.resource, "Intercepted request");

        self.state().calls.push(call.clone());
        validate(&call)?;

        let body = serde_json::to_string(&self.response_for(&call))?;
        let headers: ResponseHeaders = [("Content-Type", "application/json")].into_iter().collect();
        Ok(ApiResponse::new(200, body, headers))
    }
}

/// Operation name for a request.
fn classify(method: &Method, url: &str) -> &'static str {
    let path = url.split('?').next().unwrap_or(url);
    if *method == Method::POST && path.contains("/Messages.json") {
        "messages.create"
    } else if *method == Method::POST && path.contains("/Calls.json") {
        "calls.create"
    } else if *method == Method::GET && path.contains("/Messages/") {
        "messages.fetch"
    } else if *method == Method::GET && path.contains("/Calls/") {
        "calls.fetch"
    } else {
        UNKNOWN
    }
}

fn validate(call: &FakeCall) -> std::result::Result<(), ValidationError> {
    match call.resource.as_str() {
        "messages.create" => {
            require(call, "messages.create", "To")?;
            require_one_of(call, "messages.create", &["From", "MessagingServiceSid"])?;
            require_one_of(call, "messages.create", &["Body", "MediaUrl", "ContentSid"])
        }
        "calls.create" => {
            require(call, "calls.create", "To")?;
            require(call, "calls.create", "From")?;
            require_one_of(call, "calls.create", &["Url", "Twiml", "ApplicationSid"])
        }
        _ => Ok(()),
    }
}

fn require(
    call: &FakeCall,
    operation: &'static str,
    field: &'static str,
) -> std::result::Result<(), ValidationError> {
    if call.has(field) {
        Ok(())
    } else {
        Err(ValidationError::MissingRequired { operation, field })
    }
}

fn require_one_of(
    call: &FakeCall,
    operation: &'static str,
    fields: &'static [&'static str],
) -> std::result::Result<(), ValidationError> {
    if fields.iter().any(|f| call.has(f)) {
        Ok(())
    } else {
        Err(ValidationError::MissingAlternative { operation, fields })
    }
}

fn render_params<K: AsRef<str>, V: AsRef<str>>(params: &[(K, V)]) -> String {
    let mut out = String::from("{");
    for (i, (key, value)) in params.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "{:?}: {:?}", key.as_ref(), value.as_ref());
    }
    out.push('}');
    out
}

/// A [`TwilioClient`] backed by a [`FakeTransport`].
///
/// Resource operations (`messages()`, `calls()`, ...) are reached through
/// `Deref`; the call log and response configuration live on the wrapper.
/// Each instance has its own log.
#[derive(Debug)]
pub struct FakeTwilioClient {
    client: TwilioClient<FakeTransport>,
}

impl FakeTwilioClient {
    /// Fake client for [`DEFAULT_ACCOUNT_SID`] and [`DEFAULT_AUTH_TOKEN`].
    #[must_use]
    pub fn new() -> Self {
        Self::build(DEFAULT_ACCOUNT_SID, DEFAULT_AUTH_TOKEN)
    }

    /// Fake client for specific credentials.
    ///
    /// # Errors
    ///
    /// Returns [`TwilioError::Configuration`] if either value is empty.
    pub fn with_credentials(account_sid: &str, auth_token: &str) -> Result<Self> {
        if account_sid.is_empty() || auth_token.is_empty() {
            return Err(TwilioError::Configuration(
                "Credentials are required to create a TwilioClient".to_string(),
            ));
        }
        Ok(Self::build(account_sid, auth_token))
    }

    fn build(account_sid: &str, auth_token: &str) -> Self {
        let provider = Arc::new(BasicCredentialProvider::new(account_sid, auth_token));
        let config = ClientConfig::new(account_sid, auth_token);
        Self {
            client: TwilioClient::assemble(config, FakeTransport::new(account_sid), provider),
        }
    }

    /// The wrapped client.
    #[must_use]
    pub fn client(&self) -> &TwilioClient<FakeTransport> {
        &self.client
    }

    /// Answer `operation` with `payload` instead of the built-in default.
    pub fn configure_response(&self, operation: impl Into<String>, payload: Value) {
        self.client.transport().configure_response(operation, payload);
    }

    /// Snapshot of every intercepted call, oldest first.
    #[must_use]
    pub fn recorded_calls(&self) -> Vec<FakeCall> {
        self.client.transport().recorded_calls()
    }

    /// Intercepted calls for one operation, oldest first.
    #[must_use]
    pub fn calls_by_resource(&self, operation: &str) -> Vec<FakeCall> {
        self.client.transport().calls_by_resource(operation)
    }

    /// See [`FakeTransport::assert_called_with`].
    ///
    /// # Errors
    ///
    /// Returns an [`AssertionFailure`] naming the actual calls when none matches.
    pub fn assert_called_with(
        &self,
        operation: &str,
        expected: &[(&str, &str)],
    ) -> std::result::Result<(), AssertionFailure> {
        self.client.transport().assert_called_with(operation, expected)
    }

    /// Forget all intercepted calls.
    pub fn clear_calls(&self) {
        self.client.transport().clear_calls();
    }
}

impl Default for FakeTwilioClient {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for FakeTwilioClient {
    type Target = TwilioClient<FakeTransport>;

    fn deref(&self) -> &Self::Target {
        &self.client
    }
}
