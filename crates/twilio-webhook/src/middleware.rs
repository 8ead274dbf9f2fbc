//! Signature verification middleware.
//!
//! Buffers the request body, rebuilds the URL the provider signed and checks
//! `X-Twilio-Signature` before the request reaches a handler. The buffered
//! body is handed on unchanged.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::{OriginalUri, Request, State};
use axum::http::header::{CONTENT_TYPE, HOST};
use axum::http::request::Parts;
use axum::http::uri::Authority;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{debug, warn};

use crate::error::WebhookError;
use crate::state::WebhookState;
use crate::validator::{body_hash_param, WebhookParams, SIGNATURE_HEADER};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const FORWARDED_PROTO: &str = "x-forwarded-proto";
const FORWARDED_HOST: &str = "x-forwarded-host";

/// Reject requests whose Twilio signature does not verify.
pub async fn verify_signature(
    State(state): State<Arc<WebhookState>>,
    request: Request,
    next: Next,
) -> Result<Response, WebhookError> {
    let (parts, body) = request.into_parts();

    let Some(signature) = header_str(&parts.headers, SIGNATURE_HEADER).map(str::to_owned) else {
        warn!(path = %parts.uri.path(), "Rejected webhook request: missing signature");
        return Err(WebhookError::MissingSignature);
    };

    let bytes = axum::body::to_bytes(body, state.config.max_body_bytes)
        .await
        .map_err(|e| WebhookError::BadRequest(format!("unreadable body: {e}")))?;
    let text = std::str::from_utf8(&bytes)
        .map_err(|_| WebhookError::BadRequest("body is not valid UTF-8".into()))?;

    let url = signed_url(&parts, state.config.public_base_url.as_deref());

    // Bodies are hash-checked whenever the URL carries `bodySHA256`, even
    // when empty or labelled as a form.
    let valid = if is_form(&parts.headers) && body_hash_param(&url).is_none() {
        let pairs: Vec<(String, String)> =
            url::form_urlencoded::parse(&bytes).into_owned().collect();
        state
            .validator
            .validate(&url, WebhookParams::form(&pairs), &signature)
    } else {
        state
            .validator
            .validate(&url, WebhookParams::Body(text), &signature)
    };

    if !valid {
        warn!(url = %url, "Rejected webhook request: invalid signature");
        return Err(WebhookError::InvalidSignature);
    }

    debug!(url = %url, body_bytes = bytes.len(), "Webhook signature verified");

    let request = Request::from_parts(parts, Body::from(bytes));
    Ok(next.run(request).await)
}

/// The absolute URL the provider requested.
///
/// Uses the configured public origin when present, otherwise the forwarding
/// headers, then `Host`.
fn signed_url(parts: &Parts, public_base_url: Option<&str>) -> String {
    let uri = parts
        .extensions
        .get::<OriginalUri>()
        .map_or(&parts.uri, |original| &original.0);
    let path_and_query = uri.path_and_query().map_or("/", |pq| pq.as_str());

    if let Some(base) = public_base_url {
        return format!("{base}{path_and_query}");
    }

    let scheme = header_str(&parts.headers, FORWARDED_PROTO)
        .and_then(first_token)
        .or_else(|| uri.scheme_str())
        .unwrap_or("http");
    let host = header_str(&parts.headers, FORWARDED_HOST)
        .and_then(first_token)
        .or_else(|| header_str(&parts.headers, HOST.as_str()))
        .or_else(|| uri.authority().map(Authority::as_str))
        .unwrap_or("localhost");

    format!("{scheme}://{host}{path_and_query}")
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// First entry of a comma-separated forwarding header.
fn first_token(value: &str) -> Option<&str> {
    value
        .split(',')
        .next()
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn is_form(headers: &HeaderMap) -> bool {
    header_str(headers, CONTENT_TYPE.as_str())
        .and_then(|ct| ct.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(FORM_CONTENT_TYPE))
}
