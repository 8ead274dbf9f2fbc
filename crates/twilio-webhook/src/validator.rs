//! Webhook request signature validation.
//!
//! Twilio signs each callback with `X-Twilio-Signature`: an HMAC-SHA1, keyed
//! with the account auth token, over the full request URL followed by every
//! POST parameter (name then value, sorted by name). JSON callbacks carry a
//! `bodySHA256` query parameter instead; the URL (and so the hash) is signed
//! and the hash must match the raw body.

use std::borrow::Cow;
use std::collections::BTreeSet;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha1::Sha1;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use twilio_core::{with_port, without_port};

use crate::params::ParamSource;

type HmacSha1 = Hmac<Sha1>;

// ============================================================================
// Constants
// ============================================================================

/// Query parameter carrying the hex SHA-256 of a raw request body.
pub const BODY_HASH_PARAM: &str = "bodySHA256";

/// Header carrying the request signature.
pub const SIGNATURE_HEADER: &str = "X-Twilio-Signature";

// ============================================================================
// Primitives
// ============================================================================

/// Constant-time string comparison.
///
/// Strings of different length compare unequal immediately; equal-length
/// strings are compared over every byte.
///
/// # Returns
///
/// `true` only if `a` and `b` hold the same bytes.
#[must_use]
pub fn compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Lowercase hex SHA-256 of `body`.
///
/// # Returns
///
/// A 64-character hex string, as carried by `bodySHA256`.
#[must_use]
pub fn compute_hash(body: &str) -> String {
    hex::encode(Sha256::digest(body.as_bytes()))
}

// ============================================================================
// Validator
// ============================================================================

/// Parameters that accompanied a webhook request.
#[derive(Clone, Copy, Default)]
pub enum WebhookParams<'a> {
    /// No parameters (a GET callback, or nothing to sign).
    #[default]
    Empty,
    /// Decoded form or query parameters.
    Form(&'a dyn ParamSource),
    /// The raw request body, checked against `bodySHA256`.
    Body(&'a str),
}

impl<'a> WebhookParams<'a> {
    /// Wrap any parameter container.
    #[must_use]
    pub fn form<P: ParamSource>(params: &'a P) -> Self {
        Self::Form(params)
    }
}

impl<'a> From<&'a str> for WebhookParams<'a> {
    fn from(body: &'a str) -> Self {
        Self::Body(body)
    }
}

impl<'a> From<Option<&'a str>> for WebhookParams<'a> {
    fn from(body: Option<&'a str>) -> Self {
        body.map_or(Self::Empty, Self::Body)
    }
}

impl std::fmt::Debug for WebhookParams<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => f.write_str("Empty"),
            Self::Form(params) => f.debug_tuple("Form").field(&params.names()).finish(),
            Self::Body(body) => f.debug_tuple("Body").field(&body.len()).finish(),
        }
    }
}

/// Signed as the mapping when the body is covered by its hash.
struct NoParams;

impl ParamSource for NoParams {
    fn names(&self) -> Vec<&str> {
        Vec::new()
    }

    fn values(&self, _name: &str) -> Vec<Cow<'_, str>> {
        Vec::new()
    }
}

/// Validates incoming webhook requests for one auth token.
#[derive(Debug)]
pub struct RequestValidator {
    auth_token: SecretString,
}

impl RequestValidator {
    /// Create a validator keyed with the account auth token.
    #[must_use]
    pub fn new(auth_token: impl Into<String>) -> Self {
        Self {
            auth_token: SecretString::from(auth_token.into()),
        }
    }

    /// Compute the expected signature for `uri` and `params`.
    ///
    /// Names are visited in sorted order; repeated values for a name are
    /// deduplicated and sorted, and each contributes `name + value`.
    ///
    /// # Arguments
    ///
    /// * `uri` - The full URL the provider requested, query string included
    /// * `params` - The POST parameters to sign; an empty source signs the URL alone
    ///
    /// # Returns
    ///
    /// The base64-encoded HMAC-SHA1 digest, comparable to `X-Twilio-Signature`.
    ///
    /// # Panics
    ///
    /// Never in practice: HMAC-SHA1 accepts keys of any size.
    #[must_use]
    pub fn compute_signature(&self, uri: &str, params: &dyn ParamSource) -> String {
        let mut payload = String::from(uri);

        let names: BTreeSet<&str> = params.names().into_iter().collect();
        for name in names {
            let values: BTreeSet<Cow<'_, str>> = params.values(name).into_iter().collect();
            for value in values {
                payload.push_str(name);
                payload.push_str(&value);
            }
        }

        // INVARIANT: HMAC accepts keys of any size per RFC 2104.
        let mut mac = HmacSha1::new_from_slice(self.auth_token.expose_secret().as_bytes())
            .expect("HMAC-SHA1 accepts any key size");
        mac.update(payload.as_bytes());
        STANDARD.encode(mac.finalize().into_bytes())
    }

    /// Check `signature` for a request to `uri` carrying `params`.
    ///
    /// The URL is tried both without and with an explicit port, since
    /// callers may sign either form. Never errors: any mismatch is `false`.
    ///
    /// # Arguments
    ///
    /// * `uri` - The full URL the provider requested
    /// * `params` - Form parameters, or the raw body when the URL carries `bodySHA256`
    /// * `signature` - The value of `X-Twilio-Signature`
    ///
    /// # Returns
    ///
    /// `true` if the body hash (when required) and the signature both match.
    #[must_use]
    pub fn validate(&self, uri: &str, params: WebhookParams<'_>, signature: &str) -> bool {
        let (valid_body_hash, signed): (bool, &dyn ParamSource) =
            match (params, body_hash_param(uri)) {
                (WebhookParams::Body(body), Some(expected)) => {
                    (compare(&compute_hash(body), &expected), &NoParams as &dyn ParamSource)
                }
                (WebhookParams::Form(form), _) => (true, form),
                _ => (true, &NoParams as &dyn ParamSource),
            };

        if !valid_body_hash {
            return false;
        }

        compare(&self.compute_signature(&without_port(uri), signed), signature)
            || compare(&self.compute_signature(&with_port(uri), signed), signature)
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// First non-empty `bodySHA256` value in the query string of `uri`.
pub(crate) fn body_hash_param(uri: &str) -> Option<String> {
    let (_, query) = uri.split_once('?')?;
    let query = query.split_once('#').map_or(query, |(q, _)| q);

    url::form_urlencoded::parse(query.as_bytes()).find_map(|(name, value)| {
        (name == BODY_HASH_PARAM && !value.is_empty()).then(|| value.into_owned())
    })
}
