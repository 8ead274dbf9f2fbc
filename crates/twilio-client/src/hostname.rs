//! Region and edge routing.
//!
//! Twilio hosts have the shape `<prefix>[.<edge>][.<region>].twilio.com`.
//! Tokens already present in a URI are kept unless the client configuration
//! overrides them.

use tracing::debug;
use twilio_core::UriParts;

/// Region used when an edge is configured without one.
pub const DEFAULT_REGION: &str = "us1";

/// Rewrite the host of `uri` for the given edge and region.
///
/// The path and query are left as written. Applying the same settings to an
/// already-resolved URI returns it unchanged.
#[must_use]
pub fn resolve_hostname(uri: &str, edge: Option<&str>, region: Option<&str>) -> String {
    let edge = edge.filter(|e| !e.is_empty());
    let region = region.filter(|r| !r.is_empty());
    if edge.is_none() && region.is_none() {
        return uri.to_string();
    }

    let Some(parts) = UriParts::parse(uri) else {
        return uri.to_string();
    };

    let pieces: Vec<&str> = parts.host().split('.').collect();
    if pieces.len() < 3 {
        return uri.to_string();
    }

    let prefix = pieces[0];
    let suffix = &pieces[pieces.len() - 2..];
    let (uri_edge, uri_region) = match pieces.len() {
        4 => (None, Some(pieces[1])),
        5 => (Some(pieces[1]), Some(pieces[2])),
        _ => (None, None),
    };

    let edge = edge.or(uri_edge);
    let region = region
        .or(uri_region)
        .or(edge.map(|_| DEFAULT_REGION));

    let mut host = String::from(prefix);
    for token in [edge, region].into_iter().flatten() {
        host.push('.');
        host.push_str(token);
    }
    for piece in suffix {
        host.push('.');
        host.push_str(piece);
    }

    let resolved = parts.with_host(&host);
    if resolved != uri {
        debug!(from = %parts.host(), to = %host, "Resolved API hostname");
    }
    resolved
}
