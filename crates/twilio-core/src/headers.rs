//! Response headers and ETag access.
//!
//! Every resource returned by the REST client carries the headers of the
//! response that produced it. The `ETag` header identifies the resource
//! version and can be sent back as an `If-Match` precondition to make an
//! update conditional.

use std::collections::HashMap;
use std::ops::Deref;

/// Name of the entity-tag header.
pub const ETAG: &str = "ETag";

/// Response headers with case-insensitive lookup.
///
/// Names are kept as received and in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHeaders {
    entries: Vec<(String, String)>,
}

impl ResponseHeaders {
    /// Create an empty header set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a header.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// First value for `name`, compared case-insensitively.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// The `ETag` header value, if the response carried one.
    #[must_use]
    pub fn etag(&self) -> Option<&str> {
        self.get(ETAG)
    }

    /// Iterate over `(name, value)` pairs in arrival order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of headers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no headers were received.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ResponseHeaders {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl From<HashMap<String, String>> for ResponseHeaders {
    fn from(map: HashMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}

/// A resource payload together with the headers it arrived with.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource<T> {
    payload: T,
    headers: ResponseHeaders,
}

impl<T> Resource<T> {
    /// Wrap a payload and its response headers.
    #[must_use]
    pub fn new(payload: T, headers: ResponseHeaders) -> Self {
        Self { payload, headers }
    }

    /// The resource payload.
    #[must_use]
    pub fn payload(&self) -> &T {
        &self.payload
    }

    /// Headers of the response that produced this resource.
    #[must_use]
    pub fn headers(&self) -> &ResponseHeaders {
        &self.headers
    }

    /// The resource version, for use with `If-Match` on a later update.
    #[must_use]
    pub fn etag(&self) -> Option<&str> {
        self.headers.etag()
    }

    /// Discard the headers.
    #[must_use]
    pub fn into_inner(self) -> T {
        self.payload
    }

    /// Split into payload and headers.
    #[must_use]
    pub fn into_parts(self) -> (T, ResponseHeaders) {
        (self.payload, self.headers)
    }
}

impl<T> Deref for Resource<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.payload
    }
}
