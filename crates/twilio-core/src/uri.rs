//! URI authority helpers.
//!
//! Signatures are computed over the exact URL string the provider requested,
//! so these helpers slice the string instead of parsing and re-serialising
//! it (a URL library would normalise default ports and empty paths away).

/// An absolute URI split around its authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UriParts<'a> {
    scheme: &'a str,
    userinfo: Option<&'a str>,
    host: &'a str,
    port: Option<&'a str>,
    rest: &'a str,
}

impl<'a> UriParts<'a> {
    /// Split `scheme://[userinfo@]host[:port]<rest>`.
    ///
    /// Returns `None` if `uri` is not absolute or has no host.
    #[must_use]
    pub fn parse(uri: &'a str) -> Option<Self> {
        let (scheme, after) = uri.split_once("://")?;
        if scheme.is_empty() {
            return None;
        }

        let end = after
            .find(|c: char| matches!(c, '/' | '?' | '#'))
            .unwrap_or(after.len());
        let (authority, rest) = after.split_at(end);

        let (userinfo, host_port) = match authority.rfind('@') {
            Some(at) => (Some(&authority[..at]), &authority[at + 1..]),
            None => (None, authority),
        };

        let (host, port) = split_port(host_port);
        if host.is_empty() {
            return None;
        }

        Some(Self {
            scheme,
            userinfo,
            host,
            port,
            rest,
        })
    }

    /// The scheme, without `://`.
    #[must_use]
    pub fn scheme(&self) -> &'a str {
        self.scheme
    }

    /// The host, without userinfo or port.
    #[must_use]
    pub fn host(&self) -> &'a str {
        self.host
    }

    /// The explicit port, if one was written.
    #[must_use]
    pub fn port(&self) -> Option<u16> {
        self.port.and_then(|p| p.parse().ok())
    }

    /// Whether the URI spells out a port.
    #[must_use]
    pub fn has_port(&self) -> bool {
        self.port.is_some()
    }

    /// Path, query and fragment, exactly as written.
    #[must_use]
    pub fn rest(&self) -> &'a str {
        self.rest
    }

    /// The raw query string (without `?` and fragment).
    #[must_use]
    pub fn query(&self) -> Option<&'a str> {
        let (_, query) = self.rest.split_once('?')?;
        Some(query.split_once('#').map_or(query, |(q, _)| q))
    }

    /// Default port for the scheme: 443 for `https`, 80 otherwise.
    #[must_use]
    pub fn default_port(&self) -> u16 {
        if self.scheme.eq_ignore_ascii_case("https") {
            443
        } else {
            80
        }
    }

    /// Reassemble the URI with a different host, keeping everything else.
    #[must_use]
    pub fn with_host(&self, host: &str) -> String {
        self.assemble(host, self.port)
    }

    fn assemble(&self, host: &str, port: Option<&str>) -> String {
        let mut out = String::with_capacity(
            self.scheme.len() + host.len() + self.rest.len() + 16,
        );
        out.push_str(self.scheme);
        out.push_str("://");
        if let Some(userinfo) = self.userinfo {
            out.push_str(userinfo);
            out.push('@');
        }
        out.push_str(host);
        if let Some(port) = port {
            out.push(':');
            out.push_str(port);
        }
        out.push_str(self.rest);
        out
    }
}

/// Split `host[:port]`, keeping IPv6 literals (`[::1]:8080`) intact.
fn split_port(host_port: &str) -> (&str, Option<&str>) {
    let search_from = if host_port.starts_with('[') {
        match host_port.find(']') {
            Some(close) => close,
            None => return (host_port, None),
        }
    } else {
        0
    };

    match host_port[search_from..].rfind(':') {
        Some(offset) => {
            let colon = search_from + offset;
            let port = &host_port[colon + 1..];
            if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) {
                (&host_port[..colon], Some(port))
            } else {
                (host_port, None)
            }
        }
        None => (host_port, None),
    }
}

/// The URI with an explicit port, adding the scheme default if absent.
///
/// Non-absolute input is returned unchanged.
#[must_use]
pub fn with_port(uri: &str) -> String {
    match UriParts::parse(uri) {
        Some(parts) if !parts.has_port() => {
            let port = parts.default_port().to_string();
            parts.assemble(parts.host, Some(port.as_str()))
        }
        _ => uri.to_string(),
    }
}

/// The URI with any explicit port removed.
///
/// Non-absolute input is returned unchanged.
#[must_use]
pub fn without_port(uri: &str) -> String {
    match UriParts::parse(uri) {
        Some(parts) if parts.has_port() => parts.assemble(parts.host, None),
        _ => uri.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_authority() {
        let parts = UriParts::parse("https://user:pw@mycompany.com:8080/myapp.php?foo=1#frag").unwrap();
        assert_eq!(parts.scheme(), "https");
        assert_eq!(parts.host(), "mycompany.com");
        assert_eq!(parts.port(), Some(8080));
        assert_eq!(parts.rest(), "/myapp.php?foo=1#frag");
        assert_eq!(parts.query(), Some("foo=1"));
    }

    #[test]
    fn parse_rejects_relative_uris() {
        assert!(UriParts::parse("/myapp.php").is_none());
        assert!(UriParts::parse("https:///path").is_none());
    }

    #[test]
    fn with_port_adds_scheme_default() {
        assert_eq!(
            with_port("https://mycompany.com/myapp.php?foo=1"),
            "https://mycompany.com:443/myapp.php?foo=1"
        );
        assert_eq!(with_port("http://mycompany.com"), "http://mycompany.com:80");
    }

    #[test]
    fn with_port_keeps_explicit_port() {
        assert_eq!(
            with_port("https://mycompany.com:1234/myapp.php"),
            "https://mycompany.com:1234/myapp.php"
        );
    }

    #[test]
    fn without_port_strips_only_the_port() {
        assert_eq!(
            without_port("https://user:pw@mycompany.com:443/myapp.php?a=b:c"),
            "https://user:pw@mycompany.com/myapp.php?a=b:c"
        );
        assert_eq!(
            without_port("https://mycompany.com/myapp.php"),
            "https://mycompany.com/myapp.php"
        );
    }

    #[test]
    fn ipv6_hosts_keep_their_colons() {
        assert_eq!(with_port("http://[::1]/hook"), "http://[::1]:80/hook");
        assert_eq!(without_port("http://[::1]:8080/hook"), "http://[::1]/hook");
    }

    #[test]
    fn with_host_preserves_path_and_query() {
        let parts = UriParts::parse("https://api.twilio.com/path/to/something.json?foo=12.34").unwrap();
        assert_eq!(
            parts.with_host("api.edge.region.twilio.com"),
            "https://api.edge.region.twilio.com/path/to/something.json?foo=12.34"
        );
    }
}
