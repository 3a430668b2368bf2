use std::ops::{Range, RangeFrom};

use base64::{engine::general_purpose::STANDARD, Engine};

/// A parsed `[proto://][user:pass@]host[:port][/tail]` target.
pub struct TargetUrl {
    raw: String,
    proto: Range<usize>,
    authorization: Option<String>,
    host: Range<usize>,
    tail: RangeFrom<usize>,
}

impl TargetUrl {
    /// Get the protocol of the URL, "http" when none is given.
    pub fn get_proto(&self) -> &str {
        match &self.raw[self.proto.clone()] {
            "" => "http",
            proto => proto,
        }
    }

    /// Check if this URL is using HTTPS.
    pub fn is_https(&self) -> bool {
        self.get_proto().eq_ignore_ascii_case("https")
    }

    /// Get the raw authorization header if provided.
    pub fn get_authorization(&self) -> &Option<String> {
        &self.authorization
    }

    /// Get the host from the URL.
    /// Note: It's in the format of host:port, with :port being optional.
    pub fn get_host(&self) -> &str {
        &self.raw[self.host.clone()]
    }

    /// Get the hostname from the URL, without brackets around IPv6 literals.
    pub fn get_hostname(&self) -> &str {
        let host = self.get_host();
        if let Some(rest) = host.strip_prefix('[') {
            return rest.find(']').map_or(rest, |p| &rest[..p]);
        }
        host.find(':').map_or(host, |p| &host[..p])
    }

    /// Get the port from the URL, or the default port of the protocol.
    pub fn get_port(&self) -> &str {
        let host = self.get_host();
        // Skip a bracketed IPv6 literal before looking for the port separator.
        let start = host.find(']').unwrap_or(0);
        match host[start..].rfind(':') {
            Some(p) => &host[start + p + 1..],
            None if self.is_https() => "443",
            None => "80",
        }
    }

    /// Get the tail section of the URL, which includes the path and query string.
    pub fn get_tail(&self) -> &str {
        let a = &self.raw[self.tail.clone()];
        if a.is_empty() {
            "/"
        } else {
            a
        }
    }
}

impl From<String> for TargetUrl {
    fn from(raw: String) -> Self {
        let mut pos = 0;

        // Find the protocol section.
        let proto = if let Some(found) = raw[pos..].find("://") {
            let range = pos..pos + found;
            pos = pos + found + 3;
            range
        } else {
            pos..pos
        };

        // Find the authorization section, which ends with a "@" symbol before any slash.
        let authority_end = raw[pos..].find('/').map_or(raw.len(), |p| pos + p);
        let authorization = match raw[pos..authority_end].rfind('@') {
            Some(found) => {
                let value = STANDARD.encode(&raw[pos..pos + found]);
                pos = pos + found + 1;
                Some(format!("Authorization: Basic {}", value))
            }
            None => None,
        };

        // The host section ends with a slash or the end of input.
        let host = pos..authority_end;

        // Save the tail section.
        let tail = authority_end..;

        Self {
            raw,
            proto,
            authorization,
            host,
            tail,
        }
    }
}
