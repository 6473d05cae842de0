/// Well-known RTSP header names
pub mod names {
    /// Request sequence number, echoed by the server
    pub const CSEQ: &str = "CSeq";
    /// Body length in bytes
    pub const CONTENT_LENGTH: &str = "Content-Length";
    /// Body media type
    pub const CONTENT_TYPE: &str = "Content-Type";
    /// Method tokens the server supports (OPTIONS response)
    pub const PUBLIC: &str = "Public";
    /// Server-assigned session identifier
    pub const SESSION: &str = "Session";
    /// Media delivery negotiation (SETUP)
    pub const TRANSPORT: &str = "Transport";
    /// Client software identification
    pub const USER_AGENT: &str = "User-Agent";
}

/// RTSP header collection
///
/// Names compare case-insensitively; each name maps to an ordered sequence
/// of values, and insertion order of names is preserved on the wire.
#[derive(Debug, Clone, Default)]
pub struct Headers {
    inner: Vec<(String, Vec<String>)>,
}

impl Headers {
    /// Create empty headers
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.inner
            .iter()
            .position(|(n, _)| n.eq_ignore_ascii_case(name))
    }

    /// Set a header, replacing any existing values
    ///
    /// The casing of the new name is preserved.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(idx) = self.position(&name) {
            self.inner[idx] = (name, vec![value]);
        } else {
            self.inner.push((name, vec![value]));
        }
    }

    /// Append a value to a header, keeping existing values
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(idx) = self.position(&name) {
            self.inner[idx].1.push(value);
        } else {
            self.inner.push((name, vec![value]));
        }
    }

    /// Remove a header and all its values
    pub fn remove(&mut self, name: &str) {
        self.inner.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
    }

    /// Get the first value of a header (case-insensitive)
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.get_all(name)?.first().map(String::as_str)
    }

    /// Get all values of a header, in arrival order
    #[must_use]
    pub fn get_all(&self, name: &str) -> Option<&[String]> {
        self.position(name).map(|idx| self.inner[idx].1.as_slice())
    }

    /// Check if a header exists
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Split a list-valued header (e.g. `Public`) into ordered tokens
    ///
    /// Comma-separated, whitespace-trimmed; empty when the header is absent.
    #[must_use]
    pub fn token_list(&self, name: &str) -> Vec<String> {
        let Some(values) = self.get_all(name) else {
            return Vec::new();
        };
        values
            .iter()
            .flat_map(|v| v.split(','))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(ToString::to_string)
            .collect()
    }

    /// Get `CSeq` value
    #[must_use]
    pub fn cseq(&self) -> Option<u32> {
        self.get(names::CSEQ)?.parse().ok()
    }

    /// Get Content-Length value
    #[must_use]
    pub fn content_length(&self) -> Option<usize> {
        self.get(names::CONTENT_LENGTH)?.parse().ok()
    }

    /// Get Content-Type value
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.get(names::CONTENT_TYPE)
    }

    /// Get the first Session header value
    #[must_use]
    pub fn session(&self) -> Option<&str> {
        self.get(names::SESSION)
    }

    /// Iterate over `(name, value)` pairs in wire order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner
            .iter()
            .flat_map(|(n, vs)| vs.iter().map(move |v| (n.as_str(), v.as_str())))
    }

    /// Number of header values (not distinct names)
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.iter().map(|(_, vs)| vs.len()).sum()
    }

    /// Check if empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl FromIterator<(String, String)> for Headers {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (name, value) in iter {
            headers.append(name, value);
        }
        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_replaces_case_insensitively() {
        let mut headers = Headers::new();
        headers.set("Session", "AAA");
        headers.set("SESSION", "BBB");

        assert_eq!(headers.get("session"), Some("BBB"));
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn test_append_preserves_order() {
        let mut headers = Headers::new();
        headers.append("WWW-Authenticate", "Digest realm=\"a\"");
        headers.append("WWW-Authenticate", "Basic realm=\"a\"");

        let all = headers.get_all("www-authenticate").unwrap();
        assert_eq!(all.len(), 2);
        assert!(all[0].starts_with("Digest"));
        assert!(all[1].starts_with("Basic"));
    }

    #[test]
    fn test_get_returns_first_value() {
        let mut headers = Headers::new();
        headers.append("Session", "12345;timeout=60");
        headers.append("Session", "67890");

        assert_eq!(headers.session(), Some("12345;timeout=60"));
    }

    #[test]
    fn test_token_list() {
        let mut headers = Headers::new();
        headers.set("Public", "OPTIONS, DESCRIBE, SETUP, PLAY");

        assert_eq!(
            headers.token_list("Public"),
            vec!["OPTIONS", "DESCRIBE", "SETUP", "PLAY"]
        );
        assert!(headers.token_list("Allow").is_empty());
    }

    #[test]
    fn test_token_list_spans_repeated_headers() {
        let mut headers = Headers::new();
        headers.append("Public", "OPTIONS, SETUP");
        headers.append("Public", "TEARDOWN");

        assert_eq!(
            headers.token_list("public"),
            vec!["OPTIONS", "SETUP", "TEARDOWN"]
        );
    }

    #[test]
    fn test_typed_accessors() {
        let mut headers = Headers::new();
        headers.set("CSeq", "7");
        headers.set("Content-Length", "42");
        headers.set("Content-Type", "application/sdp");

        assert_eq!(headers.cseq(), Some(7));
        assert_eq!(headers.content_length(), Some(42));
        assert_eq!(headers.content_type(), Some("application/sdp"));
    }

    #[test]
    fn test_iter_wire_order() {
        let mut headers = Headers::new();
        headers.set("CSeq", "1");
        headers.append("Public", "OPTIONS");
        headers.append("Public", "PLAY");

        let pairs: Vec<_> = headers.iter().collect();
        assert_eq!(
            pairs,
            vec![("CSeq", "1"), ("Public", "OPTIONS"), ("Public", "PLAY")]
        );
    }

    #[test]
    fn test_remove() {
        let mut headers = Headers::new();
        headers.set("Transport", "RTP/AVP;unicast");
        headers.remove("TRANSPORT");

        assert!(!headers.contains("Transport"));
        assert!(headers.is_empty());
    }
}
