//! Shared preconditions supplied to every case.

use probe_domain::Headers;

/// Supplies the header set each case sends.
///
/// Pure and deterministic: every call within a run returns the same headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderFixture {
    headers: Headers,
}

impl HeaderFixture {
    /// Creates a fixture from an explicit header set.
    #[must_use]
    pub const fn new(headers: Headers) -> Self {
        Self { headers }
    }

    /// Returns the headers for the next request.
    #[must_use]
    pub fn provide_headers(&self) -> Headers {
        self.headers.clone()
    }
}

impl Default for HeaderFixture {
    /// A JSON content-type declaration and nothing else; the target needs no auth.
    fn default() -> Self {
        Self::new(Headers::json())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_declares_json() {
        let headers = HeaderFixture::default().provide_headers();
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("Content-Type"), Some("application/json"));
        assert_eq!(headers.get("Authorization"), None);
    }

    #[test]
    fn test_provision_is_deterministic() {
        let fixture = HeaderFixture::new(Headers::json().with("X-Suite", "users"));
        assert_eq!(fixture.provide_headers(), fixture.provide_headers());
    }
}
