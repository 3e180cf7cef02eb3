//! Response specification type
//!
//! Contains the outcome of a single request: status, headers, raw body
//! and timing information.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::request::Headers;

/// Longest body excerpt carried in diagnostics.
pub const BODY_SNIPPET_LIMIT: usize = 200;

/// HTTP status code with semantic helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusCode(pub u16);

impl StatusCode {
    /// Creates a new `StatusCode`.
    #[must_use]
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Returns the numeric status code.
    #[must_use]
    pub const fn as_u16(&self) -> u16 {
        self.0
    }

    /// Returns the canonical reason phrase for common status codes.
    #[must_use]
    pub const fn reason_phrase(&self) -> &'static str {
        match self.0 {
            200 => "OK",
            201 => "Created",
            202 => "Accepted",
            204 => "No Content",
            301 => "Moved Permanently",
            302 => "Found",
            304 => "Not Modified",
            400 => "Bad Request",
            401 => "Unauthorized",
            403 => "Forbidden",
            404 => "Not Found",
            405 => "Method Not Allowed",
            409 => "Conflict",
            422 => "Unprocessable Entity",
            429 => "Too Many Requests",
            500 => "Internal Server Error",
            502 => "Bad Gateway",
            503 => "Service Unavailable",
            504 => "Gateway Timeout",
            _ => "Unknown",
        }
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.0, self.reason_phrase())
    }
}

impl From<u16> for StatusCode {
    fn from(code: u16) -> Self {
        Self(code)
    }
}

/// A body that could not be read as JSON.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
#[error("failed to decode JSON body: {message}; body: {snippet}")]
pub struct DecodeError {
    /// Parser or content-type diagnostic.
    pub message: String,
    /// Leading part of the raw body.
    pub snippet: String,
}

/// Raw response body, tagged with the format its content type declares.
///
/// Bodies are kept undecoded; [`ResponseBody::decode_json`] parses on demand
/// so a malformed body only matters to checks that read it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "raw", rename_all = "snake_case")]
pub enum ResponseBody {
    /// Content type declares JSON.
    Json(String),
    /// Any other content type, or an empty body.
    Text(String),
}

impl ResponseBody {
    /// The body exactly as received (lossily decoded as UTF-8).
    #[must_use]
    pub fn raw(&self) -> &str {
        match self {
            Self::Json(raw) | Self::Text(raw) => raw,
        }
    }

    /// Parses the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] carrying a snippet of the raw body when the
    /// content type is not JSON or the text does not parse.
    pub fn decode_json(&self) -> Result<serde_json::Value, DecodeError> {
        match self {
            Self::Json(raw) => serde_json::from_str(raw).map_err(|e| DecodeError {
                message: e.to_string(),
                snippet: snippet(raw, BODY_SNIPPET_LIMIT),
            }),
            Self::Text(raw) => Err(DecodeError {
                message: "response content type is not JSON".to_string(),
                snippet: snippet(raw, BODY_SNIPPET_LIMIT),
            }),
        }
    }
}

impl Default for ResponseBody {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

/// The outcome of one request. Write-once; read-only after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseSpec {
    /// Identifier of the request that produced this response.
    pub request_id: Uuid,
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: Headers,
    /// Undecoded response body
    pub body: ResponseBody,
    /// Round-trip time
    #[serde(with = "duration_millis")]
    pub duration: Duration,
}

impl ResponseSpec {
    /// Creates a new response for the given request.
    #[must_use]
    pub fn new(
        request_id: Uuid,
        status: impl Into<StatusCode>,
        headers: Headers,
        body: ResponseBody,
        duration: Duration,
    ) -> Self {
        Self {
            request_id,
            status: status.into(),
            headers,
            body,
            duration,
        }
    }

    /// Returns at most `limit` characters of the body for diagnostics.
    #[must_use]
    pub fn snippet(&self, limit: usize) -> String {
        snippet(self.body.raw(), limit)
    }
}

/// Truncates `text` to at most `limit` characters, appending `...` if cut.
#[must_use]
pub fn snippet(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    #[allow(clippy::cast_possible_truncation)]
    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn response(body: ResponseBody) -> ResponseSpec {
        ResponseSpec::new(
            Uuid::now_v7(),
            200,
            Headers::json(),
            body,
            Duration::from_millis(12),
        )
    }

    #[test]
    fn test_status_display() {
        assert_eq!(StatusCode::new(200).to_string(), "200 OK");
        assert_eq!(StatusCode::new(201).to_string(), "201 Created");
        assert_eq!(StatusCode::new(599).reason_phrase(), "Unknown");
    }

    #[test]
    fn test_decode_json_body() {
        let body = ResponseBody::Json(r#"{"id": 1}"#.to_string());
        assert_eq!(body.decode_json().unwrap(), json!({"id": 1}));
    }

    #[test]
    fn test_malformed_json_keeps_snippet() {
        let err = ResponseBody::Json("<html>Not Found</html>".to_string())
            .decode_json()
            .unwrap_err();
        assert_eq!(err.snippet, "<html>Not Found</html>");
        assert!(err.to_string().contains("body: <html>Not Found</html>"));
    }

    #[test]
    fn test_text_body_is_not_json() {
        let err = ResponseBody::Text("{}".to_string()).decode_json().unwrap_err();
        assert_eq!(err.message, "response content type is not JSON");
        assert_eq!(err.snippet, "{}");
    }

    #[test]
    fn test_long_body_snippet_is_truncated() {
        let raw = "x".repeat(BODY_SNIPPET_LIMIT + 50);
        let err = ResponseBody::Json(raw).decode_json().unwrap_err();
        assert_eq!(err.snippet.len(), BODY_SNIPPET_LIMIT + 3);
        assert!(err.snippet.ends_with("..."));
    }

    #[test]
    fn test_snippet_truncates_on_char_boundary() {
        assert_eq!(snippet("abcdef", 3), "abc...");
        assert_eq!(snippet("abc", 3), "abc");
        assert_eq!(snippet("ééé", 2), "éé...");
        assert_eq!(snippet("", 5), "");
    }

    #[test]
    fn test_empty_body_defaults_to_text() {
        assert_eq!(ResponseBody::default(), ResponseBody::Text(String::new()));
        assert_eq!(response(ResponseBody::default()).snippet(10), "");
    }
}
