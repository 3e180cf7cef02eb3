//! Request specification type

use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use super::{Headers, HttpMethod};
use crate::error::{DomainError, DomainResult};

/// Complete, immutable specification for one HTTP request.
///
/// The `id` is time-ordered so that every [`ResponseSpec`](crate::response::ResponseSpec)
/// can be traced back to exactly one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestSpec {
    id: Uuid,
    method: HttpMethod,
    url: Url,
    #[serde(default)]
    headers: Headers,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    body: Option<serde_json::Value>,
}

impl RequestSpec {
    /// Creates a request without a body.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidUrl` if `url` is not an absolute
    /// `http` or `https` URI.
    pub fn new(method: HttpMethod, url: &str, headers: Headers) -> DomainResult<Self> {
        let url = Url::parse(url).map_err(|e| DomainError::InvalidUrl(format!("{e}: {url}")))?;
        Self::from_url(method, url, headers)
    }

    /// Creates a request from an already parsed URL.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidUrl` for schemes other than `http`/`https`.
    pub fn from_url(method: HttpMethod, url: Url, headers: Headers) -> DomainResult<Self> {
        if !matches!(url.scheme(), "http" | "https") {
            return Err(DomainError::InvalidUrl(format!(
                "unsupported scheme '{}': {url}",
                url.scheme()
            )));
        }
        Ok(Self {
            id: Uuid::now_v7(),
            method,
            url,
            headers,
            body: None,
        })
    }

    /// Attaches a JSON body.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidBody` when the method does not carry a body.
    pub fn with_json_body(mut self, body: serde_json::Value) -> DomainResult<Self> {
        if !self.method.has_body() {
            return Err(DomainError::InvalidBody(format!(
                "{} requests cannot carry a JSON body",
                self.method
            )));
        }
        self.body = Some(body);
        Ok(self)
    }

    /// Unique identifier of this request.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> HttpMethod {
        self.method
    }

    /// Absolute target URL.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Request headers.
    #[must_use]
    pub const fn headers(&self) -> &Headers {
        &self.headers
    }

    /// JSON body, if any.
    #[must_use]
    pub const fn body(&self) -> Option<&serde_json::Value> {
        self.body.as_ref()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_new_request() {
        let req =
            RequestSpec::new(HttpMethod::Get, "https://api.example.com/users/1", Headers::json())
                .unwrap();
        assert_eq!(req.method(), HttpMethod::Get);
        assert_eq!(req.url().path(), "/users/1");
        assert_eq!(req.headers().get("Content-Type"), Some("application/json"));
        assert!(req.body().is_none());
    }

    #[test]
    fn test_relative_url_rejected() {
        let err = RequestSpec::new(HttpMethod::Get, "/users/1", Headers::new()).unwrap_err();
        assert!(matches!(err, DomainError::InvalidUrl(_)));
    }

    #[test]
    fn test_non_http_scheme_rejected() {
        let err =
            RequestSpec::new(HttpMethod::Get, "ftp://example.com/users", Headers::new()).unwrap_err();
        assert!(matches!(err, DomainError::InvalidUrl(_)));
    }

    #[test]
    fn test_json_body_only_on_post_and_put() {
        let post = RequestSpec::new(HttpMethod::Post, "http://localhost/users", Headers::new())
            .unwrap()
            .with_json_body(json!({"name": "x"}))
            .unwrap();
        assert_eq!(post.body(), Some(&json!({"name": "x"})));

        let delete =
            RequestSpec::new(HttpMethod::Delete, "http://localhost/users/1", Headers::new())
                .unwrap()
                .with_json_body(json!({}));
        assert!(matches!(delete, Err(DomainError::InvalidBody(_))));
    }

    #[test]
    fn test_ids_are_unique() {
        let a = RequestSpec::new(HttpMethod::Get, "http://localhost/", Headers::new()).unwrap();
        let b = RequestSpec::new(HttpMethod::Get, "http://localhost/", Headers::new()).unwrap();
        assert_ne!(a.id(), b.id());
    }
}
