//! HTTP Client implementation using reqwest.
//!
//! This adapter implements the `HttpClient` port using the reqwest library.
//! Every call is a single round trip: no retries, no caching. Bodies are
//! tagged by content type and left undecoded.

use std::error::Error as _;
use std::time::{Duration, Instant};

use probe_application::ports::{HttpClient, HttpClientError};
use probe_domain::{
    request::{Header, Headers, HttpMethod, RequestSpec},
    response::{ResponseBody, ResponseSpec},
};
use reqwest::{Client, Method};

/// Timeout applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const MAX_REDIRECTS: usize = 10;

/// HTTP client implementation using reqwest.
pub struct ReqwestHttpClient {
    client: Client,
    timeout: Duration,
}

impl ReqwestHttpClient {
    /// Creates a new HTTP client with default settings.
    ///
    /// Default configuration:
    /// - Request timeout: 30 seconds
    /// - Follow redirects: up to 10
    /// - TLS verification: enabled
    /// - User-Agent: "probe/<version>"
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn new() -> Result<Self, HttpClientError> {
        Self::with_settings(DEFAULT_TIMEOUT, None)
    }

    /// Creates a client with an explicit timeout and optional user agent.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn with_settings(timeout: Duration, user_agent: Option<&str>) -> Result<Self, HttpClientError> {
        let default_agent = concat!("probe/", env!("CARGO_PKG_VERSION"));
        let client = Client::builder()
            .user_agent(user_agent.unwrap_or(default_agent))
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| HttpClientError::Other(e.to_string()))?;

        Ok(Self { client, timeout })
    }

    /// Configured request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Converts domain `HttpMethod` to reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    /// Serializes the JSON body, if any.
    fn build_body(
        builder: reqwest::RequestBuilder,
        body: Option<&serde_json::Value>,
    ) -> Result<reqwest::RequestBuilder, HttpClientError> {
        match body {
            None => Ok(builder),
            Some(value) => {
                let bytes = serde_json::to_vec(value)
                    .map_err(|e| HttpClientError::InvalidBody(format!("Invalid JSON: {e}")))?;
                Ok(builder.body(bytes))
            }
        }
    }

    /// Tags the body as JSON when the content type says so.
    fn classify_body(content_type: Option<&str>, bytes: &[u8]) -> ResponseBody {
        if bytes.is_empty() {
            return ResponseBody::default();
        }
        let raw = String::from_utf8_lossy(bytes).into_owned();
        if content_type.is_some_and(is_json_content_type) {
            ResponseBody::Json(raw)
        } else {
            ResponseBody::Text(raw)
        }
    }

    /// Maps reqwest errors to domain `HttpClientError`.
    fn map_error(error: &reqwest::Error, timeout_ms: u64) -> HttpClientError {
        if error.is_timeout() {
            return HttpClientError::Timeout { timeout_ms };
        }

        let host = || {
            error
                .url()
                .and_then(|u| u.host_str().map(ToString::to_string))
                .unwrap_or_else(|| "unknown".to_string())
        };

        if error.is_connect() {
            let message = error_chain(error);
            let lower = message.to_lowercase();
            if lower.contains("dns") || lower.contains("resolve") {
                return HttpClientError::DnsError {
                    host: host(),
                    message,
                };
            }
            if lower.contains("refused") {
                return HttpClientError::ConnectionRefused {
                    host: host(),
                    port: error
                        .url()
                        .and_then(url::Url::port_or_known_default)
                        .unwrap_or(80),
                };
            }
            return HttpClientError::ConnectionFailed(message);
        }

        if error.is_redirect() {
            return HttpClientError::TooManyRedirects { max: MAX_REDIRECTS };
        }

        if error.is_builder() {
            return HttpClientError::InvalidRequest(error_chain(error));
        }

        HttpClientError::Other(error_chain(error))
    }
}

/// Returns true for `application/json` and any `+json` structured suffix.
#[must_use]
pub fn is_json_content_type(content_type: &str) -> bool {
    content_type.parse::<mime::Mime>().is_ok_and(|m| {
        (m.type_() == mime::APPLICATION && m.subtype() == mime::JSON)
            || m.suffix() == Some(mime::JSON)
    })
}

/// Joins an error with all of its sources.
fn error_chain(error: &reqwest::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

impl HttpClient for ReqwestHttpClient {
    async fn execute(&self, request: &RequestSpec) -> Result<ResponseSpec, HttpClientError> {
        #[allow(clippy::cast_possible_truncation)]
        let timeout_ms = self.timeout.as_millis() as u64;

        let start = Instant::now();

        let mut builder = self
            .client
            .request(Self::to_reqwest_method(request.method()), request.url().clone());

        for header in request.headers() {
            builder = builder.header(&header.name, &header.value);
        }

        builder = Self::build_body(builder, request.body())?;

        let response = builder
            .send()
            .await
            .map_err(|e| Self::map_error(&e, timeout_ms))?;

        let status = response.status().as_u16();

        let headers: Headers = response
            .headers()
            .iter()
            .map(|(k, v)| Header::new(k.as_str(), v.to_str().unwrap_or("<binary>")))
            .collect();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Self::map_error(&e, timeout_ms))?;

        let duration = start.elapsed();

        let body = Self::classify_body(headers.get("content-type"), &bytes);

        Ok(ResponseSpec::new(request.id(), status, headers, body, duration))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request(method: HttpMethod, url: &str) -> RequestSpec {
        RequestSpec::new(method, url, Headers::json()).unwrap()
    }

    #[test]
    fn test_to_reqwest_method() {
        assert_eq!(
            ReqwestHttpClient::to_reqwest_method(HttpMethod::Get),
            Method::GET
        );
        assert_eq!(
            ReqwestHttpClient::to_reqwest_method(HttpMethod::Post),
            Method::POST
        );
        assert_eq!(
            ReqwestHttpClient::to_reqwest_method(HttpMethod::Put),
            Method::PUT
        );
        assert_eq!(
            ReqwestHttpClient::to_reqwest_method(HttpMethod::Delete),
            Method::DELETE
        );
    }

    #[test]
    fn test_client_creation() {
        let client = ReqwestHttpClient::new().unwrap();
        assert_eq!(client.timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_json_content_type_detection() {
        assert!(is_json_content_type("application/json"));
        assert!(is_json_content_type("application/json; charset=utf-8"));
        assert!(is_json_content_type("application/problem+json"));
        assert!(!is_json_content_type("text/html; charset=utf-8"));
        assert!(!is_json_content_type("not a mime"));
    }

    #[test]
    fn test_classify_body() {
        assert_eq!(
            ReqwestHttpClient::classify_body(Some("application/json"), br#"{"id":1}"#),
            ResponseBody::Json(r#"{"id":1}"#.to_string())
        );
        assert_eq!(
            ReqwestHttpClient::classify_body(Some("text/plain"), b"hello"),
            ResponseBody::Text("hello".to_string())
        );
        assert_eq!(
            ReqwestHttpClient::classify_body(Some("application/json"), b""),
            ResponseBody::default()
        );
        assert_eq!(
            ReqwestHttpClient::classify_body(None, b"{}"),
            ResponseBody::Text("{}".to_string())
        );
    }

    #[tokio::test]
    async fn test_get_decodes_json_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/1"))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1})))
            .mount(&server)
            .await;

        let client = ReqwestHttpClient::new().unwrap();
        let req = request(HttpMethod::Get, &format!("{}/users/1", server.uri()));
        let response = client.execute(&req).await.unwrap();

        assert_eq!(response.request_id, req.id());
        assert_eq!(response.status.as_u16(), 200);
        assert_eq!(response.body.decode_json().unwrap(), json!({"id": 1}));
    }

    #[tokio::test]
    async fn test_post_sends_json_body() {
        let server = MockServer::start().await;
        let payload = json!({"name": "Test User abc", "username": "testuser_abc"});
        Mock::given(method("POST"))
            .and(path("/users"))
            .and(body_json(&payload))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 11})))
            .expect(1)
            .mount(&server)
            .await;

        let client = ReqwestHttpClient::new().unwrap();
        let req = request(HttpMethod::Post, &format!("{}/users", server.uri()))
            .with_json_body(payload)
            .unwrap();
        let response = client.execute(&req).await.unwrap();

        assert_eq!(response.status.as_u16(), 201);
    }

    #[tokio::test]
    async fn test_malformed_json_response_is_returned_raw() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(404).set_body_raw("<html>Not Found</html>", "application/json"),
            )
            .mount(&server)
            .await;

        let client = ReqwestHttpClient::new().unwrap();
        let response = client
            .execute(&request(HttpMethod::Get, &server.uri()))
            .await
            .unwrap();

        assert_eq!(response.status.as_u16(), 404);
        assert_eq!(
            response.body,
            ResponseBody::Json("<html>Not Found</html>".to_string())
        );
        assert!(response.body.decode_json().is_err());
    }

    #[tokio::test]
    async fn test_invalid_header_value_is_invalid_request() {
        let client = ReqwestHttpClient::new().unwrap();
        let req = RequestSpec::new(
            HttpMethod::Get,
            "http://127.0.0.1:9/users/1",
            Headers::json().with("X-Trace", "line\nbreak"),
        )
        .unwrap();

        let err = client.execute(&req).await.unwrap_err();

        assert!(matches!(err, HttpClientError::InvalidRequest(_)), "{err:?}");
        assert!(!err.is_transport());
    }

    #[tokio::test]
    async fn test_plain_text_response_kept_as_text() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
            .mount(&server)
            .await;

        let client = ReqwestHttpClient::new().unwrap();
        let response = client
            .execute(&request(HttpMethod::Delete, &format!("{}/users/1", server.uri())))
            .await
            .unwrap();

        assert_eq!(response.status.as_u16(), 404);
        assert_eq!(response.body, ResponseBody::Text("Not Found".to_string()));
    }

    #[tokio::test]
    async fn test_timeout_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let client = ReqwestHttpClient::with_settings(Duration::from_millis(100), None).unwrap();
        let err = client
            .execute(&request(HttpMethod::Get, &server.uri()))
            .await
            .unwrap_err();

        assert_eq!(err, HttpClientError::Timeout { timeout_ms: 100 });
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let client = ReqwestHttpClient::with_settings(Duration::from_secs(5), None).unwrap();
        let err = client
            .execute(&request(HttpMethod::Get, &format!("http://127.0.0.1:{port}/users/1")))
            .await
            .unwrap_err();

        assert!(err.is_transport(), "{err:?}");
    }

    #[tokio::test]
    async fn test_custom_user_agent() {
        let server = MockServer::start().await;
        Mock::given(header("user-agent", "probe-ci/1.0"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client =
            ReqwestHttpClient::with_settings(DEFAULT_TIMEOUT, Some("probe-ci/1.0")).unwrap();
        let response = client
            .execute(&request(HttpMethod::Get, &server.uri()))
            .await
            .unwrap();

        assert_eq!(response.status.as_u16(), 200);
    }
}
