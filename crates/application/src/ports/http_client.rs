//! HTTP Client port

use std::future::Future;

use probe_domain::{request::RequestSpec, response::ResponseSpec};
use thiserror::Error;

/// Port for executing HTTP requests.
///
/// Each call is one fresh, independent round trip: no retries, no caching.
pub trait HttpClient: Send + Sync {
    /// Executes an HTTP request and returns the response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent or fails in transport.
    /// The body is returned undecoded, so its content never fails the call.
    fn execute(
        &self,
        request: &RequestSpec,
    ) -> impl Future<Output = Result<ResponseSpec, HttpClientError>> + Send;
}

/// Errors raised by an [`HttpClient`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HttpClientError {
    /// The request did not complete within the timeout.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout {
        /// Configured timeout in milliseconds.
        timeout_ms: u64,
    },

    /// The host name could not be resolved.
    #[error("could not resolve host '{host}': {message}")]
    DnsError {
        /// Host that failed to resolve.
        host: String,
        /// Underlying error message.
        message: String,
    },

    /// The remote refused the connection.
    #[error("connection refused by {host}:{port}")]
    ConnectionRefused {
        /// Target host.
        host: String,
        /// Target port.
        port: u16,
    },

    /// Any other connection failure.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The redirect limit was exceeded.
    #[error("too many redirects (max {max})")]
    TooManyRedirects {
        /// Redirect limit.
        max: usize,
    },

    /// The client rejected the request before sending it (URL or header).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The request body could not be serialized.
    #[error("invalid request body: {0}")]
    InvalidBody(String),

    /// Anything else.
    #[error("{0}")]
    Other(String),
}

impl HttpClientError {
    /// Returns true for network-level failures (connection, DNS, timeout).
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. }
                | Self::DnsError { .. }
                | Self::ConnectionRefused { .. }
                | Self::ConnectionFailed(_)
                | Self::TooManyRedirects { .. }
        )
    }
}
