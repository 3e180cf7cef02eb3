//! Application error types

use probe_domain::{AssertionFailure, CasePhase, DecodeError, DomainError};
use thiserror::Error;

use crate::ports::HttpClientError;

/// Everything that can stop a single case.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// The request could not be built.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// The request could not be sent or failed in transport.
    #[error("HTTP error: {0}")]
    Http(#[from] HttpClientError),

    /// A check needed the body as JSON and it is not.
    #[error("{0}")]
    Decode(#[from] DecodeError),

    /// The response violated the expectation.
    #[error("{0}")]
    Assertion(#[from] AssertionFailure),
}

impl ApplicationError {
    /// The case phase this error belongs to.
    #[must_use]
    pub const fn phase(&self) -> CasePhase {
        match self {
            Self::Domain(_) => CasePhase::Setup,
            Self::Http(_) => CasePhase::Request,
            Self::Decode(_) | Self::Assertion(_) => CasePhase::Validate,
        }
    }

    /// Short label for the failure category.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Domain(_) => "setup error",
            Self::Http(error) if error.is_transport() => "transport error",
            Self::Http(_) => "request error",
            Self::Decode(_) => "decode error",
            Self::Assertion(_) => "assertion failure",
        }
    }
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
