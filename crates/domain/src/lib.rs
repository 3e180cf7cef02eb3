//! Probe Domain - Core contract testing types
//!
//! This crate defines the data model for the Probe contract test harness.
//! All types here are pure Rust with no I/O dependencies.

pub mod error;
pub mod report;
pub mod request;
pub mod response;
pub mod testing;

pub use error::{DomainError, DomainResult};
pub use report::{ReportEntry, Severity};
pub use request::{Header, Headers, HttpMethod, RequestSpec};
pub use response::{BODY_SNIPPET_LIMIT, DecodeError, ResponseBody, ResponseSpec, StatusCode};
pub use testing::{
    AssertionFailure, CaseOutcome, CasePhase, CaseResult, Check, Expectation, RunSummary,
};
