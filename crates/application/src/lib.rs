//! Probe Application - Contract cases and their execution
//!
//! This crate defines the harness core:
//! - Port traits for the HTTP client and the report sink
//! - The header fixture and random identifier generator
//! - The verifier and the users contract cases
//! - The runner driving each case through its lifecycle

pub mod cases;
pub mod error;
pub mod fixture;
pub mod generator;
pub mod ports;
pub mod runner;
pub mod verifier;

pub use cases::{ContractCase, SuiteConfig, UserPayload, select_cases, user_cases};
pub use error::{ApplicationError, ApplicationResult};
pub use fixture::HeaderFixture;
pub use generator::IdentifierGenerator;
pub use ports::{HttpClient, HttpClientError, Reporter};
pub use runner::ContractRunner;
pub use verifier::Verifier;
