//! Outgoing request types.

mod header;
mod method;
mod spec;

pub use header::{Header, Headers, JSON_CONTENT_TYPE};
pub use method::HttpMethod;
pub use spec::RequestSpec;
