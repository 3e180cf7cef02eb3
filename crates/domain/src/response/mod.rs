//! Response types.

mod spec;

pub use spec::{BODY_SNIPPET_LIMIT, DecodeError, ResponseBody, ResponseSpec, StatusCode, snippet};
