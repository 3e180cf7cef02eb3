//! Infrastructure adapters

mod reqwest_client;

pub use reqwest_client::{DEFAULT_TIMEOUT, ReqwestHttpClient, is_json_content_type};
