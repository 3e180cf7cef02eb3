//! Report sinks.

mod stream;

pub use stream::StreamReporter;
