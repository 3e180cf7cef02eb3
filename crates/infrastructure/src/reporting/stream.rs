//! Writes the INFO/SUCCESS/FAILURE trace to a byte stream.

use std::io::{self, Stderr, Write};

use probe_application::ports::Reporter;
use probe_domain::ReportEntry;

/// Reporter printing each entry as `"\n{SEVERITY}: {message}"`.
///
/// Entries are flushed immediately so the trace interleaves correctly with
/// other stderr output. Each entry is also emitted as a `debug` tracing event.
#[derive(Debug)]
pub struct StreamReporter<W: Write> {
    writer: W,
}

impl StreamReporter<Stderr> {
    /// Reporter writing to the process error stream.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write> StreamReporter<W> {
    /// Reporter writing to `writer`.
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_entry(&mut self, entry: &ReportEntry) -> io::Result<()> {
        writeln!(self.writer, "\n{entry}")?;
        self.writer.flush()
    }
}

impl<W: Write> Reporter for StreamReporter<W> {
    fn log(&mut self, entry: ReportEntry) {
        tracing::debug!(severity = %entry.severity, message = %entry.message, "report entry");
        if let Err(error) = self.write_entry(&entry) {
            tracing::warn!(%error, "failed to write report entry");
        }
    }
}
