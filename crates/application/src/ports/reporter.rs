//! Reporting sink port

use probe_domain::{ReportEntry, Severity};

/// Sink for the human-readable INFO/SUCCESS/FAILURE trace.
///
/// Kept separate from fixtures so setup logic can be tested without
/// capturing output streams.
pub trait Reporter {
    /// Appends one entry to the trace.
    fn log(&mut self, entry: ReportEntry);

    /// Appends an entry with the given severity.
    fn report(&mut self, severity: Severity, message: &str) {
        self.log(ReportEntry::new(severity, message));
    }

    /// Appends an INFO entry.
    fn info(&mut self, message: &str) {
        self.report(Severity::Info, message);
    }

    /// Appends a SUCCESS entry.
    fn success(&mut self, message: &str) {
        self.report(Severity::Success, message);
    }

    /// Appends a FAILURE entry.
    fn failure(&mut self, message: &str) {
        self.report(Severity::Failure, message);
    }
}

impl Reporter for Vec<ReportEntry> {
    fn log(&mut self, entry: ReportEntry) {
        self.push(entry);
    }
}
