//! Expectations and case results.
//!
//! This module provides the declarative checks a case runs against a
//! response, and the records produced once a case or a whole run finishes.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The checks a response must satisfy, evaluated in declaration order:
/// status, then required keys, then field equalities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expectation {
    /// Exact expected status code.
    pub status: u16,
    /// Keys that must be present in the JSON object body.
    #[serde(default)]
    pub required_keys: BTreeSet<String>,
    /// Keys whose values must equal the given JSON values.
    #[serde(default)]
    pub field_equalities: BTreeMap<String, serde_json::Value>,
}

impl Expectation {
    /// Creates an expectation on the status code only.
    #[must_use]
    pub const fn status(status: u16) -> Self {
        Self {
            status,
            required_keys: BTreeSet::new(),
            field_equalities: BTreeMap::new(),
        }
    }

    /// Adds required keys (builder pattern).
    #[must_use]
    pub fn require_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_keys.extend(keys.into_iter().map(Into::into));
        self
    }

    /// Adds a field equality (builder pattern).
    #[must_use]
    pub fn field_equals(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.field_equalities.insert(key.into(), value.into());
        self
    }

    /// Returns true if any check needs to look inside the body.
    #[must_use]
    pub fn inspects_body(&self) -> bool {
        !self.required_keys.is_empty() || !self.field_equalities.is_empty()
    }
}

/// A validation stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Check {
    /// Status code equality.
    Status,
    /// Presence of required keys.
    RequiredKeys,
    /// Equality of field values.
    FieldValues,
}

impl Check {
    /// Get a human-readable description of this check.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Status => "status code",
            Self::RequiredKeys => "response structure",
            Self::FieldValues => "field values",
        }
    }
}

/// A failed check, with expected and actual values rendered for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionFailure {
    /// The stage that failed.
    pub check: Check,
    /// What the expectation declared.
    pub expected: String,
    /// What the response contained.
    pub actual: String,
    /// Explanation of the mismatch.
    pub message: String,
}

impl AssertionFailure {
    /// Creates a failure.
    #[must_use]
    pub fn new(
        check: Check,
        expected: impl Into<String>,
        actual: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            check,
            expected: expected.into(),
            actual: actual.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for AssertionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} check failed: {} (expected: {}, actual: {})",
            self.check.description(),
            self.message,
            self.expected,
            self.actual
        )
    }
}

impl std::error::Error for AssertionFailure {}

/// Lifecycle of a single case. Terminal on a failed `Validate` or after `Report`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CasePhase {
    /// Fixtures and payload are prepared.
    Setup,
    /// The request is in flight.
    Request,
    /// The response is checked against the expectation.
    Validate,
    /// The outcome is reported.
    Report,
}

impl fmt::Display for CasePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Setup => "setup",
            Self::Request => "request",
            Self::Validate => "validate",
            Self::Report => "report",
        })
    }
}

/// How a case ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CaseOutcome {
    /// All checks passed.
    Passed,
    /// The case stopped in `phase` for `reason`.
    Failed {
        /// Phase the case was in when it failed.
        phase: CasePhase,
        /// Rendered failure detail.
        reason: String,
    },
}

impl CaseOutcome {
    /// Returns true if the case passed.
    #[must_use]
    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }
}

/// Result of running one case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseResult {
    /// Case name.
    pub name: String,
    /// Outcome.
    pub outcome: CaseOutcome,
    /// Wall time spent on the case.
    pub duration: Duration,
}

/// Results from running a set of cases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// Per-case results, in execution order.
    pub results: Vec<CaseResult>,
    /// Total number of cases run.
    pub total: usize,
    /// Number of passed cases.
    pub passed: usize,
    /// Number of failed cases.
    pub failed: usize,
    /// Wall time for the whole run.
    pub duration: Duration,
}

impl RunSummary {
    /// Create a summary from case results.
    #[must_use]
    pub fn new(started_at: DateTime<Utc>, results: Vec<CaseResult>, duration: Duration) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|r| r.outcome.is_passed()).count();
        let failed = total - passed;

        Self {
            started_at,
            results,
            total,
            passed,
            failed,
            duration,
        }
    }

    /// Check if all cases passed.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Get pass rate as percentage.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            (self.passed as f64 / self.total as f64) * 100.0
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} passed, {} failed ({} total, {:.0}% pass rate) in {}ms",
            self.passed,
            self.failed,
            self.total,
            self.pass_rate(),
            self.duration.as_millis()
        )
    }
}
