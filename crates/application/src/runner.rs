//! Runs contract cases one after another and isolates their failures.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use probe_domain::{CaseOutcome, CasePhase, CaseResult, RequestSpec, RunSummary};
use tracing::{debug, trace, warn};

use crate::cases::{ContractCase, SuiteConfig};
use crate::error::ApplicationResult;
use crate::fixture::HeaderFixture;
use crate::ports::{HttpClient, Reporter};
use crate::verifier::Verifier;

/// Drives each case through SETUP, REQUEST, VALIDATE and REPORT.
///
/// Cases run sequentially. A failing case reports exactly one FAILURE entry
/// and the next case still runs.
pub struct ContractRunner<C: HttpClient> {
    client: Arc<C>,
    config: SuiteConfig,
    fixture: HeaderFixture,
    verifier: Verifier,
}

impl<C: HttpClient> ContractRunner<C> {
    /// Creates a runner with the default JSON header fixture.
    pub fn new(client: Arc<C>, config: SuiteConfig) -> Self {
        Self {
            client,
            config,
            fixture: HeaderFixture::default(),
            verifier: Verifier::new(),
        }
    }

    /// Replaces the header fixture (builder pattern).
    #[must_use]
    pub fn with_fixture(mut self, fixture: HeaderFixture) -> Self {
        self.fixture = fixture;
        self
    }

    /// Runs every case in order and summarizes the outcomes.
    pub async fn run(&self, cases: &[ContractCase], reporter: &mut dyn Reporter) -> RunSummary {
        let started_at = Utc::now();
        let start = Instant::now();
        let mut results = Vec::with_capacity(cases.len());

        for case in cases {
            results.push(self.run_case(case, reporter).await);
        }

        RunSummary::new(started_at, results, start.elapsed())
    }

    /// Runs a single case; never fails, the outcome carries any error.
    pub async fn run_case(&self, case: &ContractCase, reporter: &mut dyn Reporter) -> CaseResult {
        let start = Instant::now();
        let result = self.execute(case, reporter).await;

        trace!(case = %case.name, phase = %CasePhase::Report, "entering phase");
        let outcome = match result {
            Ok(()) => {
                reporter.success(&format!("{} test passed", case.method));
                CaseOutcome::Passed
            }
            Err(error) => {
                let phase = error.phase();
                let kind = error.kind();
                warn!(case = %case.name, %phase, kind, %error, "case failed");
                reporter.failure(&format!(
                    "{} test failed during {phase} ({kind}): {error}",
                    case.method
                ));
                CaseOutcome::Failed {
                    phase,
                    reason: error.to_string(),
                }
            }
        };

        let duration = start.elapsed();
        debug!(case = %case.name, elapsed_ms = duration.as_millis(), "case finished");

        CaseResult {
            name: case.name.clone(),
            outcome,
            duration,
        }
    }

    async fn execute(&self, case: &ContractCase, reporter: &mut dyn Reporter) -> ApplicationResult<()> {
        trace!(case = %case.name, phase = %CasePhase::Setup, "entering phase");
        reporter.info("Preparing headers for API requests");
        let headers = self.fixture.provide_headers();
        reporter.info(&case.summary);
        let url = self.config.url_for(&case.path);
        let mut request = RequestSpec::new(case.method, &url, headers)?;
        if let Some(payload) = &case.payload {
            request = request.with_json_body(payload.to_json())?;
        }

        trace!(case = %case.name, phase = %CasePhase::Request, "entering phase");
        debug!(
            case = %case.name,
            method = %case.method,
            %url,
            headers = request.headers().len(),
            "sending request"
        );
        let response = self.client.execute(&request).await?;
        debug!(
            case = %case.name,
            status = response.status.as_u16(),
            elapsed_ms = response.duration.as_millis(),
            "response received"
        );

        trace!(case = %case.name, phase = %CasePhase::Validate, "entering phase");
        self.verifier.verify(&response, &case.expectation, reporter)
    }
}
