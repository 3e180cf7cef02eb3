//! Probe - contract tests for a users REST API
//!
//! Wires the reqwest adapter, the stderr reporter and the layered
//! configuration into the contract runner.

pub mod cli;
pub mod logging;

use std::sync::Arc;

use probe_application::{
    ContractCase, ContractRunner, IdentifierGenerator, Reporter, select_cases, user_cases,
};
use probe_domain::{CaseOutcome, RunSummary};
use probe_infrastructure::{ConfigError, HarnessConfig, ReqwestHttpClient};

pub use cli::Cli;
pub use logging::init_logging;

/// Exit status when every selected case passed.
pub const EXIT_SUCCESS: u8 = 0;
/// Exit status when at least one case failed.
pub const EXIT_CASE_FAILURE: u8 = 1;
/// Exit status when the configuration is unusable.
pub const EXIT_CONFIG_ERROR: u8 = 2;

/// Loads the configuration and applies flag overrides.
///
/// # Errors
///
/// Returns a `ConfigError` if a source cannot be loaded or validation fails.
pub fn resolve_config(cli: &Cli) -> Result<HarnessConfig, ConfigError> {
    let mut config = HarnessConfig::load(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);
    config.validate()?;
    Ok(config)
}

/// Builds the selected cases for this run.
pub fn build_cases(config: &HarnessConfig, filter: Option<&str>) -> Vec<ContractCase> {
    let mut generator = IdentifierGenerator::with_optional_seed(config.seed);
    select_cases(user_cases(&config.suite_config(), &mut generator), filter)
}

/// Runs the selected cases against the configured deployment.
///
/// # Errors
///
/// Returns an error only if the HTTP client cannot be constructed; case
/// failures are carried in the summary.
pub async fn execute(
    config: &HarnessConfig,
    filter: Option<&str>,
    reporter: &mut dyn Reporter,
) -> anyhow::Result<RunSummary> {
    let client = ReqwestHttpClient::with_settings(config.timeout(), config.user_agent.as_deref())?;
    let cases = build_cases(config, filter);
    if cases.is_empty() {
        tracing::warn!(filter = ?filter, "no cases selected");
    }

    tracing::info!(
        base_url = %config.base_url,
        cases = cases.len(),
        seed = ?config.seed,
        "starting contract run"
    );

    let runner = ContractRunner::new(Arc::new(client), config.suite_config());
    Ok(runner.run(&cases, reporter).await)
}

/// Exit status for a finished run.
#[must_use]
pub const fn exit_status(summary: &RunSummary) -> u8 {
    if summary.all_passed() {
        EXIT_SUCCESS
    } else {
        EXIT_CASE_FAILURE
    }
}

/// Renders the per-case result lines and the totals.
#[must_use]
pub fn render_summary(summary: &RunSummary) -> String {
    let mut lines: Vec<String> = summary
        .results
        .iter()
        .map(|result| match &result.outcome {
            CaseOutcome::Passed => {
                format!("PASS {} ({}ms)", result.name, result.duration.as_millis())
            }
            CaseOutcome::Failed { phase, reason } => {
                format!("FAIL {} [{phase}] {reason}", result.name)
            }
        })
        .collect();
    lines.push(summary.to_string());
    lines.join("\n")
}
