//! Command-line flags.

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use probe_infrastructure::HarnessConfig;

/// Contract tests for a users REST API.
///
/// Runs GET, POST, PUT and DELETE cases against `{base-url}/users` and exits
/// non-zero if any case fails. Flags override the configuration file and
/// `PROBE_*` environment variables.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "probe", version, about)]
pub struct Cli {
    /// TOML configuration file.
    #[arg(short, long, env = "PROBE_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Absolute URL prefix of the API under test.
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Identifier of an existing user.
    #[arg(long, value_name = "ID")]
    pub resource_id: Option<u64>,

    /// Expected name of that user.
    #[arg(long, value_name = "NAME")]
    pub resource_name: Option<String>,

    /// Per-request timeout in seconds.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Seed for reproducible payloads.
    #[arg(long)]
    pub seed: Option<u64>,

    /// User-Agent header value.
    #[arg(long, value_name = "AGENT")]
    pub user_agent: Option<String>,

    /// Only run cases whose name contains this text.
    #[arg(short, long, value_name = "NAME")]
    pub filter: Option<String>,

    /// Print case names and exit.
    #[arg(long)]
    pub list: bool,

    /// Increase diagnostic logging (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Applies flag values over a loaded configuration.
    pub fn apply_overrides(&self, config: &mut HarnessConfig) {
        if let Some(base_url) = &self.base_url {
            config.base_url.clone_from(base_url);
        }
        if let Some(resource_id) = self.resource_id {
            config.resource_id = resource_id;
        }
        if let Some(resource_name) = &self.resource_name {
            config.resource_name.clone_from(resource_name);
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = timeout;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.user_agent.is_some() {
            config.user_agent.clone_from(&self.user_agent);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::try_parse_from([
            "probe",
            "--base-url",
            "http://localhost:3000",
            "--timeout",
            "5",
            "--seed",
            "9",
            "-vv",
        ])
        .unwrap();
        let mut config = HarnessConfig::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.resource_id, 1);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_no_flags_keep_config() {
        let cli = Cli::try_parse_from(["probe", "--filter", "get"]).unwrap();
        let mut config = HarnessConfig::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config, HarnessConfig::default());
        assert_eq!(cli.filter.as_deref(), Some("get"));
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
