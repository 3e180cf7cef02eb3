//! Layered harness configuration.
//!
//! Sources, lowest precedence first: built-in defaults, an optional TOML
//! file, then `PROBE_*` environment variables. Command-line flags are
//! applied on top by the binary.

use std::path::Path;
use std::time::Duration;

use config::{Config, Environment, File, FileFormat};
use probe_application::SuiteConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Deployment the harness targets when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

/// Seed resource identifier at the default deployment.
pub const DEFAULT_RESOURCE_ID: u64 = 1;

/// Name of the seed resource at the default deployment.
pub const DEFAULT_RESOURCE_NAME: &str = "Leanne Graham";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Prefix of the environment variables read by [`HarnessConfig::load`].
pub const ENV_PREFIX: &str = "PROBE";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or deserialized.
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// One or more values are invalid.
    #[error("invalid configuration: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

/// Everything the harness needs to know about its target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Absolute URL prefix of the users API.
    pub base_url: String,
    /// Existing user the GET/PUT/DELETE cases address.
    pub resource_id: u64,
    /// Expected name of that user.
    pub resource_name: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Seed for payload generation; random per run when unset.
    #[serde(default)]
    pub seed: Option<u64>,
    /// User-Agent override.
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            resource_id: DEFAULT_RESOURCE_ID,
            resource_name: DEFAULT_RESOURCE_NAME.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            seed: None,
            user_agent: None,
        }
    }
}

impl HarnessConfig {
    /// Loads defaults, the optional file, and `PROBE_*` variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Load` if the file is missing or malformed, or a
    /// value has the wrong type.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(file, Environment::with_prefix(ENV_PREFIX))
    }

    fn load_with_env(file: Option<&Path>, env: Environment) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let mut builder = Config::builder()
            .set_default("base_url", defaults.base_url)?
            .set_default("resource_id", i64_default(defaults.resource_id))?
            .set_default("resource_name", defaults.resource_name)?
            .set_default("timeout_secs", i64_default(defaults.timeout_secs))?;

        if let Some(path) = file {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        }

        let loaded: Self = builder
            .add_source(env.try_parsing(true))
            .build()?
            .try_deserialize()?;

        tracing::debug!(?loaded, "configuration loaded");
        Ok(loaded)
    }

    /// Checks every field and reports all problems at once.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` listing each invalid field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        match Url::parse(&self.base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => errors.push(format!(
                "base_url must use http or https, got '{}'",
                url.scheme()
            )),
            Err(e) => errors.push(format!("base_url '{}' is not an absolute URL: {e}", self.base_url)),
        }

        if self.timeout_secs == 0 {
            errors.push("timeout_secs must be greater than zero".to_string());
        }

        if self.resource_name.trim().is_empty() {
            errors.push("resource_name must not be empty".to_string());
        }

        if self.user_agent.as_deref().is_some_and(|ua| ua.trim().is_empty()) {
            errors.push("user_agent must not be blank when set".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(errors))
        }
    }

    /// Per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The part of the configuration the contract cases consume.
    #[must_use]
    pub fn suite_config(&self) -> SuiteConfig {
        SuiteConfig::new(&*self.base_url, self.resource_id, &*self.resource_name)
    }
}

fn i64_default(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
