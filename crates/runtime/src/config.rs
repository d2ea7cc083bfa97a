//! Feed configuration file.

use crate::telemetry::TelemetryConfig;
use opsfeed_ambient::{AmbientConfig, AmbientError};
use opsfeed_hub::{HubConfig, HubConfigError};
use opsfeed_scenario::ScenarioConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

/// Errors loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Hub(#[from] HubConfigError),

    #[error("invalid configuration: {0}")]
    Ambient(#[from] AmbientError),

    #[error("invalid configuration: telemetry.log_filter {filter:?}: {source}")]
    LogFilter {
        filter: String,
        #[source]
        source: ParseError,
    },
}

impl ConfigError {
    /// True for a well-formed file whose values cannot work.
    pub fn is_invalid(&self) -> bool {
        matches!(
            self,
            ConfigError::Hub(_) | ConfigError::Ambient(_) | ConfigError::LogFilter { .. }
        )
    }
}

/// Top-level configuration. Every section is optional.
///
/// ```toml
/// [hub]
/// history_capacity = 500
/// subscriber_queue = 256
/// max_lag_strikes = 3
///
/// [ambient]
/// enabled = true
/// cadence_ms = 1000
///
/// [scenarios]
/// dir = "data/scenarios"
///
/// [telemetry]
/// log_filter = "info"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeedConfig {
    pub hub: HubConfig,
    pub ambient: AmbientConfig,
    pub scenarios: ScenarioConfig,
    pub telemetry: TelemetryConfig,
}

impl FeedConfig {
    /// Load and validate a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &text)
    }

    /// Parse and validate TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Self::parse(Path::new("<inline>"), text)
    }

    fn parse(path: &Path, text: &str) -> Result<Self, ConfigError> {
        let config: FeedConfig = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_hub(mut self, hub: HubConfig) -> Self {
        self.hub = hub;
        self
    }

    pub fn with_ambient(mut self, ambient: AmbientConfig) -> Self {
        self.ambient = ambient;
        self
    }

    pub fn with_scenarios(mut self, scenarios: ScenarioConfig) -> Self {
        self.scenarios = scenarios;
        self
    }

    pub fn with_telemetry(mut self, telemetry: TelemetryConfig) -> Self {
        self.telemetry = telemetry;
        self
    }

    /// Check every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.hub.validate()?;
        self.ambient.validate().map_err(AmbientError::from)?;
        EnvFilter::try_new(&self.telemetry.log_filter).map_err(|source| {
            ConfigError::LogFilter {
                filter: self.telemetry.log_filter.clone(),
                source,
            }
        })?;
        Ok(())
    }
}
