//! Scenario source configuration.

use serde::Deserialize;
use std::path::PathBuf;

/// Default directory scanned for `<id>.json` scenario files.
pub const DEFAULT_SCENARIO_DIR: &str = "data/scenarios";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    /// Directory holding scenario documents. Built-in scenarios are used for
    /// ids with no file here.
    pub dir: PathBuf,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_SCENARIO_DIR),
        }
    }
}

impl ScenarioConfig {
    /// Set the scenario directory.
    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = dir.into();
        self
    }
}
