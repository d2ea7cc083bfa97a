//! Ambient generator configuration.

use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Default interval between synthesized events.
pub const DEFAULT_CADENCE: Duration = Duration::from_millis(1000);

/// An ambient setting that cannot work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AmbientConfigError {
    #[error("ambient.cadence_ms must be > 0")]
    ZeroCadence,

    #[error("ambient.weights must have at least one positive weight")]
    NoPositiveWeight,
}

/// Relative weight of each synthesized category.
///
/// Weights are relative to their sum; zero disables a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AmbientWeights {
    pub disruption: u32,
    pub reroute: u32,
    pub inventory_delta: u32,
    pub truck_add: u32,
    pub tick: u32,
}

impl Default for AmbientWeights {
    fn default() -> Self {
        Self {
            disruption: 20,
            reroute: 20,
            inventory_delta: 20,
            truck_add: 20,
            tick: 20,
        }
    }
}

impl AmbientWeights {
    /// Only ever emit `tick`.
    pub fn ticks_only() -> Self {
        Self {
            disruption: 0,
            reroute: 0,
            inventory_delta: 0,
            truck_add: 0,
            tick: 1,
        }
    }

    /// Weights in [`Category::ALL`](crate::Category::ALL) order.
    pub fn as_array(&self) -> [u32; 5] {
        [
            self.disruption,
            self.reroute,
            self.inventory_delta,
            self.truck_add,
            self.tick,
        ]
    }

    pub fn total(&self) -> u64 {
        self.as_array().iter().map(|w| u64::from(*w)).sum()
    }
}

/// Configuration for the ambient generator.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AmbientConfig {
    /// Whether the composition root starts the generator at all.
    pub enabled: bool,

    /// Milliseconds between synthesized events.
    pub cadence_ms: u64,

    /// Fixed RNG seed. `None` seeds from OS entropy.
    pub seed: Option<u64>,

    pub weights: AmbientWeights,
}

impl Default for AmbientConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cadence_ms: DEFAULT_CADENCE.as_millis() as u64,
            seed: None,
            weights: AmbientWeights::default(),
        }
    }
}

impl AmbientConfig {
    /// Enable or disable the generator.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the interval between events.
    pub fn with_cadence(mut self, cadence: Duration) -> Self {
        self.cadence_ms = cadence.as_millis() as u64;
        self
    }

    /// Seed the generator for reproducible traffic.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the category weights.
    pub fn with_weights(mut self, weights: AmbientWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn cadence(&self) -> Duration {
        Duration::from_millis(self.cadence_ms)
    }

    /// Check the limits, reporting the first bad field.
    pub fn validate(&self) -> Result<(), AmbientConfigError> {
        if self.cadence_ms == 0 {
            return Err(AmbientConfigError::ZeroCadence);
        }
        if self.weights.total() == 0 {
            return Err(AmbientConfigError::NoPositiveWeight);
        }
        Ok(())
    }
}
