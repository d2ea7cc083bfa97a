//! Ambient traffic generator.
//!
//! Keeps the feed alive when nobody is driving it: on a fixed cadence the
//! generator draws a weighted category (disruption, reroute, inventory
//! change, new truck or plain tick), synthesizes a payload from the
//! warehouse map and publishes it to the hub tagged `engine`.
//!
//! Seeding the generator makes the traffic reproducible, which is how the
//! tests pin it down.

mod config;
mod generator;
mod workload;

pub use config::{AmbientConfig, AmbientConfigError, AmbientWeights, DEFAULT_CADENCE};
pub use generator::AmbientGenerator;
pub use workload::{AmbientWorkload, Category, INVENTORY_DELTAS, INVENTORY_REASON, TRUCK_NUMBERS};

use thiserror::Error;

/// Errors building an ambient generator.
#[derive(Debug, Error)]
pub enum AmbientError {
    #[error("invalid ambient config: {0}")]
    InvalidConfig(#[from] AmbientConfigError),

    #[error("invalid category weights: {0}")]
    Weights(#[from] rand::distributions::WeightedError),
}
