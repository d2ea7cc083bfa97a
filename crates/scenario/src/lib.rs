//! Scripted scenario playback.
//!
//! A scenario is an ordered list of events, each with a delay after the
//! previous step or an absolute offset from the start of the run. The
//! [`ScenarioScheduler`] loads a scenario through a [`ScenarioLoader`] and
//! publishes its steps into the hub at their scheduled times, tagged
//! `scenario`.
//!
//! Load failures never escape as panics or silent drops: the run publishes
//! exactly one `error` event describing the failure and stops.

mod config;
mod error;
mod loader;
mod scheduler;
mod script;

pub use config::{ScenarioConfig, DEFAULT_SCENARIO_DIR};
pub use error::ScenarioError;
pub use loader::{FallbackLoader, JsonDirLoader, MemoryLoader, ScenarioLoader};
pub use scheduler::ScenarioScheduler;
pub use script::{Scenario, ScenarioStep, StepTiming};
