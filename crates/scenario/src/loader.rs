//! Scenario sources.

use crate::{Scenario, ScenarioError};
use opsfeed_types::{
    Corridor, EventBody, Focus, InventoryDelta, NodeId, Reroute, RerouteScope, TruckId, TruckUpdate,
};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Loads a scenario by id.
///
/// Loading is synchronous; scenarios are small local documents.
pub trait ScenarioLoader: Send + Sync {
    fn load(&self, id: &str) -> Result<Scenario, ScenarioError>;
}

/// Reads `<dir>/<id>.json`.
#[derive(Debug, Clone)]
pub struct JsonDirLoader {
    dir: PathBuf,
}

impl JsonDirLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path for a scenario id, or `None` if the id could escape the directory.
    pub fn path_for(&self, id: &str) -> Option<PathBuf> {
        let valid = !id.is_empty()
            && !id.contains("..")
            && !id.contains(['/', '\\'])
            && id.chars().all(|c| !c.is_control());
        valid.then(|| self.dir.join(format!("{id}.json")))
    }
}

impl ScenarioLoader for JsonDirLoader {
    fn load(&self, id: &str) -> Result<Scenario, ScenarioError> {
        let path = self
            .path_for(id)
            .ok_or_else(|| ScenarioError::NotFound(id.to_string()))?;

        let text = std::fs::read_to_string(&path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => ScenarioError::NotFound(id.to_string()),
            _ => ScenarioError::Io {
                id: id.to_string(),
                source,
            },
        })?;

        debug!(scenario = id, path = %path.display(), "Loaded scenario file");
        Scenario::from_json(id, &text)
    }
}

/// Scenarios held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    scenarios: HashMap<String, Scenario>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loader holding the built-in scenarios (`demo`).
    pub fn builtin() -> Self {
        Self::new().with_scenario("demo", demo_scenario())
    }

    /// Add or replace a scenario.
    pub fn with_scenario(mut self, id: impl Into<String>, scenario: Scenario) -> Self {
        self.insert(id, scenario);
        self
    }

    pub fn insert(&mut self, id: impl Into<String>, scenario: Scenario) {
        self.scenarios.insert(id.into(), scenario);
    }

    /// Known ids, sorted.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.scenarios.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl ScenarioLoader for MemoryLoader {
    fn load(&self, id: &str) -> Result<Scenario, ScenarioError> {
        self.scenarios
            .get(id)
            .cloned()
            .ok_or_else(|| ScenarioError::NotFound(id.to_string()))
    }
}

/// Tries `primary`, then `secondary` when the primary has no such scenario.
///
/// Any other primary failure is returned as is.
#[derive(Debug, Clone)]
pub struct FallbackLoader<P, S> {
    primary: P,
    secondary: S,
}

impl<P, S> FallbackLoader<P, S> {
    pub fn new(primary: P, secondary: S) -> Self {
        Self { primary, secondary }
    }
}

impl<P: ScenarioLoader, S: ScenarioLoader> ScenarioLoader for FallbackLoader<P, S> {
    fn load(&self, id: &str) -> Result<Scenario, ScenarioError> {
        match self.primary.load(id) {
            Err(e) if e.is_not_found() => self.secondary.load(id),
            other => other,
        }
    }
}

/// Delhi–Hyderabad outage: disrupt, reroute through Mumbai, recover.
fn demo_scenario() -> Scenario {
    let wh = |n: u32| NodeId::parse(&format!("WH{n}"));
    let (Some(delhi), Some(mumbai), Some(hyderabad)) = (wh(1), wh(2), wh(4)) else {
        return Scenario::new();
    };
    let ms = Duration::from_millis;

    Scenario::new()
        .then_after(
            ms(0),
            EventBody::Focus(Focus {
                target: delhi.clone(),
            }),
        )
        .then_after(
            ms(800),
            EventBody::Disruption(Corridor::new(delhi.clone(), hyderabad.clone())),
        )
        .then_after(
            ms(1200),
            EventBody::Reroute(Reroute {
                path: vec![delhi.clone(), mumbai.clone(), hyderabad.clone()],
                scope: RerouteScope::Paused,
            }),
        )
        .then_after(
            ms(1000),
            EventBody::TruckUpdate(TruckUpdate {
                id: TruckId::from_number(12),
                at: Some(mumbai),
                status: Some("rerouted".to_string()),
                eta_min: Some(95),
            }),
        )
        .then_after(
            ms(1500),
            EventBody::InventoryDelta(InventoryDelta {
                wh: hyderabad.clone(),
                delta: -8,
                reason: "delayed inbound".to_string(),
            }),
        )
        .then_at(
            ms(8000),
            EventBody::Correct(Corridor::new(delhi, hyderabad)),
        )
}
