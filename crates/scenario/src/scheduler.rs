//! Timed playback of scenarios into the hub.

use crate::{ScenarioError, ScenarioLoader};
use opsfeed_hub::EventHub;
use opsfeed_types::{EventBody, EventDraft, Source};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{info, warn};

/// Plays scenarios from a loader into a hub.
///
/// Each run is independent: concurrent runs of the same or different
/// scenarios interleave only through the hub's global order.
#[derive(Clone)]
pub struct ScenarioScheduler {
    loader: Arc<dyn ScenarioLoader>,
    tracker: TaskTracker,
    shutdown: CancellationToken,
}

impl ScenarioScheduler {
    pub fn new(loader: Arc<dyn ScenarioLoader>) -> Self {
        Self {
            loader,
            tracker: TaskTracker::new(),
            shutdown: CancellationToken::new(),
        }
    }

    /// Play scenario `id` to completion.
    ///
    /// If the scenario cannot be loaded, a single `error` event is published
    /// and the error returned. Otherwise returns the number of events
    /// published.
    pub async fn run(&self, id: &str, hub: &EventHub) -> Result<usize, ScenarioError> {
        let scenario = match self.loader.load(id) {
            Ok(scenario) => scenario,
            Err(e) => {
                warn!(scenario = id, error = %e, "Scenario load failed");
                hub.publish(EventDraft::new(
                    Source::Scenario,
                    EventBody::error(e.user_message()),
                ));
                return Err(e);
            }
        };

        let steps = scenario.len();
        info!(scenario = id, steps, "Scenario started");

        let start = Instant::now();
        let offsets = scenario.offsets();
        for (step, offset) in scenario.steps.into_iter().zip(offsets) {
            tokio::time::sleep_until(start + offset).await;
            hub.publish(EventDraft::new(Source::Scenario, step.body));
        }

        info!(scenario = id, steps, "Scenario finished");
        Ok(steps)
    }

    /// Start a run in the background.
    ///
    /// The run stops early, between steps, if [`shutdown`](Self::shutdown) is
    /// called. The handle yields `None` in that case.
    pub fn spawn(
        &self,
        id: impl Into<String>,
        hub: EventHub,
    ) -> JoinHandle<Option<Result<usize, ScenarioError>>> {
        let id = id.into();
        let scheduler = self.clone();
        self.tracker.spawn(async move {
            tokio::select! {
                biased;
                _ = scheduler.shutdown.cancelled() => {
                    info!(scenario = %id, "Scenario cancelled");
                    None
                }
                result = scheduler.run(&id, &hub) => Some(result),
            }
        })
    }

    /// True once [`shutdown`](Self::shutdown) has been called. Later spawns
    /// are cancelled before they publish anything.
    pub fn is_shut_down(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    /// Number of background runs still playing.
    pub fn active_runs(&self) -> usize {
        self.tracker.len()
    }

    /// Cancel background runs and wait for them to exit.
    pub async fn shutdown(&self) {
        self.shutdown.cancel();
        self.tracker.close();
        self.tracker.wait().await;
    }
}

impl std::fmt::Debug for ScenarioScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScenarioScheduler")
            .field("active_runs", &self.active_runs())
            .finish()
    }
}
