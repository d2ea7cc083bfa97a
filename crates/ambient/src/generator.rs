//! Background publishing loop.

use crate::config::AmbientConfig;
use crate::workload::AmbientWorkload;
use crate::AmbientError;
use opsfeed_hub::EventHub;
use opsfeed_types::{EventDraft, Source, Topology};
use parking_lot::Mutex;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, trace, warn};

/// Handle on a running loop.
struct Running {
    shutdown: CancellationToken,
    join: JoinHandle<()>,
}

/// Publishes one synthesized `engine` event per cadence until stopped.
///
/// `start` is idempotent while the loop is running. `stop` returns only once
/// the loop has exited, and is a no-op when nothing is running. Dropping the
/// generator cancels the loop without waiting for it.
pub struct AmbientGenerator {
    config: AmbientConfig,
    workload: AmbientWorkload,
    running: Mutex<Option<Running>>,
}

impl AmbientGenerator {
    /// Build a generator over the standard warehouse map.
    pub fn new(config: AmbientConfig) -> Result<Self, AmbientError> {
        Self::with_topology(config, Topology::standard())
    }

    pub fn with_topology(
        config: AmbientConfig,
        topology: &'static Topology,
    ) -> Result<Self, AmbientError> {
        config.validate()?;
        let workload = AmbientWorkload::new(topology, &config.weights)?;
        Ok(Self {
            config,
            workload,
            running: Mutex::new(None),
        })
    }

    pub fn config(&self) -> &AmbientConfig {
        &self.config
    }

    /// Whether the loop is currently running.
    pub fn is_running(&self) -> bool {
        self.running
            .lock()
            .as_ref()
            .is_some_and(|running| !running.join.is_finished())
    }

    /// Start publishing into `hub`. Returns `false` if already running.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self, hub: &EventHub) -> bool {
        let mut running = self.running.lock();
        if running.as_ref().is_some_and(|r| !r.join.is_finished()) {
            return false;
        }

        let rng = match self.config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let shutdown = CancellationToken::new();
        let join = tokio::spawn(run_loop(
            hub.clone(),
            self.workload.clone(),
            self.config.cadence(),
            rng,
            shutdown.clone(),
        ));

        info!(
            cadence_ms = self.config.cadence_ms,
            seed = ?self.config.seed,
            "Ambient generator started"
        );
        *running = Some(Running { shutdown, join });
        true
    }

    /// Stop the loop and wait for it to exit. Returns `false` if it was not running.
    pub async fn stop(&self) -> bool {
        let running = self.running.lock().take();
        let Some(running) = running else {
            return false;
        };

        running.shutdown.cancel();
        if let Err(e) = running.join.await {
            warn!(error = ?e, "Ambient generator task failed");
        }
        info!("Ambient generator stopped");
        true
    }
}

impl Drop for AmbientGenerator {
    fn drop(&mut self) {
        if let Some(running) = self.running.get_mut().take() {
            running.shutdown.cancel();
        }
    }
}

impl std::fmt::Debug for AmbientGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AmbientGenerator")
            .field("config", &self.config)
            .field("running", &self.is_running())
            .finish()
    }
}

async fn run_loop(
    hub: EventHub,
    workload: AmbientWorkload,
    cadence: Duration,
    mut rng: ChaCha8Rng,
    shutdown: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            _ = shutdown.cancelled() => break,
            _ = tokio::time::sleep(cadence) => {}
        }

        // Synthesize and publish happen with no await in between, so a
        // cancellation can only land between whole events.
        let body = workload.generate_one(&mut rng);
        let event = hub.publish(EventDraft::new(Source::Engine, body));
        trace!(
            sequence = event.sequence().as_u64(),
            event_type = %event.event_type(),
            "Ambient event published"
        );
    }
}
