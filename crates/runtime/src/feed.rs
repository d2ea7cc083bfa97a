//! Composition root wiring the hub to its producers.

use crate::config::{ConfigError, FeedConfig};
use opsfeed_ambient::AmbientGenerator;
use opsfeed_hub::{EventHub, HubHealth, Subscription};
use opsfeed_interpreter::Interpreter;
use opsfeed_scenario::{FallbackLoader, JsonDirLoader, MemoryLoader, ScenarioLoader, ScenarioScheduler};
use opsfeed_types::{Event, EventType};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Acknowledgement for a submitted operator command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandAck {
    /// `false` when the command was rejected outright (empty input).
    pub ok: bool,
    /// Events the command published, in order.
    pub events: Vec<Event>,
}

/// Acknowledgement for a scenario trigger. Playback continues in the background.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioAck {
    /// `false` once the feed has shut down.
    pub ok: bool,
    pub scenario: String,
}

/// The running feed: one hub, its producers and the interpreter.
///
/// Everything that publishes goes through [`Feed::hub`]. Methods that start
/// background work must be called from within a tokio runtime.
pub struct Feed {
    config: FeedConfig,
    hub: EventHub,
    interpreter: Interpreter,
    ambient: AmbientGenerator,
    scheduler: ScenarioScheduler,
}

impl Feed {
    /// Build a feed whose scenarios come from the configured directory,
    /// falling back to the built-in scenarios.
    pub fn new(config: FeedConfig) -> Result<Self, ConfigError> {
        let loader = FallbackLoader::new(
            JsonDirLoader::new(config.scenarios.dir.clone()),
            MemoryLoader::builtin(),
        );
        Self::with_loader(config, Arc::new(loader))
    }

    /// Build a feed with a custom scenario source.
    pub fn with_loader(
        config: FeedConfig,
        loader: Arc<dyn ScenarioLoader>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let ambient = AmbientGenerator::new(config.ambient.clone())?;

        Ok(Self {
            hub: EventHub::new(config.hub.clone()),
            interpreter: Interpreter::default(),
            ambient,
            scheduler: ScenarioScheduler::new(loader),
            config,
        })
    }

    /// Replace the command interpreter, e.g. to plug in real status lookups.
    pub fn with_interpreter(mut self, interpreter: Interpreter) -> Self {
        self.interpreter = interpreter;
        self
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    pub fn hub(&self) -> &EventHub {
        &self.hub
    }

    /// Start background producers. Returns `true` if the ambient generator
    /// was started by this call.
    pub fn start(&self) -> bool {
        if !self.config.ambient.enabled {
            info!("Ambient generator disabled");
            return false;
        }
        self.ambient.start(&self.hub)
    }

    /// Interpret operator text and publish the result.
    pub fn submit_command(&self, text: &str) -> CommandAck {
        let draft = self.interpreter.interpret(text);
        let event = self.hub.publish(draft);
        debug!(
            sequence = event.sequence().as_u64(),
            event_type = %event.event_type(),
            "Command published"
        );

        CommandAck {
            ok: event.event_type() != EventType::Error,
            events: vec![Event::clone(&event)],
        }
    }

    /// Start playing a scenario. Failures surface as an `error` event.
    ///
    /// After [`shutdown`](Self::shutdown) nothing is started and the ack has
    /// `ok: false`.
    pub fn trigger_scenario(&self, id: &str) -> ScenarioAck {
        let id = id.trim();
        if self.scheduler.is_shut_down() {
            warn!(scenario = id, "Scenario trigger after shutdown ignored");
            return ScenarioAck {
                ok: false,
                scenario: id.to_string(),
            };
        }
        info!(scenario = id, "Scenario triggered");
        // The run reports its own outcome on the stream.
        drop(self.scheduler.spawn(id, self.hub.clone()));
        ScenarioAck {
            ok: true,
            scenario: id.to_string(),
        }
    }

    pub fn health(&self) -> HubHealth {
        self.hub.health()
    }

    pub fn subscribe(&self) -> Subscription {
        self.hub.subscribe()
    }

    /// Current history plus a live subscription, with no gap or overlap.
    pub fn subscribe_with_history(&self) -> (Vec<Arc<Event>>, Subscription) {
        self.hub.subscribe_with_history()
    }

    pub fn history(&self) -> Vec<Arc<Event>> {
        self.hub.history()
    }

    /// Stop the generator and cancel scenario runs, waiting for both.
    pub async fn shutdown(&self) {
        self.ambient.stop().await;
        self.scheduler.shutdown().await;
        info!(last_sequence = %self.hub.last_sequence(), "Feed shut down");
    }
}

impl std::fmt::Debug for Feed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Feed")
            .field("config", &self.config)
            .field("health", &self.health())
            .field("ambient", &self.ambient)
            .field("scheduler", &self.scheduler)
            .finish()
    }
}
