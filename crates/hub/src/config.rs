//! Hub configuration.

use serde::Deserialize;
use thiserror::Error;

/// Default number of events retained for late joiners.
pub const DEFAULT_HISTORY_CAPACITY: usize = 500;

/// A hub limit that cannot work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HubConfigError {
    #[error("hub.history_capacity must be > 0")]
    ZeroHistoryCapacity,

    #[error("hub.subscriber_queue must be > 0")]
    ZeroSubscriberQueue,

    #[error("hub.max_lag_strikes must be > 0")]
    ZeroLagStrikes,
}

/// Configuration for the event hub.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    /// Maximum events kept in the history ring. Oldest are evicted first.
    pub history_capacity: usize,

    /// Bounded queue length per subscriber.
    pub subscriber_queue: usize,

    /// Consecutive publishes that may find a subscriber's queue full before
    /// the subscriber is dropped.
    ///
    /// Events offered while the queue is full are skipped for that subscriber.
    pub max_lag_strikes: u32,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            subscriber_queue: 256,
            max_lag_strikes: 3,
        }
    }
}

impl HubConfig {
    /// Set the history ring capacity.
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    /// Set the per-subscriber queue length.
    pub fn with_subscriber_queue(mut self, len: usize) -> Self {
        self.subscriber_queue = len;
        self
    }

    /// Set how many consecutive full-queue publishes a subscriber survives.
    pub fn with_max_lag_strikes(mut self, strikes: u32) -> Self {
        self.max_lag_strikes = strikes;
        self
    }

    /// Check the limits, reporting the first bad field.
    pub fn validate(&self) -> Result<(), HubConfigError> {
        if self.history_capacity == 0 {
            return Err(HubConfigError::ZeroHistoryCapacity);
        }
        if self.subscriber_queue == 0 {
            return Err(HubConfigError::ZeroSubscriberQueue);
        }
        if self.max_lag_strikes == 0 {
            return Err(HubConfigError::ZeroLagStrikes);
        }
        Ok(())
    }
}
