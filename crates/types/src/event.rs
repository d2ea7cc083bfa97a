//! The event record broadcast to every viewer.

use crate::{EventBody, EventId, EventType, Sequence, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Current payload schema version.
pub const SCHEMA_VERSION: u32 = 1;

/// Which producer created an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// Ambient traffic generator.
    Engine,
    /// Operator command interpreter.
    Chat,
    /// Scripted scenario playback.
    Scenario,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Source::Engine => "engine",
            Source::Chat => "chat",
            Source::Scenario => "scenario",
        };
        f.write_str(name)
    }
}

/// An event as built by a producer, before the hub has sequenced it.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDraft {
    id: EventId,
    timestamp: Timestamp,
    source: Source,
    body: EventBody,
}

impl EventDraft {
    /// Create a draft stamped with a fresh id and the current time.
    pub fn new(source: Source, body: EventBody) -> Self {
        Self {
            id: EventId::generate(),
            timestamp: Timestamp::now(),
            source,
            body,
        }
    }

    pub fn id(&self) -> &EventId {
        &self.id
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn source(&self) -> Source {
        self.source
    }

    pub fn body(&self) -> &EventBody {
        &self.body
    }

    pub fn event_type(&self) -> EventType {
        self.body.event_type()
    }

    /// Seal the draft with its stream position.
    ///
    /// Only the hub calls this; producers never pick sequence numbers.
    pub fn into_sequenced(self, sequence: Sequence) -> Event {
        Event {
            id: self.id,
            timestamp: self.timestamp,
            sequence,
            source: self.source,
            body: self.body,
            schema_version: SCHEMA_VERSION,
        }
    }
}

/// A sequenced, immutable event.
///
/// Serializes as `{id, timestamp, sequence, source, type, payload, schema_version}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    id: EventId,
    timestamp: Timestamp,
    sequence: Sequence,
    source: Source,
    #[serde(flatten)]
    body: EventBody,
    schema_version: u32,
}

impl Event {
    pub fn id(&self) -> &EventId {
        &self.id
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn sequence(&self) -> Sequence {
        self.sequence
    }

    pub fn source(&self) -> Source {
        self.source
    }

    pub fn body(&self) -> &EventBody {
        &self.body
    }

    pub fn event_type(&self) -> EventType {
        self.body.event_type()
    }

    pub fn schema_version(&self) -> u32 {
        self.schema_version
    }
}
