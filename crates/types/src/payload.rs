//! Typed event payloads.
//!
//! Each event type carries its own payload struct. On the wire the pair is
//! written as `{"type": "<snake_case>", "payload": {...}}`, so viewers see
//! an open mapping while producers get compile-time shape checking.

use crate::{NodeId, TruckId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of event types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Disruption,
    Correct,
    Reroute,
    InventoryDelta,
    TruckAdd,
    TruckUpdate,
    WarehouseAdd,
    LaneAdd,
    Focus,
    QueryResult,
    Clarify,
    Error,
    Tick,
}

impl EventType {
    /// All event types, in declaration order.
    pub const ALL: [EventType; 13] = [
        EventType::Disruption,
        EventType::Correct,
        EventType::Reroute,
        EventType::InventoryDelta,
        EventType::TruckAdd,
        EventType::TruckUpdate,
        EventType::WarehouseAdd,
        EventType::LaneAdd,
        EventType::Focus,
        EventType::QueryResult,
        EventType::Clarify,
        EventType::Error,
        EventType::Tick,
    ];

    /// Wire name of this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Disruption => "disruption",
            EventType::Correct => "correct",
            EventType::Reroute => "reroute",
            EventType::InventoryDelta => "inventory_delta",
            EventType::TruckAdd => "truck_add",
            EventType::TruckUpdate => "truck_update",
            EventType::WarehouseAdd => "warehouse_add",
            EventType::LaneAdd => "lane_add",
            EventType::Focus => "focus",
            EventType::QueryResult => "query_result",
            EventType::Clarify => "clarify",
            EventType::Error => "error",
            EventType::Tick => "tick",
        }
    }

    /// Look up a type by its wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event type together with its payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum EventBody {
    /// A corridor went down.
    Disruption(Corridor),
    /// A previously disrupted corridor was restored.
    Correct(Corridor),
    /// Traffic diverted along a new path.
    Reroute(Reroute),
    /// Stock level changed at a warehouse.
    InventoryDelta(InventoryDelta),
    /// A truck entered the network.
    TruckAdd(TruckAdd),
    /// A truck reported progress.
    TruckUpdate(TruckUpdate),
    /// A warehouse was added to the map.
    WarehouseAdd(WarehouseAdd),
    /// A lane was added to the map.
    LaneAdd(Corridor),
    /// Viewers should center on a node.
    Focus(Focus),
    /// Answer to an operator query.
    QueryResult(QueryResult),
    /// The operator's input was ambiguous; pick one of the options.
    Clarify(Clarify),
    /// Something went wrong; human-readable message.
    Error(ErrorMessage),
    /// Heartbeat with no content.
    Tick(Tick),
}

impl EventBody {
    /// Get the type tag of this body.
    pub fn event_type(&self) -> EventType {
        match self {
            EventBody::Disruption(_) => EventType::Disruption,
            EventBody::Correct(_) => EventType::Correct,
            EventBody::Reroute(_) => EventType::Reroute,
            EventBody::InventoryDelta(_) => EventType::InventoryDelta,
            EventBody::TruckAdd(_) => EventType::TruckAdd,
            EventBody::TruckUpdate(_) => EventType::TruckUpdate,
            EventBody::WarehouseAdd(_) => EventType::WarehouseAdd,
            EventBody::LaneAdd(_) => EventType::LaneAdd,
            EventBody::Focus(_) => EventType::Focus,
            EventBody::QueryResult(_) => EventType::QueryResult,
            EventBody::Clarify(_) => EventType::Clarify,
            EventBody::Error(_) => EventType::Error,
            EventBody::Tick(_) => EventType::Tick,
        }
    }

    /// Convenience constructor for an `error` body.
    pub fn error(message: impl Into<String>) -> Self {
        EventBody::Error(ErrorMessage {
            message: message.into(),
        })
    }

    /// Convenience constructor for a `clarify` body.
    pub fn clarify(message: impl Into<String>, options: Vec<String>) -> Self {
        EventBody::Clarify(Clarify {
            message: message.into(),
            options,
        })
    }

    /// Convenience constructor for a `tick` body.
    pub fn tick() -> Self {
        EventBody::Tick(Tick {})
    }
}

/// Pair of warehouses joined by a transport link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corridor {
    pub a: NodeId,
    pub b: NodeId,
}

impl Corridor {
    pub fn new(a: NodeId, b: NodeId) -> Self {
        Self { a, b }
    }
}

/// Which traffic a reroute applies to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RerouteScope {
    /// Only shipments currently held at the disruption.
    #[default]
    Paused,
    /// Shipments already moving.
    Active,
    /// Everything on the corridor.
    All,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reroute {
    pub path: Vec<NodeId>,
    #[serde(default)]
    pub scope: RerouteScope,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryDelta {
    pub wh: NodeId,
    pub delta: i64,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TruckAdd {
    pub id: TruckId,
    pub origin: NodeId,
    pub destination: NodeId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TruckUpdate {
    pub id: TruckId,
    /// Last warehouse the truck checked in at.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub at: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eta_min: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarehouseAdd {
    pub id: NodeId,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Focus {
    pub target: NodeId,
}

/// Per-warehouse status record.
///
/// Fields are `None` until a real inventory source is wired in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRecord {
    pub inv: Option<i64>,
    #[serde(rename = "in")]
    pub inbound: Option<u32>,
    pub out: Option<u32>,
    pub note: String,
}

impl StatusRecord {
    /// Record returned when no inventory source is available.
    pub fn placeholder() -> Self {
        Self {
            inv: None,
            inbound: None,
            out: None,
            note: "status placeholder".to_string(),
        }
    }
}

/// Answer to an operator query, keyed by `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "answer", rename_all = "snake_case")]
pub enum QueryResult {
    /// One record per requested warehouse, in request order.
    Status(IndexMap<NodeId, StatusRecord>),
    /// Free-text truck location.
    Where(String),
    /// Usage text.
    Help(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clarify {
    pub message: String,
    #[serde(default)]
    pub options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tick {}
