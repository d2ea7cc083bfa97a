//! Core types for the operations feed.
//!
//! Everything that crosses a component boundary lives here: the [`Event`]
//! record, its typed [`EventBody`] payloads, identifiers, and the static
//! warehouse [`Topology`] shared by producers.

mod event;
mod identifiers;
mod payload;
mod topology;

pub use event::{Event, EventDraft, Source, SCHEMA_VERSION};
pub use identifiers::{EventId, NodeId, Sequence, Timestamp, TruckId};
pub use payload::{
    Clarify, Corridor, ErrorMessage, EventBody, EventType, Focus, InventoryDelta, QueryResult,
    Reroute, RerouteScope, StatusRecord, Tick, TruckAdd, TruckUpdate, WarehouseAdd,
};
pub use topology::{Topology, Warehouse};
