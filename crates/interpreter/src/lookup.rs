//! Data sources consulted by status and where queries.
//!
//! The interpreter ships with placeholders; a real inventory or fleet
//! service plugs in by implementing these traits.

use opsfeed_types::{NodeId, StatusRecord, TruckId};

/// Source of per-warehouse status.
pub trait StatusLookup: Send + Sync {
    fn lookup_status(&self, node: &NodeId) -> StatusRecord;
}

/// Source of truck locations.
pub trait TruckLocator: Send + Sync {
    /// Human-readable location answer for a truck.
    fn locate(&self, truck: &TruckId) -> String;
}

/// Answers every query with a fixed "not wired yet" response.
#[derive(Debug, Clone, Copy, Default)]
pub struct Placeholder;

impl StatusLookup for Placeholder {
    fn lookup_status(&self, _node: &NodeId) -> StatusRecord {
        StatusRecord::placeholder()
    }
}

impl TruckLocator for Placeholder {
    fn locate(&self, truck: &TruckId) -> String {
        format!("{truck}: location lookup not yet implemented")
    }
}
