//! Domain-specific identifier types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Canonical warehouse identifier (`WH<digits>`).
///
/// Always stored upper-cased. Free-text place names are mapped onto these by
/// the [`Topology`](crate::Topology) alias table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NodeId(String);

impl NodeId {
    /// Parse a token that is already in canonical form, ignoring case.
    ///
    /// Returns `None` unless the token is `WH` followed by one or more ASCII digits.
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        let (prefix, digits) = token.split_at_checked(2)?;
        if !prefix.eq_ignore_ascii_case("wh")
            || digits.is_empty()
            || !digits.bytes().all(|b| b.is_ascii_digit())
        {
            return None;
        }
        Some(NodeId(format!("WH{}", digits)))
    }

    /// Get the canonical code.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for NodeId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        NodeId::parse(&value).ok_or_else(|| format!("invalid warehouse id: {value}"))
    }
}

impl From<NodeId> for String {
    fn from(id: NodeId) -> Self {
        id.0
    }
}

/// Truck identifier (`T<digits>`), stored upper-cased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TruckId(String);

impl TruckId {
    /// Parse a truck token, ignoring case.
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        let (prefix, digits) = token.split_at_checked(1)?;
        if !prefix.eq_ignore_ascii_case("t")
            || digits.is_empty()
            || !digits.bytes().all(|b| b.is_ascii_digit())
        {
            return None;
        }
        Some(TruckId(format!("T{}", digits)))
    }

    /// Build a truck id from its number.
    pub fn from_number(n: u32) -> Self {
        TruckId(format!("T{}", n))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TruckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for TruckId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        TruckId::parse(&value).ok_or_else(|| format!("invalid truck id: {value}"))
    }
}

impl From<TruckId> for String {
    fn from(id: TruckId) -> Self {
        id.0
    }
}

/// Position of an event in the global stream.
///
/// Issued only by the hub, starting at 1. Zero means "nothing published yet".
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Sequence(pub u64);

impl Sequence {
    /// Sentinel for an empty stream.
    pub const ZERO: Self = Sequence(0);

    /// Get the next sequence number.
    pub fn next(self) -> Self {
        Sequence(self.0 + 1)
    }

    /// Get the raw value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Opaque event identifier (`evt_<hex>`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        EventId(format!("evt_{}", uuid::Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Wall-clock milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(pub u64);

impl Timestamp {
    /// Current wall-clock time.
    pub fn now() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        Timestamp(millis)
    }

    pub fn as_millis(&self) -> u64 {
        self.0
    }
}
