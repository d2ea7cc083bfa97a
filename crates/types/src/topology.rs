//! Static warehouse topology: names, aliases and corridor adjacency.

use crate::NodeId;
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::OnceLock;

/// A warehouse on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct Warehouse {
    pub id: NodeId,
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
}

/// (code, display name, lat, lon, aliases)
type WarehouseRow = (&'static str, &'static str, f64, f64, &'static [&'static str]);

const WAREHOUSES: &[WarehouseRow] = &[
    ("WH1", "Delhi", 28.6139, 77.2090, &["delhi", "new delhi", "dli", "del"]),
    ("WH2", "Mumbai", 19.0760, 72.8777, &["mumbai", "bombay", "mum", "bom"]),
    ("WH3", "Bengaluru", 12.9716, 77.5946, &["bengaluru", "bangalore", "blr"]),
    ("WH4", "Hyderabad", 17.3850, 78.4867, &["hyderabad", "hyd"]),
    ("WH5", "Kolkata", 22.5726, 88.3639, &["kolkata", "calcutta", "kol", "ccu"]),
    ("WH6", "Chennai", 13.0827, 80.2707, &["chennai", "madras", "maa"]),
];

/// Neighbors in suggestion order (most-used corridor first).
const ADJACENCY: &[(&str, &[&str])] = &[
    ("WH1", &["WH4", "WH2", "WH5"]),
    ("WH2", &["WH1", "WH4", "WH3"]),
    ("WH3", &["WH4", "WH6", "WH2"]),
    ("WH4", &["WH1", "WH2", "WH3", "WH6"]),
    ("WH5", &["WH1", "WH6"]),
    ("WH6", &["WH3", "WH5", "WH4"]),
];

/// Warehouse map shared by the interpreter and the ambient generator.
///
/// Immutable after construction; the standard map is built once and shared.
#[derive(Debug, Clone)]
pub struct Topology {
    warehouses: Vec<Warehouse>,
    aliases: HashMap<String, NodeId>,
    adjacency: HashMap<NodeId, Vec<NodeId>>,
}

impl Topology {
    /// The built-in six-warehouse map.
    pub fn standard() -> &'static Topology {
        static STANDARD: OnceLock<Topology> = OnceLock::new();
        STANDARD.get_or_init(Topology::build_standard)
    }

    fn build_standard() -> Topology {
        let mut warehouses = Vec::with_capacity(WAREHOUSES.len());
        let mut aliases = HashMap::new();

        for &(code, name, lat, lon, names) in WAREHOUSES {
            let Some(id) = NodeId::parse(code) else {
                continue;
            };
            aliases.insert(code.to_ascii_lowercase(), id.clone());
            for alias in names {
                aliases.insert((*alias).to_string(), id.clone());
            }
            warehouses.push(Warehouse { id, name, lat, lon });
        }

        let adjacency = ADJACENCY
            .iter()
            .filter_map(|&(code, neighbors)| {
                let id = NodeId::parse(code)?;
                let neighbors = neighbors.iter().filter_map(|n| NodeId::parse(n)).collect();
                Some((id, neighbors))
            })
            .collect();

        Topology {
            warehouses,
            aliases,
            adjacency,
        }
    }

    /// Resolve a free-text token to a canonical node.
    ///
    /// Alias lookup is case-insensitive. Tokens already shaped like `WH<digits>`
    /// pass through (upper-cased) even if the map does not know them.
    pub fn resolve(&self, token: &str) -> Option<NodeId> {
        let key = token.trim().to_lowercase();
        if key.is_empty() {
            return None;
        }
        self.aliases
            .get(&key)
            .cloned()
            .or_else(|| NodeId::parse(&key))
    }

    /// Neighbors of a node in suggestion order; empty for unknown nodes.
    pub fn neighbors(&self, node: &NodeId) -> &[NodeId] {
        self.adjacency.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Human-readable name, falling back to the code for unmapped nodes.
    pub fn display_name<'a>(&self, node: &'a NodeId) -> Cow<'a, str> {
        match self.warehouse(node) {
            Some(w) => Cow::Borrowed(w.name),
            None => Cow::Borrowed(node.as_str()),
        }
    }

    /// Look up a warehouse by id.
    pub fn warehouse(&self, node: &NodeId) -> Option<&Warehouse> {
        self.warehouses.iter().find(|w| &w.id == node)
    }

    /// All warehouses in map order.
    pub fn warehouses(&self) -> &[Warehouse] {
        &self.warehouses
    }

    /// Every directed corridor in the adjacency table.
    pub fn corridors(&self) -> Vec<(NodeId, NodeId)> {
        self.warehouses
            .iter()
            .flat_map(|w| {
                self.neighbors(&w.id)
                    .iter()
                    .map(move |n| (w.id.clone(), n.clone()))
            })
            .collect()
    }
}
