//! Synthetic traffic drawn from the warehouse map.

use crate::config::AmbientWeights;
use crate::AmbientError;
use opsfeed_types::{
    Corridor, EventBody, InventoryDelta, NodeId, Reroute, RerouteScope, Topology, TruckAdd, TruckId,
};
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;

/// Inventory adjustments picked from for `inventory_delta` events.
pub const INVENTORY_DELTAS: [i64; 4] = [10, -8, 6, -5];

/// Reason attached to synthesized inventory changes.
pub const INVENTORY_REASON: &str = "pulse";

/// Truck numbers assigned to synthesized `truck_add` events.
pub const TRUCK_NUMBERS: std::ops::RangeInclusive<u32> = 20..=99;

/// Kind of event the generator can synthesize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Disruption,
    Reroute,
    InventoryDelta,
    TruckAdd,
    Tick,
}

impl Category {
    /// All categories, in the order of [`AmbientWeights::as_array`].
    pub const ALL: [Category; 5] = [
        Category::Disruption,
        Category::Reroute,
        Category::InventoryDelta,
        Category::TruckAdd,
        Category::Tick,
    ];
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Disruption => "disruption",
            Category::Reroute => "reroute",
            Category::InventoryDelta => "inventory_delta",
            Category::TruckAdd => "truck_add",
            Category::Tick => "tick",
        };
        f.write_str(name)
    }
}

/// Generates plausible operations events.
///
/// Corridors, reroute paths and truck legs all follow the map's adjacency
/// table. If the map cannot support a category (for example it has no
/// corridors) the draw degrades to a `tick`.
#[derive(Debug, Clone)]
pub struct AmbientWorkload {
    topology: &'static Topology,
    weights: WeightedIndex<u32>,
}

impl AmbientWorkload {
    pub fn new(topology: &'static Topology, weights: &AmbientWeights) -> Result<Self, AmbientError> {
        let weights = WeightedIndex::new(weights.as_array())?;
        Ok(Self { topology, weights })
    }

    /// Draw a category according to the weights.
    pub fn pick_category<R: Rng + ?Sized>(&self, rng: &mut R) -> Category {
        Category::ALL[self.weights.sample(rng)]
    }

    /// Draw a category and synthesize one event body for it.
    pub fn generate_one<R: Rng + ?Sized>(&self, rng: &mut R) -> EventBody {
        let category = self.pick_category(rng);
        self.synthesize(category, rng)
            .unwrap_or_else(EventBody::tick)
    }

    /// Synthesize a body for a specific category.
    ///
    /// Returns `None` when the map has nothing to draw from.
    pub fn synthesize<R: Rng + ?Sized>(&self, category: Category, rng: &mut R) -> Option<EventBody> {
        let body = match category {
            Category::Disruption => {
                let (a, b) = self.random_corridor(rng)?;
                EventBody::Disruption(Corridor::new(a, b))
            }
            Category::Reroute => EventBody::Reroute(Reroute {
                path: self.random_detour(rng)?,
                scope: RerouteScope::Paused,
            }),
            Category::InventoryDelta => EventBody::InventoryDelta(InventoryDelta {
                wh: self.random_warehouse(rng)?,
                delta: *INVENTORY_DELTAS.choose(rng)?,
                reason: INVENTORY_REASON.to_string(),
            }),
            Category::TruckAdd => {
                let (origin, destination) = self.random_corridor(rng)?;
                EventBody::TruckAdd(TruckAdd {
                    id: TruckId::from_number(rng.gen_range(TRUCK_NUMBERS)),
                    origin,
                    destination,
                })
            }
            Category::Tick => EventBody::tick(),
        };
        Some(body)
    }

    fn random_warehouse<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<NodeId> {
        self.topology
            .warehouses()
            .choose(rng)
            .map(|w| w.id.clone())
    }

    fn random_corridor<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<(NodeId, NodeId)> {
        self.topology.corridors().choose(rng).cloned()
    }

    /// A three-node path `a -> mid -> b` along corridors, with `a != b`.
    fn random_detour<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Vec<NodeId>> {
        let candidates: Vec<Vec<NodeId>> = self
            .topology
            .corridors()
            .into_iter()
            .flat_map(|(a, mid)| {
                self.topology
                    .neighbors(&mid)
                    .iter()
                    .filter(|b| **b != a)
                    .map(|b| vec![a.clone(), mid.clone(), b.clone()])
                    .collect::<Vec<_>>()
            })
            .collect();
        candidates.choose(rng).cloned()
    }
}
