//! Follow-up suggestions for clarify events.

use opsfeed_types::{NodeId, Topology};

/// Most corridor suggestions offered for a single anchor.
pub const MAX_CORRIDOR_SUGGESTIONS: usize = 3;

/// Most detour suggestions offered for a two-node reroute.
pub const MAX_DETOUR_SUGGESTIONS: usize = 2;

/// Midpoints tried, in order, when the origin has no known neighbors.
const DEFAULT_MIDPOINTS: &[&str] = &["WH2", "WH4", "WH1"];

/// Option offered when nothing sensible can be suggested.
pub const CANCEL_OPTION: &str = "Cancel";

/// Corridor suggestions `"<Verb> <anchor>–<neighbor>"` from the adjacency table.
pub(crate) fn corridor_options(topology: &Topology, verb: &str, anchor: &NodeId) -> Vec<String> {
    let anchor_name = topology.display_name(anchor);
    let options: Vec<String> = topology
        .neighbors(anchor)
        .iter()
        .take(MAX_CORRIDOR_SUGGESTIONS)
        .map(|n| format!("{verb} {anchor_name}–{}", topology.display_name(n)))
        .collect();

    if options.is_empty() {
        vec![CANCEL_OPTION.to_string()]
    } else {
        options
    }
}

/// Detour suggestions `"Reroute A -> mid -> B"` through neighbors of `from`.
pub(crate) fn detour_options(topology: &Topology, from: &NodeId, to: &NodeId) -> Vec<String> {
    let mids: Vec<NodeId> = topology
        .neighbors(from)
        .iter()
        .filter(|n| *n != from && *n != to)
        .take(MAX_DETOUR_SUGGESTIONS)
        .cloned()
        .collect();

    let mids = if mids.is_empty() {
        DEFAULT_MIDPOINTS
            .iter()
            .filter_map(|code| NodeId::parse(code))
            .find(|mid| mid != from && mid != to)
            .into_iter()
            .collect()
    } else {
        mids
    };

    mids.iter()
        .map(|mid| {
            format!(
                "Reroute {} -> {} -> {}",
                topology.display_name(from),
                topology.display_name(mid),
                topology.display_name(to)
            )
        })
        .collect()
}

/// Example corridors offered when no node could be resolved.
pub(crate) fn corridor_examples(verb: &str) -> Vec<String> {
    ["Delhi–Hyderabad", "Delhi–Mumbai", "Mumbai–Hyderabad"]
        .iter()
        .map(|corridor| format!("{verb} {corridor}"))
        .collect()
}

pub(crate) fn reroute_examples() -> Vec<String> {
    strings(&[
        "Reroute Delhi -> Mumbai -> Hyderabad",
        "Reroute Mumbai -> Bengaluru -> Hyderabad",
    ])
}

pub(crate) fn status_examples() -> Vec<String> {
    strings(&["Status Delhi", "Status Mumbai, Kolkata"])
}

pub(crate) fn where_examples() -> Vec<String> {
    strings(&["Where is T12?", "Where T45"])
}

pub(crate) fn focus_examples() -> Vec<String> {
    strings(&["Focus Hyderabad", "Zoom Delhi"])
}

pub(crate) fn general_examples() -> Vec<String> {
    strings(&[
        "Disrupt Delhi–Hyderabad",
        "Fix Delhi–Hyderabad",
        "Reroute Delhi -> Mumbai -> Hyderabad",
        "Status Mumbai, Kolkata",
    ])
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
