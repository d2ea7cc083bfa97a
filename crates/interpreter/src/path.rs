//! Node and path extraction from free text.

use opsfeed_types::{NodeId, Topology};
use regex::Regex;
use std::sync::LazyLock;

/// Canonical arrow every directional separator is rewritten to.
const ARROW: &str = "->";

/// Arrow glyphs, dashes and the word "to", with surrounding whitespace.
static SEPARATORS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s*(?:->|=>|→|⟶|⇒|➔|➜|–|—)\s*|\s+to\s+").expect("separator pattern")
});

/// Runs of alphanumerics joined by ASCII hyphens, e.g. `Delhi-Hyderabad`.
static HYPHEN_CHAIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9]+(?:-[A-Za-z0-9]+)+").expect("hyphen pattern"));

/// Canonical codes first so `WH12` is not split into `WH` + `12`.
static WORDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bWH\d+\b|[A-Za-z]+").expect("word pattern"));

/// Rewrite every directional separator to [`ARROW`].
pub(crate) fn normalize_separators(text: &str) -> String {
    SEPARATORS
        .replace_all(text, format!(" {ARROW} ").as_str())
        .into_owned()
}

/// Extract an ordered node path for disrupt/correct/reroute.
///
/// Tries, in order: explicit arrows, a hyphen-joined chain, then free-form
/// word scanning. Adjacent repeats are collapsed in every mode.
pub(crate) fn extract_path(topology: &Topology, text: &str) -> Vec<NodeId> {
    let normalized = normalize_separators(text);

    if normalized.contains(ARROW) {
        let nodes = normalized
            .split(ARROW)
            .filter_map(|segment| resolve_segment(topology, segment))
            .collect();
        return collapse_repeats(nodes);
    }

    if let Some(nodes) = hyphen_chain(topology, &normalized) {
        return nodes;
    }

    scan_nodes(topology, &normalized)
}

/// Scan words left to right, resolving each and dropping consecutive repeats.
pub(crate) fn scan_nodes(topology: &Topology, text: &str) -> Vec<NodeId> {
    let nodes = WORDS
        .find_iter(text)
        .filter_map(|m| topology.resolve(m.as_str()))
        .collect();
    collapse_repeats(nodes)
}

/// Drop every repeat, keeping first occurrences in order.
pub(crate) fn dedupe(nodes: Vec<NodeId>) -> Vec<NodeId> {
    let mut unique: Vec<NodeId> = Vec::with_capacity(nodes.len());
    for node in nodes {
        if !unique.contains(&node) {
            unique.push(node);
        }
    }
    unique
}

fn collapse_repeats(mut nodes: Vec<NodeId>) -> Vec<NodeId> {
    nodes.dedup();
    nodes
}

/// Resolve one arrow segment: whole segment first, then its first resolvable word.
fn resolve_segment(topology: &Topology, segment: &str) -> Option<NodeId> {
    topology.resolve(segment).or_else(|| {
        WORDS
            .find_iter(segment)
            .find_map(|m| topology.resolve(m.as_str()))
    })
}

fn hyphen_chain(topology: &Topology, text: &str) -> Option<Vec<NodeId>> {
    HYPHEN_CHAIN.find_iter(text).find_map(|m| {
        let nodes = collapse_repeats(
            m.as_str()
                .split('-')
                .filter_map(|part| topology.resolve(part))
                .collect(),
        );
        (nodes.len() >= 2).then_some(nodes)
    })
}
