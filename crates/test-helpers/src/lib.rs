//! Shared fixtures for feed tests.
//!
//! Used as a dev-dependency by the interpreter, ambient, scenario and runtime
//! crates. The hub and types crates build their fixtures inline since this
//! crate depends on them.

use opsfeed_hub::Subscription;
use opsfeed_types::{
    Corridor, Event, EventBody, EventDraft, EventType, Focus, NodeId, Source, TruckId,
};
use std::sync::Arc;
use std::time::Duration;

/// Canonical node `WH<n>`.
pub fn wh(n: u32) -> NodeId {
    node(&format!("WH{n}"))
}

/// Parse a canonical node code, panicking on bad fixtures.
pub fn node(code: &str) -> NodeId {
    NodeId::parse(code).unwrap_or_else(|| panic!("bad node fixture {code:?}"))
}

pub fn truck(n: u32) -> TruckId {
    TruckId::from_number(n)
}

pub fn draft(source: Source, body: EventBody) -> EventDraft {
    EventDraft::new(source, body)
}

pub fn tick_draft(source: Source) -> EventDraft {
    draft(source, EventBody::tick())
}

pub fn focus_draft(source: Source, n: u32) -> EventDraft {
    draft(source, EventBody::Focus(Focus { target: wh(n) }))
}

pub fn disruption_draft(source: Source, a: u32, b: u32) -> EventDraft {
    draft(source, EventBody::Disruption(Corridor::new(wh(a), wh(b))))
}

/// Wait up to `within` for the next event.
///
/// Returns `None` on timeout or when the subscription has been closed.
pub async fn recv_within(sub: &mut Subscription, within: Duration) -> Option<Arc<Event>> {
    tokio::time::timeout(within, sub.recv()).await.ok().flatten()
}

/// Collect exactly `count` events, waiting up to `within` for each.
///
/// Panics with what was received so far if the stream runs dry.
pub async fn collect_n(sub: &mut Subscription, count: usize, within: Duration) -> Vec<Arc<Event>> {
    let mut events = Vec::with_capacity(count);
    while events.len() < count {
        match recv_within(sub, within).await {
            Some(event) => events.push(event),
            None => panic!(
                "expected {count} events, got {}: {:?}",
                events.len(),
                event_types(&events)
            ),
        }
    }
    events
}

pub fn sequences(events: &[Arc<Event>]) -> Vec<u64> {
    events.iter().map(|e| e.sequence().as_u64()).collect()
}

pub fn event_types(events: &[Arc<Event>]) -> Vec<EventType> {
    events.iter().map(|e| e.event_type()).collect()
}

pub fn sources(events: &[Arc<Event>]) -> Vec<Source> {
    events.iter().map(|e| e.source()).collect()
}

/// Assert sequences strictly increase.
pub fn assert_strictly_increasing(events: &[Arc<Event>]) {
    for pair in events.windows(2) {
        assert!(
            pair[0].sequence() < pair[1].sequence(),
            "sequence went from {} to {}",
            pair[0].sequence(),
            pair[1].sequence()
        );
    }
}
