//! The event hub.

use crate::subscription::{record_drop, DropReason, DropSlot, SubscriberId, Subscription};
use crate::HubConfig;
use opsfeed_types::{Event, EventDraft, Sequence};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, info, warn};

/// Snapshot answered by the health query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HubHealth {
    pub ok: bool,
    pub subscriber_count: usize,
    pub last_sequence: Sequence,
}

/// Central fan-out point.
///
/// Cloning is cheap; all clones share one stream. Sequence assignment,
/// history append and fan-out happen under a single lock, so every
/// subscriber observes the same total order. Delivery never waits: each
/// subscriber has its own bounded queue and a full or closed queue only
/// affects that subscriber.
#[derive(Clone)]
pub struct EventHub {
    inner: Arc<Mutex<HubState>>,
}

impl EventHub {
    /// Create a hub with the given limits.
    pub fn new(config: HubConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HubState::new(config))),
        }
    }

    /// Sequence a draft, record it in history, and deliver it to every subscriber.
    ///
    /// Never fails: subscribers that cannot take the event are pruned silently.
    pub fn publish(&self, draft: EventDraft) -> Arc<Event> {
        let mut state = self.inner.lock();

        let sequence = state.last_sequence.next();
        state.last_sequence = sequence;
        let event = Arc::new(draft.into_sequenced(sequence));

        state.push_history(Arc::clone(&event));
        state.fan_out(&event);

        debug!(
            sequence = sequence.as_u64(),
            event_type = %event.event_type(),
            source = %event.source(),
            subscribers = state.subscribers.len(),
            "Published event"
        );

        event
    }

    /// Register a new subscriber. It receives events published after this call.
    pub fn subscribe(&self) -> Subscription {
        let mut state = self.inner.lock();
        state.add_subscriber()
    }

    /// Register a subscriber and return the current history with it.
    ///
    /// Taken under the same lock, so nothing is missed or seen twice between
    /// the snapshot and the first live event.
    pub fn subscribe_with_history(&self) -> (Vec<Arc<Event>>, Subscription) {
        let mut state = self.inner.lock();
        let history = state.history.iter().cloned().collect();
        (history, state.add_subscriber())
    }

    /// Remove a subscriber. Returns false if it was already gone.
    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        let mut state = self.inner.lock();
        match state.subscribers.remove(&id) {
            Some(subscriber) => {
                record_drop(&subscriber.drop_reason, DropReason::Unsubscribed);
                info!(subscriber = %id, "Subscriber removed");
                true
            }
            None => false,
        }
    }

    /// Copy of the history ring, oldest first.
    pub fn history(&self) -> Vec<Arc<Event>> {
        self.inner.lock().history.iter().cloned().collect()
    }

    /// Number of live subscribers. Subscribers whose receiving side is gone
    /// are pruned first.
    pub fn subscriber_count(&self) -> usize {
        let mut state = self.inner.lock();
        state.prune_closed();
        state.subscribers.len()
    }

    /// Sequence of the most recent event, `Sequence::ZERO` if none.
    pub fn last_sequence(&self) -> Sequence {
        self.inner.lock().last_sequence
    }

    pub fn health(&self) -> HubHealth {
        let mut state = self.inner.lock();
        state.prune_closed();
        HubHealth {
            ok: true,
            subscriber_count: state.subscribers.len(),
            last_sequence: state.last_sequence,
        }
    }
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new(HubConfig::default())
    }
}

struct HubState {
    config: HubConfig,
    last_sequence: Sequence,
    history: VecDeque<Arc<Event>>,
    next_subscriber_id: u64,
    subscribers: BTreeMap<SubscriberId, SubscriberState>,
}

impl HubState {
    fn new(config: HubConfig) -> Self {
        Self {
            history: VecDeque::with_capacity(config.history_capacity),
            config,
            last_sequence: Sequence::ZERO,
            next_subscriber_id: 1,
            subscribers: BTreeMap::new(),
        }
    }

    fn push_history(&mut self, event: Arc<Event>) {
        self.history.push_back(event);
        while self.history.len() > self.config.history_capacity {
            self.history.pop_front();
        }
    }

    fn add_subscriber(&mut self) -> Subscription {
        let (sender, receiver) = mpsc::channel(self.config.subscriber_queue.max(1));
        let drop_reason: DropSlot = Arc::new(Mutex::new(None));
        let id = SubscriberId(self.next_subscriber_id);
        self.next_subscriber_id = self.next_subscriber_id.saturating_add(1);

        self.subscribers.insert(
            id,
            SubscriberState {
                sender,
                strikes: 0,
                drop_reason: Arc::clone(&drop_reason),
            },
        );
        info!(subscriber = %id, total = self.subscribers.len(), "Subscriber added");

        Subscription::new(id, receiver, drop_reason)
    }

    fn prune_closed(&mut self) {
        self.subscribers.retain(|id, subscriber| {
            if !subscriber.sender.is_closed() {
                return true;
            }
            record_drop(&subscriber.drop_reason, DropReason::Closed);
            debug!(subscriber = %id, "Dropped closed subscriber");
            false
        });
    }

    fn fan_out(&mut self, event: &Arc<Event>) {
        let max_strikes = self.config.max_lag_strikes.max(1);
        let mut dropped = Vec::new();

        for (id, subscriber) in self.subscribers.iter_mut() {
            match subscriber.sender.try_send(Arc::clone(event)) {
                Ok(()) => subscriber.strikes = 0,
                Err(TrySendError::Full(_)) => {
                    subscriber.strikes += 1;
                    if subscriber.strikes >= max_strikes {
                        dropped.push((*id, DropReason::Lagged));
                    }
                }
                Err(TrySendError::Closed(_)) => dropped.push((*id, DropReason::Closed)),
            }
        }

        for (id, reason) in dropped {
            if let Some(subscriber) = self.subscribers.remove(&id) {
                record_drop(&subscriber.drop_reason, reason);
                match reason {
                    DropReason::Lagged => warn!(
                        subscriber = %id,
                        strikes = subscriber.strikes,
                        "Dropped lagging subscriber"
                    ),
                    _ => debug!(subscriber = %id, %reason, "Dropped subscriber"),
                }
            }
        }
    }
}

struct SubscriberState {
    sender: mpsc::Sender<Arc<Event>>,
    strikes: u32,
    drop_reason: DropSlot,
}

#[cfg(test)]
mod tests {
    use super::*;
    use opsfeed_types::{EventBody, Source};
    use std::thread;
    use tracing_test::traced_test;

    fn tick() -> EventDraft {
        EventDraft::new(Source::Engine, EventBody::tick())
    }

    fn sequences(events: &[Arc<Event>]) -> Vec<u64> {
        events.iter().map(|e| e.sequence().as_u64()).collect()
    }

    #[test]
    fn test_sequences_start_at_one_and_increase() {
        let hub = EventHub::default();
        assert_eq!(hub.last_sequence(), Sequence::ZERO);

        let first = hub.publish(tick());
        let second = hub.publish(tick());

        assert_eq!(first.sequence(), Sequence(1));
        assert_eq!(second.sequence(), Sequence(2));
        assert_eq!(hub.last_sequence(), Sequence(2));
    }

    #[test]
    fn test_publish_keeps_draft_identity() {
        let hub = EventHub::default();
        let draft = tick();
        let id = draft.id().clone();
        let event = hub.publish(draft);
        assert_eq!(event.id(), &id);
        assert_eq!(event.source(), Source::Engine);
    }

    #[test]
    fn test_history_ring_evicts_oldest() {
        let hub = EventHub::default();
        for _ in 0..501 {
            hub.publish(tick());
        }

        let history = hub.history();
        assert_eq!(history.len(), 500);
        assert_eq!(history.first().unwrap().sequence(), Sequence(2));
        assert_eq!(history.last().unwrap().sequence(), Sequence(501));

        for _ in 0..10 {
            hub.publish(tick());
        }
        let history = hub.history();
        assert_eq!(history.len(), 500);
        assert_eq!(history.first().unwrap().sequence(), Sequence(12));
    }

    #[test]
    fn test_concurrent_publishers_share_one_order() {
        let hub = EventHub::new(HubConfig::default().with_subscriber_queue(2048));
        let mut sub_a = hub.subscribe();
        let mut sub_b = hub.subscribe();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let hub = hub.clone();
                thread::spawn(move || {
                    for _ in 0..100 {
                        hub.publish(tick());
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let seen_a = sequences(&sub_a.drain());
        let seen_b = sequences(&sub_b.drain());

        assert_eq!(seen_a.len(), 800);
        assert!(seen_a.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(seen_a, seen_b);
        assert_eq!(seen_a, (1..=800).collect::<Vec<_>>());
    }

    #[test]
    fn test_closed_subscriber_pruned_within_one_publish() {
        let hub = EventHub::default();
        let mut healthy = hub.subscribe();
        let mut broken = hub.subscribe();

        hub.publish(tick());
        broken.close();
        hub.publish(tick());
        assert_eq!(broken.drop_reason(), Some(DropReason::Closed));
        assert_eq!(hub.subscriber_count(), 1);

        hub.publish(tick());
        assert_eq!(sequences(&healthy.drain()), vec![1, 2, 3]);
        // Events queued before the break are still readable.
        assert_eq!(sequences(&broken.drain()), vec![1]);
    }

    #[test]
    fn test_dropped_handle_is_pruned() {
        let hub = EventHub::default();
        let sub = hub.subscribe();
        drop(sub);

        hub.publish(tick());
        assert_eq!(hub.subscriber_count(), 0);
    }

    #[test]
    fn test_health_excludes_disconnected_without_publish() {
        let hub = EventHub::default();
        let _kept = hub.subscribe();
        let gone = hub.subscribe();
        let mut closed = hub.subscribe();
        assert_eq!(hub.health().subscriber_count, 3);

        drop(gone);
        closed.close();
        assert_eq!(hub.health().subscriber_count, 1);
        assert_eq!(hub.subscriber_count(), 1);
        assert_eq!(closed.drop_reason(), Some(DropReason::Closed));
        assert_eq!(hub.last_sequence(), Sequence::ZERO);
    }

    #[traced_test]
    #[test]
    fn test_lagging_subscriber_dropped_after_strikes() {
        let hub = EventHub::new(
            HubConfig::default()
                .with_subscriber_queue(1)
                .with_max_lag_strikes(2),
        );
        let mut slow = hub.subscribe();
        let mut other = hub.subscribe();

        // Fills the slow queue; `other` keeps draining.
        hub.publish(tick());
        other.drain();
        // Strike one.
        hub.publish(tick());
        other.drain();
        assert_eq!(hub.subscriber_count(), 2);
        // Strike two: dropped.
        hub.publish(tick());
        other.drain();
        assert_eq!(hub.subscriber_count(), 1);
        assert_eq!(slow.drop_reason(), Some(DropReason::Lagged));
        assert!(other.drop_reason().is_none());

        assert_eq!(sequences(&slow.drain()), vec![1]);
        assert!(logs_contain("Dropped lagging subscriber"));
    }

    #[test]
    fn test_strikes_reset_after_successful_delivery() {
        let hub = EventHub::new(
            HubConfig::default()
                .with_subscriber_queue(1)
                .with_max_lag_strikes(2),
        );
        let mut sub = hub.subscribe();

        hub.publish(tick()); // queued
        hub.publish(tick()); // strike one
        sub.drain();
        hub.publish(tick()); // delivered, strikes reset
        hub.publish(tick()); // strike one again
        assert_eq!(hub.subscriber_count(), 1);
        assert!(sub.drop_reason().is_none());
    }

    #[tokio::test]
    async fn test_unsubscribe_ends_stream() {
        let hub = EventHub::default();
        let mut sub = hub.subscribe();

        hub.publish(tick());
        assert!(hub.unsubscribe(sub.id()));
        assert!(!hub.unsubscribe(sub.id()));
        hub.publish(tick());

        assert_eq!(sub.recv().await.unwrap().sequence(), Sequence(1));
        assert!(sub.recv().await.is_none());
        assert_eq!(sub.drop_reason(), Some(DropReason::Unsubscribed));
    }

    #[test]
    fn test_subscribe_with_history_has_no_gap() {
        let hub = EventHub::default();
        hub.publish(tick());
        hub.publish(tick());

        let (history, mut sub) = hub.subscribe_with_history();
        hub.publish(tick());

        let mut seen = sequences(&history);
        seen.extend(sequences(&sub.drain()));
        assert_eq!(seen, vec![1, 2, 3]);
    }

    #[test]
    fn test_health_reports_subscribers_and_sequence() {
        let hub = EventHub::default();
        let _sub = hub.subscribe();
        hub.publish(tick());

        let health = hub.health();
        assert!(health.ok);
        assert_eq!(health.subscriber_count, 1);
        assert_eq!(health.last_sequence, Sequence(1));
    }

    #[test]
    fn test_subscriber_added_mid_stream_sees_only_later_events() {
        let hub = EventHub::default();
        hub.publish(tick());
        let mut late = hub.subscribe();
        hub.publish(tick());
        assert_eq!(sequences(&late.drain()), vec![2]);
    }
}
