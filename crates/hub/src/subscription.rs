//! Subscriber handles.

use opsfeed_types::Event;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TryRecvError};

/// Identifier of a subscriber within one hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(pub(crate) u64);

impl SubscriberId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Why the hub stopped delivering to a subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// The receiving side went away.
    Closed,
    /// The queue stayed full for too many consecutive publishes.
    Lagged,
    /// Removed through [`EventHub::unsubscribe`](crate::EventHub::unsubscribe).
    Unsubscribed,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DropReason::Closed => "closed",
            DropReason::Lagged => "lagged",
            DropReason::Unsubscribed => "unsubscribed",
        };
        f.write_str(name)
    }
}

/// Shared slot recording the first drop reason.
pub(crate) type DropSlot = Arc<Mutex<Option<DropReason>>>;

pub(crate) fn record_drop(slot: &DropSlot, reason: DropReason) {
    let mut guard = slot.lock();
    if guard.is_none() {
        *guard = Some(reason);
    }
}

/// Receiving end of a hub subscription.
///
/// Events arrive in global sequence order. Once the hub drops the
/// subscriber, already-queued events can still be drained and then
/// [`recv`](Self::recv) returns `None`.
pub struct Subscription {
    id: SubscriberId,
    receiver: mpsc::Receiver<Arc<Event>>,
    drop_reason: DropSlot,
}

impl Subscription {
    pub(crate) fn new(
        id: SubscriberId,
        receiver: mpsc::Receiver<Arc<Event>>,
        drop_reason: DropSlot,
    ) -> Self {
        Self {
            id,
            receiver,
            drop_reason,
        }
    }

    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Wait for the next event. `None` once the hub has dropped this subscriber
    /// and the queue is empty.
    pub async fn recv(&mut self) -> Option<Arc<Event>> {
        self.receiver.recv().await
    }

    /// Take the next queued event without waiting.
    pub fn try_recv(&mut self) -> Result<Arc<Event>, TryRecvError> {
        self.receiver.try_recv()
    }

    /// Take every event currently queued.
    pub fn drain(&mut self) -> Vec<Arc<Event>> {
        let mut events = Vec::new();
        while let Ok(event) = self.receiver.try_recv() {
            events.push(event);
        }
        events
    }

    /// Stop accepting new events; queued ones stay readable.
    ///
    /// The hub prunes this subscriber on its next publish.
    pub fn close(&mut self) {
        self.receiver.close();
    }

    /// Why the hub dropped this subscriber, if it has.
    pub fn drop_reason(&self) -> Option<DropReason> {
        *self.drop_reason.lock()
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("drop_reason", &self.drop_reason())
            .finish()
    }
}
