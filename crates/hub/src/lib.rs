//! Event hub for the operations feed.
//!
//! The hub is the only place sequence numbers are issued. Producers hand it
//! [`EventDraft`](opsfeed_types::EventDraft)s; viewers hold a
//! [`Subscription`] and receive sealed events in one global order.
//!
//! ```text
//!  interpreter ─┐
//!  ambient ─────┼──► EventHub::publish ──► seq++ ──► history ring (N=500)
//!  scenario ────┘                               └──► try_send to each subscriber
//!                                                    (full/closed ⇒ pruned)
//! ```

mod config;
mod hub;
mod subscription;

pub use config::{HubConfig, HubConfigError, DEFAULT_HISTORY_CAPACITY};
pub use hub::{EventHub, HubHealth};
pub use subscription::{DropReason, SubscriberId, Subscription};
