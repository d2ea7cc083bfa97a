//! Operations feed runtime.
//!
//! [`Feed`] is the composition root: it builds the hub from configuration
//! and wires the command interpreter, the ambient generator and the
//! scenario scheduler to it. The `opsfeed` binary drives a feed from the
//! console, printing every event as a JSON line on stdout.

mod config;
mod console;
mod feed;
mod telemetry;

pub use config::{ConfigError, FeedConfig};
pub use console::{parse_line, ConsoleCommand, CONSOLE_USAGE};
pub use feed::{CommandAck, Feed, ScenarioAck};
pub use telemetry::{init_tracing, TelemetryConfig};
