//! Free-text operator command interpreter.
//!
//! Turns a line of operator chat into exactly one [`EventDraft`]. Input is
//! classified by its leading verb (see [`DISPATCH_ORDER`]), warehouse names
//! and aliases are resolved against a [`Topology`], and anything that cannot
//! be acted on becomes a `clarify` event with follow-up suggestions.
//!
//! | Input                                  | Event          |
//! |----------------------------------------|----------------|
//! | `Disrupt Delhi -> Hyderabad`           | `disruption`   |
//! | `Fix Delhi–Hyderabad`                  | `correct`      |
//! | `Reroute Delhi -> Mumbai -> Hyderabad` | `reroute`      |
//! | `Status Mumbai, Kolkata`               | `query_result` |
//! | `Where is T12?`                        | `query_result` |
//! | `Focus Hyderabad`                      | `focus`        |
//! | `help`                                 | `query_result` |
//! | blank                                  | `error`        |
//! | anything else                          | `clarify`      |
//!
//! The interpreter is pure. It never touches the hub; callers publish the
//! returned draft themselves.
//!
//! [`Topology`]: opsfeed_types::Topology

mod dispatch;
mod interpreter;
mod lookup;
mod path;
mod suggest;

pub use dispatch::{
    classify, Command, Rule, Verb, CORRECT_KEYWORDS, DISPATCH_ORDER, FOCUS_KEYWORDS, HELP_PHRASES,
};
pub use interpreter::{Interpreter, EMPTY_COMMAND, USAGE};
pub use lookup::{Placeholder, StatusLookup, TruckLocator};
pub use suggest::{CANCEL_OPTION, MAX_CORRIDOR_SUGGESTIONS, MAX_DETOUR_SUGGESTIONS};

use opsfeed_types::EventDraft;

/// Interpret text with the standard topology and placeholder lookups.
pub fn interpret(text: &str) -> EventDraft {
    Interpreter::default().interpret(text)
}
