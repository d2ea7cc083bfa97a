//! Command interpreter.

use crate::dispatch::{classify, Command, Verb, CORRECT_KEYWORDS, FOCUS_KEYWORDS};
use crate::lookup::{Placeholder, StatusLookup, TruckLocator};
use crate::path::{dedupe, extract_path, scan_nodes};
use crate::suggest;
use indexmap::IndexMap;
use opsfeed_types::{
    Corridor, EventBody, EventDraft, Focus, NodeId, QueryResult, Reroute, RerouteScope, Source,
    Topology, TruckId,
};
use regex::Regex;
use std::fmt;
use std::sync::{Arc, LazyLock};
use tracing::trace;

/// Message carried by the `error` event for blank input.
pub const EMPTY_COMMAND: &str = "Empty command";

/// Usage text returned for help phrases.
pub const USAGE: &str = "Commands: \
Disrupt <A>–<B> | Fix <A>–<B> | Reroute <A> -> <B> -> <C> | \
Status <node>[, <node>...] | Where <truck> | Focus <node>";

static TRUCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bT\d+\b").expect("truck pattern"));

static STATUS_TOKENS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,\s]+").expect("status separator pattern"));

/// Turns operator text into events.
///
/// Deterministic for a given topology and lookups. Never fails: anything it
/// cannot act on becomes a `clarify` or `error` event.
#[derive(Clone)]
pub struct Interpreter {
    topology: &'static Topology,
    status: Arc<dyn StatusLookup>,
    trucks: Arc<dyn TruckLocator>,
}

impl Interpreter {
    /// Interpreter over the given map with placeholder lookups.
    pub fn new(topology: &'static Topology) -> Self {
        Self {
            topology,
            status: Arc::new(Placeholder),
            trucks: Arc::new(Placeholder),
        }
    }

    /// Use a real status source for `status` queries.
    pub fn with_status_lookup(mut self, status: Arc<dyn StatusLookup>) -> Self {
        self.status = status;
        self
    }

    /// Use a real truck locator for `where` queries.
    pub fn with_truck_locator(mut self, trucks: Arc<dyn TruckLocator>) -> Self {
        self.trucks = trucks;
        self
    }

    /// Interpret text into a chat-sourced draft ready for the hub.
    pub fn interpret(&self, text: &str) -> EventDraft {
        EventDraft::new(Source::Chat, self.interpret_body(text))
    }

    /// Interpret text into an event body.
    pub fn interpret_body(&self, text: &str) -> EventBody {
        let command = Command::new(text);
        if command.is_empty() {
            return EventBody::error(EMPTY_COMMAND);
        }

        let verb = classify(&command);
        trace!(%verb, "Classified command");

        match verb {
            Verb::Disrupt => self.corridor_command(&command, "disrupt", "Disrupt", EventBody::Disruption),
            Verb::Correct => {
                let keyword = command
                    .leading_keyword(CORRECT_KEYWORDS)
                    .unwrap_or("correct");
                let label = title_case(keyword);
                self.corridor_command(&command, keyword, &label, EventBody::Correct)
            }
            Verb::Reroute => self.reroute(&command),
            Verb::Status => self.status(&command),
            Verb::Where => self.where_is(&command),
            Verb::Focus => self.focus(&command),
            Verb::Help => EventBody::QueryResult(QueryResult::Help(USAGE.to_string())),
            Verb::Unknown => EventBody::clarify(
                "I didn't understand that. Try one of these:",
                suggest::general_examples(),
            ),
        }
    }

    /// Shared disrupt/correct handling.
    fn corridor_command(
        &self,
        command: &Command<'_>,
        keyword: &str,
        label: &str,
        build: fn(Corridor) -> EventBody,
    ) -> EventBody {
        let nodes = extract_path(self.topology, command.rest_after(keyword));

        match nodes.as_slice() {
            [a, b, ..] => build(Corridor::new(a.clone(), b.clone())),
            [anchor] => EventBody::clarify(
                format!(
                    "Which corridor from {}?",
                    self.topology.display_name(anchor)
                ),
                suggest::corridor_options(self.topology, label, anchor),
            ),
            [] => EventBody::clarify(
                format!("Which corridor should I {keyword}?"),
                suggest::corridor_examples(label),
            ),
        }
    }

    fn reroute(&self, command: &Command<'_>) -> EventBody {
        let nodes = extract_path(self.topology, command.rest_after("reroute"));

        match nodes.as_slice() {
            [_, _, _, ..] => EventBody::Reroute(Reroute {
                path: nodes,
                scope: RerouteScope::Paused,
            }),
            [from, to] => EventBody::clarify(
                format!(
                    "Reroute {} -> {} through which warehouse?",
                    self.topology.display_name(from),
                    self.topology.display_name(to)
                ),
                suggest::detour_options(self.topology, from, to),
            ),
            _ => EventBody::clarify(
                "A reroute needs a full path of at least three warehouses.",
                suggest::reroute_examples(),
            ),
        }
    }

    fn status(&self, command: &Command<'_>) -> EventBody {
        let listed = STATUS_TOKENS
            .split(command.rest_after("status"))
            .filter_map(|token| self.topology.resolve(token))
            .collect();
        let mut nodes = dedupe(listed);
        if nodes.is_empty() {
            nodes = dedupe(scan_nodes(self.topology, command.text));
        }

        if nodes.is_empty() {
            return EventBody::clarify(
                "Status of which warehouse?",
                suggest::status_examples(),
            );
        }

        let answer: IndexMap<NodeId, _> = nodes
            .into_iter()
            .map(|node| {
                let record = self.status.lookup_status(&node);
                (node, record)
            })
            .collect();
        EventBody::QueryResult(QueryResult::Status(answer))
    }

    fn where_is(&self, command: &Command<'_>) -> EventBody {
        let truck = TRUCK
            .find_iter(command.text)
            .find_map(|m| TruckId::parse(m.as_str()));

        match truck {
            Some(truck) => EventBody::QueryResult(QueryResult::Where(self.trucks.locate(&truck))),
            None => EventBody::clarify("Which truck?", suggest::where_examples()),
        }
    }

    fn focus(&self, command: &Command<'_>) -> EventBody {
        let keyword = command.leading_keyword(FOCUS_KEYWORDS).unwrap_or("focus");
        match scan_nodes(self.topology, command.rest_after(keyword)).into_iter().next() {
            Some(target) => EventBody::Focus(Focus { target }),
            None => EventBody::clarify("Focus on which warehouse?", suggest::focus_examples()),
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new(Topology::standard())
    }
}

impl fmt::Debug for Interpreter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interpreter")
            .field("warehouses", &self.topology.warehouses().len())
            .finish()
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opsfeed_types::{EventType, StatusRecord};
    use opsfeed_test_helpers::{disruption_draft, focus_draft, node, truck};
    use serde_json::json;

    fn body(text: &str) -> EventBody {
        Interpreter::default().interpret_body(text)
    }

    fn clarify_options(body: &EventBody) -> Vec<String> {
        match body {
            EventBody::Clarify(c) => c.options.clone(),
            other => panic!("expected clarify, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_command_is_error() {
        for text in ["", "   ", "\n\t"] {
            match body(text) {
                EventBody::Error(e) => assert_eq!(e.message, "Empty command"),
                other => panic!("expected error, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_disrupt_with_arrow() {
        assert_eq!(
            body("Disrupt Delhi -> Hyderabad"),
            EventBody::Disruption(Corridor::new(node("WH1"), node("WH4")))
        );
    }

    #[test]
    fn test_disrupt_payload_wire_shape() {
        let value = serde_json::to_value(body("Disrupt Delhi -> Hyderabad")).unwrap();
        assert_eq!(value["type"], json!("disruption"));
        assert_eq!(value["payload"], json!({"a": "WH1", "b": "WH4"}));
    }

    #[test]
    fn test_disrupt_variants() {
        let expected = EventBody::Disruption(Corridor::new(node("WH1"), node("WH4")));
        assert_eq!(body("disrupt Delhi–Hyderabad"), expected);
        assert_eq!(body("Disrupt Delhi Hyderabad"), expected);
        assert_eq!(body("Disrupt Delhi-Hyderabad"), expected);
        assert_eq!(body("Disrupt dli to hyd"), expected);
        assert_eq!(body("DISRUPT wh1 wh4 wh2"), expected);
    }

    #[test]
    fn test_disrupt_single_node_suggests_corridors() {
        let result = body("Disrupt Delhi");
        let options = clarify_options(&result);
        assert!(!options.is_empty() && options.len() <= 3);
        for option in &options {
            assert!(option.starts_with("Disrupt Delhi–"), "bad option {option}");
        }
    }

    #[test]
    fn test_disrupt_unknown_single_node_offers_cancel() {
        assert_eq!(clarify_options(&body("Disrupt WH77")), ["Cancel"]);
    }

    #[test]
    fn test_disrupt_without_nodes_gives_examples() {
        let options = clarify_options(&body("disrupt something"));
        assert_eq!(options.len(), 3);
        assert!(options.iter().all(|o| o.starts_with("Disrupt ")));
    }

    #[test]
    fn test_correct_and_fix() {
        let expected = EventBody::Correct(Corridor::new(node("WH1"), node("WH4")));
        assert_eq!(body("Fix Delhi–Hyderabad"), expected);
        assert_eq!(body("correct Delhi -> Hyderabad"), expected);

        let options = clarify_options(&body("fix Mumbai"));
        assert!(options.iter().all(|o| o.starts_with("Fix Mumbai–")));
        let options = clarify_options(&body("Correct Mumbai"));
        assert!(options.iter().all(|o| o.starts_with("Correct Mumbai–")));
    }

    #[test]
    fn test_verb_forms_dispatch_by_prefix() {
        assert_eq!(
            body("Disruption Delhi -> Hyderabad"),
            EventBody::Disruption(Corridor::new(node("WH1"), node("WH4")))
        );
        match body("Rerouting Delhi -> Mumbai -> Hyderabad") {
            EventBody::Reroute(r) => {
                assert_eq!(r.path, vec![node("WH1"), node("WH2"), node("WH4")]);
            }
            other => panic!("expected reroute, got {other:?}"),
        }
        assert_eq!(
            body("Fixed Delhi-Hyderabad"),
            EventBody::Correct(Corridor::new(node("WH1"), node("WH4")))
        );
        assert_eq!(
            body("Zooming Hyderabad"),
            EventBody::Focus(Focus { target: node("WH4") })
        );

        let options = clarify_options(&body("Fixed Mumbai"));
        assert!(!options.is_empty());
        assert!(options.iter().all(|o| o.starts_with("Fix Mumbai–")), "{options:?}");
    }

    #[test]
    fn test_reroute_full_path() {
        match body("Reroute Delhi -> Mumbai -> Hyderabad") {
            EventBody::Reroute(r) => {
                assert_eq!(r.path, vec![node("WH1"), node("WH2"), node("WH4")]);
                assert_eq!(r.scope, RerouteScope::Paused);
            }
            other => panic!("expected reroute, got {other:?}"),
        }
        let value = serde_json::to_value(body("Reroute Delhi -> Mumbai -> Hyderabad")).unwrap();
        assert_eq!(value["payload"]["scope"], json!("paused"));
        assert_eq!(value["payload"]["path"], json!(["WH1", "WH2", "WH4"]));
    }

    #[test]
    fn test_reroute_anywhere_in_text() {
        match body("please reroute Delhi → Mumbai → Hyderabad") {
            EventBody::Reroute(r) => assert_eq!(r.path.len(), 3),
            other => panic!("expected reroute, got {other:?}"),
        }
    }

    #[test]
    fn test_reroute_two_nodes_suggests_detours() {
        let options = clarify_options(&body("Reroute Delhi -> Mumbai"));
        assert!(!options.is_empty() && options.len() <= 2);
        for option in &options {
            assert!(option.starts_with("Reroute Delhi -> "));
            assert!(option.ends_with(" -> Mumbai"));
        }
    }

    #[test]
    fn test_reroute_too_few_nodes() {
        assert_eq!(clarify_options(&body("reroute Delhi")).len(), 2);
        assert_eq!(clarify_options(&body("reroute")).len(), 2);
    }

    #[test]
    fn test_status_lists_nodes_in_order() {
        match body("Status Mumbai, Kolkata") {
            EventBody::QueryResult(QueryResult::Status(answer)) => {
                let keys: Vec<&str> = answer.keys().map(NodeId::as_str).collect();
                assert_eq!(keys, ["WH2", "WH5"]);
                assert!(answer.values().all(|r| *r == StatusRecord::placeholder()));
            }
            other => panic!("expected status, got {other:?}"),
        }
    }

    #[test]
    fn test_status_answer_wire_shape() {
        let value = serde_json::to_value(body("status wh2")).unwrap();
        assert_eq!(value["type"], json!("query_result"));
        assert_eq!(value["payload"]["kind"], json!("status"));
        assert_eq!(
            value["payload"]["answer"]["WH2"],
            json!({"inv": null, "in": null, "out": null, "note": "status placeholder"})
        );
    }

    #[test]
    fn test_status_dedupes_and_falls_back_to_scanning() {
        match body("status mumbai mum WH2 delhi") {
            EventBody::QueryResult(QueryResult::Status(answer)) => {
                let keys: Vec<&str> = answer.keys().map(NodeId::as_str).collect();
                assert_eq!(keys, ["WH2", "WH1"]);
            }
            other => panic!("expected status, got {other:?}"),
        }
        // "new delhi" is not a single comma/space token, the scanner finds "delhi".
        match body("status of new-delhi") {
            EventBody::QueryResult(QueryResult::Status(answer)) => {
                assert_eq!(answer.keys().next(), Some(&node("WH1")));
            }
            other => panic!("expected status, got {other:?}"),
        }
        assert_eq!(clarify_options(&body("status of everything")).len(), 2);
    }

    #[test]
    fn test_where_finds_truck() {
        assert_eq!(
            body("Where is t12?"),
            EventBody::QueryResult(QueryResult::Where(
                "T12: location lookup not yet implemented".to_string()
            ))
        );
        assert_eq!(clarify_options(&body("where is my truck")).len(), 2);
    }

    #[test]
    fn test_focus_and_zoom() {
        assert_eq!(
            body("Zoom to Hyderabad"),
            EventBody::Focus(Focus { target: node("WH4") })
        );
        assert_eq!(
            body("focus wh3 and wh4"),
            EventBody::Focus(Focus { target: node("WH3") })
        );
        assert_eq!(clarify_options(&body("focus")).len(), 2);
    }

    #[test]
    fn test_help_phrases() {
        match body("help") {
            EventBody::QueryResult(QueryResult::Help(text)) => assert_eq!(text, USAGE),
            other => panic!("expected help, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_text_gets_generic_clarify() {
        let result = body("make it rain");
        assert_eq!(result.event_type(), EventType::Clarify);
        assert_eq!(clarify_options(&result).len(), 4);
    }

    #[test]
    fn test_suggestions_are_actionable() {
        // Every suggested follow-up should itself interpret to a domain event.
        for text in ["Disrupt Delhi", "Fix Kolkata", "Reroute Delhi -> Mumbai", "hello"] {
            for option in clarify_options(&body(text)) {
                let follow_up = body(&option);
                assert!(
                    !matches!(follow_up, EventBody::Clarify(_) | EventBody::Error(_)),
                    "suggestion {option:?} from {text:?} is not actionable: {follow_up:?}"
                );
            }
        }
    }

    #[test]
    fn test_custom_lookups_are_used() {
        struct Fleet;
        impl TruckLocator for Fleet {
            fn locate(&self, id: &TruckId) -> String {
                if *id == truck(7) {
                    format!("{id} is at Hyderabad")
                } else {
                    format!("{id} is not in the fleet")
                }
            }
        }
        struct Stock;
        impl StatusLookup for Stock {
            fn lookup_status(&self, _node: &NodeId) -> StatusRecord {
                StatusRecord {
                    inv: Some(120),
                    inbound: Some(3),
                    out: Some(1),
                    note: "live".to_string(),
                }
            }
        }

        let interpreter = Interpreter::default()
            .with_truck_locator(Arc::new(Fleet))
            .with_status_lookup(Arc::new(Stock));

        assert_eq!(
            interpreter.interpret_body("where T7"),
            EventBody::QueryResult(QueryResult::Where("T7 is at Hyderabad".to_string()))
        );
        assert_eq!(
            interpreter.interpret_body("where is T8"),
            EventBody::QueryResult(QueryResult::Where("T8 is not in the fleet".to_string()))
        );
        match interpreter.interpret_body("status delhi") {
            EventBody::QueryResult(QueryResult::Status(answer)) => {
                assert_eq!(answer[&node("WH1")].inv, Some(120));
            }
            other => panic!("expected status, got {other:?}"),
        }
    }

    #[test]
    fn test_interpret_tags_chat_source() {
        let interpreter = Interpreter::default();
        let draft = interpreter.interpret("Focus Delhi");
        assert_eq!(draft.source(), Source::Chat);
        assert_eq!(draft, focus_draft(Source::Chat, 1));
        assert_eq!(
            interpreter.interpret("Disrupt Delhi -> Hyderabad"),
            disruption_draft(Source::Chat, 1, 4)
        );
    }

    #[test]
    fn test_interpret_is_deterministic() {
        let interpreter = Interpreter::default();
        for text in ["Disrupt Delhi", "Status Mumbai, Kolkata", "Reroute a -> b", "?"] {
            assert_eq!(interpreter.interpret_body(text), interpreter.interpret_body(text));
        }
    }
}
