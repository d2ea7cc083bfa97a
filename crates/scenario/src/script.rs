//! Scenario scripts and their JSON document form.
//!
//! ```json
//! {
//!   "events": [
//!     {"delay_ms": 0,   "event": {"type": "focus", "payload": {"target": "WH1"}}},
//!     {"delay_ms": 800, "event": {"type": "disruption", "payload": {"a": "WH1", "b": "WH4"}}},
//!     {"at_ms": 5000,   "type": "correct", "payload": {"a": "WH1", "b": "WH4"}}
//!   ]
//! }
//! ```
//!
//! `steps` is accepted in place of `events`. A step carries its event either
//! nested under `event` or inline. A missing or unrecognised `type` plays as
//! `tick`; a recognised type whose payload does not fit is rejected.

use crate::ScenarioError;
use opsfeed_types::{EventBody, EventType};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::time::Duration;

/// When a step fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepTiming {
    /// Delay after the previous step's scheduled time.
    AfterPrevious(Duration),
    /// Offset from the start of the run.
    AtOffset(Duration),
}

impl Default for StepTiming {
    fn default() -> Self {
        StepTiming::AfterPrevious(Duration::ZERO)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioStep {
    pub timing: StepTiming,
    pub body: EventBody,
}

/// An ordered, timed list of events.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scenario {
    pub steps: Vec<ScenarioStep>,
}

impl Scenario {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step that fires `delay` after the previous one.
    pub fn then_after(mut self, delay: Duration, body: EventBody) -> Self {
        self.steps.push(ScenarioStep {
            timing: StepTiming::AfterPrevious(delay),
            body,
        });
        self
    }

    /// Append a step that fires at `offset` from run start.
    pub fn then_at(mut self, offset: Duration, body: EventBody) -> Self {
        self.steps.push(ScenarioStep {
            timing: StepTiming::AtOffset(offset),
            body,
        });
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Scheduled offset from run start for every step.
    ///
    /// Offsets never decrease: an absolute offset earlier than the previous
    /// step fires together with it.
    pub fn offsets(&self) -> Vec<Duration> {
        let mut previous = Duration::ZERO;
        self.steps
            .iter()
            .map(|step| {
                previous = match step.timing {
                    StepTiming::AfterPrevious(delay) => previous + delay,
                    StepTiming::AtOffset(offset) => offset.max(previous),
                };
                previous
            })
            .collect()
    }

    /// Offset of the last step.
    pub fn duration(&self) -> Duration {
        self.offsets().last().copied().unwrap_or_default()
    }

    /// Parse a scenario document.
    pub fn from_json(id: &str, text: &str) -> Result<Self, ScenarioError> {
        let document: Document =
            serde_json::from_str(text).map_err(|e| ScenarioError::parse(id, e))?;

        let steps = document
            .events
            .into_iter()
            .enumerate()
            .map(|(index, raw)| {
                raw.into_step()
                    .map_err(|reason| ScenarioError::parse(id, format!("step {index}: {reason}")))
            })
            .collect::<Result<_, _>>()?;

        Ok(Self { steps })
    }
}

#[derive(Debug, Deserialize)]
struct Document {
    #[serde(default, alias = "steps")]
    events: Vec<RawStep>,
}

#[derive(Debug, Default, Deserialize)]
struct RawEvent {
    #[serde(rename = "type")]
    kind: Option<String>,
    payload: Option<Value>,
}

/// A millisecond count written as an integer, a float or a numeric string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawMillis {
    Int(i64),
    Float(f64),
    Text(String),
}

impl RawMillis {
    /// Floats truncate toward zero; negative times count as zero.
    fn to_duration(&self, field: &str) -> Result<Duration, String> {
        let ms = match self {
            RawMillis::Int(ms) => *ms,
            RawMillis::Float(ms) if ms.is_finite() => ms.trunc() as i64,
            RawMillis::Float(ms) => return Err(format!("invalid {field} {ms}")),
            RawMillis::Text(text) => text
                .trim()
                .parse::<i64>()
                .map_err(|_| format!("invalid {field} {text:?}"))?,
        };
        Ok(Duration::from_millis(ms.max(0) as u64))
    }
}

#[derive(Debug, Deserialize)]
struct RawStep {
    delay_ms: Option<RawMillis>,
    at_ms: Option<RawMillis>,
    event: Option<RawEvent>,
    #[serde(flatten)]
    inline: RawEvent,
}

impl RawStep {
    fn into_step(self) -> Result<ScenarioStep, String> {
        let timing = match (&self.delay_ms, &self.at_ms) {
            (Some(_), Some(_)) => return Err("both delay_ms and at_ms given".to_string()),
            (Some(delay), None) => StepTiming::AfterPrevious(delay.to_duration("delay_ms")?),
            (None, Some(at)) => StepTiming::AtOffset(at.to_duration("at_ms")?),
            (None, None) => StepTiming::default(),
        };
        let body = self.event.unwrap_or(self.inline).into_body()?;
        Ok(ScenarioStep { timing, body })
    }
}

impl RawEvent {
    fn into_body(self) -> Result<EventBody, String> {
        let Some(kind) = self.kind.as_deref().and_then(EventType::from_name) else {
            return Ok(EventBody::tick());
        };

        let payload = match self.payload {
            None | Some(Value::Null) => Value::Object(Map::new()),
            Some(payload) => payload,
        };
        serde_json::from_value(json!({ "type": kind.as_str(), "payload": payload }))
            .map_err(|e| format!("invalid {kind} payload: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opsfeed_test_helpers::node;
    use opsfeed_types::{Corridor, Focus};

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_parse_nested_events() {
        let text = r#"{"events": [
            {"delay_ms": 0, "event": {"type": "focus", "payload": {"target": "WH1"}}},
            {"delay_ms": 800, "event": {"type": "disruption", "payload": {"a": "WH1", "b": "WH4"}}}
        ]}"#;
        let scenario = Scenario::from_json("demo", text).unwrap();
        assert_eq!(
            scenario,
            Scenario::new()
                .then_after(ms(0), EventBody::Focus(Focus { target: node("WH1") }))
                .then_after(
                    ms(800),
                    EventBody::Disruption(Corridor::new(node("WH1"), node("WH4")))
                )
        );
    }

    #[test]
    fn test_parse_inline_steps_with_offsets() {
        let text = r#"{"steps": [
            {"at_ms": 1500, "type": "lane_add", "payload": {"a": "WH5", "b": "WH6"}},
            {"type": "tick"}
        ]}"#;
        let scenario = Scenario::from_json("inline", text).unwrap();
        assert_eq!(scenario.steps[0].timing, StepTiming::AtOffset(ms(1500)));
        assert_eq!(
            scenario.steps[0].body,
            EventBody::LaneAdd(Corridor::new(node("WH5"), node("WH6")))
        );
        assert_eq!(scenario.steps[1].timing, StepTiming::AfterPrevious(ms(0)));
        assert_eq!(scenario.steps[1].body, EventBody::tick());
    }

    #[test]
    fn test_unknown_or_missing_type_plays_as_tick() {
        let text = r#"{"events": [
            {"delay_ms": 10, "event": {"type": "meteor_strike", "payload": {"x": 1}}},
            {"delay_ms": 10, "event": {}},
            {"delay_ms": 10}
        ]}"#;
        let scenario = Scenario::from_json("odd", text).unwrap();
        assert_eq!(scenario.len(), 3);
        assert!(scenario.steps.iter().all(|s| s.body == EventBody::tick()));
    }

    #[test]
    fn test_negative_delay_clamped() {
        let scenario =
            Scenario::from_json("neg", r#"{"events": [{"delay_ms": -200}]}"#).unwrap();
        assert_eq!(scenario.steps[0].timing, StepTiming::AfterPrevious(Duration::ZERO));
    }

    #[test]
    fn test_numeric_times_accept_floats_and_strings() {
        let scenario = Scenario::from_json(
            "loose",
            r#"{"events": [
                {"delay_ms": 800.0},
                {"delay_ms": "250"},
                {"at_ms": " 4000 "},
                {"at_ms": 1500.9},
                {"delay_ms": "-30"}
            ]}"#,
        )
        .unwrap();
        let timings: Vec<StepTiming> = scenario.steps.iter().map(|s| s.timing).collect();
        assert_eq!(
            timings,
            [
                StepTiming::AfterPrevious(ms(800)),
                StepTiming::AfterPrevious(ms(250)),
                StepTiming::AtOffset(ms(4000)),
                StepTiming::AtOffset(ms(1500)),
                StepTiming::AfterPrevious(Duration::ZERO),
            ]
        );
    }

    #[test]
    fn test_non_numeric_time_rejected() {
        let err = Scenario::from_json("words", r#"{"events": [{"tick": 1}, {"delay_ms": "soon"}]}"#)
            .unwrap_err();
        assert!(
            err.user_message().contains("step 1: invalid delay_ms \"soon\""),
            "{}",
            err.user_message()
        );
    }

    #[test]
    fn test_empty_document() {
        assert!(Scenario::from_json("empty", "{}").unwrap().is_empty());
    }

    #[test]
    fn test_rejects_bad_documents() {
        let err = Scenario::from_json("broken", "{not json").unwrap_err();
        assert!(matches!(err, ScenarioError::Parse { .. }));

        let err = Scenario::from_json(
            "both",
            r#"{"events": [{"delay_ms": 1, "at_ms": 2, "type": "tick"}]}"#,
        )
        .unwrap_err();
        assert!(err.user_message().contains("both delay_ms and at_ms"));

        let err = Scenario::from_json(
            "shape",
            r#"{"events": [{"type": "disruption", "payload": {"a": "Delhi"}}]}"#,
        )
        .unwrap_err();
        assert!(err.user_message().contains("step 0: invalid disruption payload"));
    }

    #[test]
    fn test_offsets_mix_relative_and_absolute() {
        let scenario = Scenario::new()
            .then_after(ms(100), EventBody::tick())
            .then_at(ms(1000), EventBody::tick())
            .then_after(ms(250), EventBody::tick())
            // Earlier than the previous step: fires with it.
            .then_at(ms(500), EventBody::tick())
            .then_after(ms(0), EventBody::tick());
        assert_eq!(
            scenario.offsets(),
            [ms(100), ms(1000), ms(1250), ms(1250), ms(1250)]
        );
        assert_eq!(scenario.duration(), ms(1250));
    }
}
