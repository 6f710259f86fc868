//! Discrete user intents that steer ongoing narration. Produced by UI button
//! presses or the voice-command matcher, consumed by exactly one orchestrator
//! depending on the active mode.

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepthChange {
    Deeper,
    Simpler,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedChange {
    Faster,
    Slower,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToneChange {
    Softer,
    Energetic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Next,
    Prev,
}

/// A control signal. Serializes to `{"type": "...", "value": ...}` with the
/// value omitted for `summarize`, matching the recorded UI events.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum ControlSignal {
    #[serde(rename = "topic.append")]
    TopicAppend(String),
    #[serde(rename = "topic.remove")]
    TopicRemove(String),
    #[serde(rename = "depth")]
    Depth(DepthChange),
    #[serde(rename = "speed")]
    Speed(SpeedChange),
    #[serde(rename = "tone")]
    Tone(ToneChange),
    #[serde(rename = "navigate")]
    Navigate(Direction),
    #[serde(rename = "summarize")]
    Summarize,
}

impl ControlSignal {
    /// All non-parameterized variants, used by tests to check that the
    /// per-orchestrator mappings stay exhaustive.
    pub fn fixed_variants() -> Vec<ControlSignal> {
        vec![
            ControlSignal::Depth(DepthChange::Deeper),
            ControlSignal::Depth(DepthChange::Simpler),
            ControlSignal::Speed(SpeedChange::Faster),
            ControlSignal::Speed(SpeedChange::Slower),
            ControlSignal::Tone(ToneChange::Softer),
            ControlSignal::Tone(ToneChange::Energetic),
            ControlSignal::Navigate(Direction::Next),
            ControlSignal::Navigate(Direction::Prev),
            ControlSignal::Summarize,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signals_use_the_recorded_wire_shape() {
        let json = serde_json::to_value(ControlSignal::TopicAppend("금리".to_string())).unwrap();
        assert_eq!(json["type"], "topic.append");
        assert_eq!(json["value"], "금리");

        let json = serde_json::to_value(ControlSignal::Depth(DepthChange::Deeper)).unwrap();
        assert_eq!(json["value"], "deeper");

        let json = serde_json::to_value(ControlSignal::Summarize).unwrap();
        assert_eq!(json["type"], "summarize");
        assert!(json.get("value").is_none());
    }

    #[test]
    fn signals_parse_from_ui_payloads() {
        let signal: ControlSignal =
            serde_json::from_str(r#"{"type":"navigate","value":"prev"}"#).unwrap();
        assert_eq!(signal, ControlSignal::Navigate(Direction::Prev));
    }
}
