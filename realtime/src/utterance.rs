//! Control-signal to conversation-turn mapping.
//!
//! Every signal variant maps to exactly one short Korean user utterance; the
//! match is exhaustive on purpose so a new signal kind cannot ship without a
//! wire phrase.

use podcast_types::{ControlSignal, DepthChange, Direction, SpeedChange, ToneChange};

pub fn utterance_for(signal: &ControlSignal) -> String {
    match signal {
        ControlSignal::TopicAppend(keyword) => format!("새로운 주제 추가: {keyword}"),
        ControlSignal::TopicRemove(keyword) => format!("주제 제거: {keyword}"),
        ControlSignal::Depth(DepthChange::Deeper) => "내용 깊이 조정: 더 깊게".to_string(),
        ControlSignal::Depth(DepthChange::Simpler) => "내용 깊이 조정: 더 쉽게".to_string(),
        ControlSignal::Speed(SpeedChange::Faster) => "속도 조정: 빨리".to_string(),
        ControlSignal::Speed(SpeedChange::Slower) => "속도 조정: 느리게".to_string(),
        ControlSignal::Tone(ToneChange::Softer) => "톤 조정: 부드럽게".to_string(),
        ControlSignal::Tone(ToneChange::Energetic) => "톤 조정: 에너지 있게".to_string(),
        ControlSignal::Navigate(Direction::Next) => "다음 주제".to_string(),
        ControlSignal::Navigate(Direction::Prev) => "이전 주제".to_string(),
        ControlSignal::Summarize => "요약해줘".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_variant_maps_to_a_nonempty_utterance() {
        let mut signals = ControlSignal::fixed_variants();
        signals.push(ControlSignal::TopicAppend("금리".to_string()));
        signals.push(ControlSignal::TopicRemove("금리".to_string()));
        for signal in signals {
            assert!(!utterance_for(&signal).is_empty(), "{signal:?}");
        }
    }

    #[test]
    fn topic_signals_name_the_keyword() {
        assert_eq!(
            utterance_for(&ControlSignal::TopicAppend("주식".to_string())),
            "새로운 주제 추가: 주식"
        );
        assert_eq!(
            utterance_for(&ControlSignal::TopicRemove("주식".to_string())),
            "주제 제거: 주식"
        );
    }

    #[test]
    fn summarize_is_the_literal_phrase() {
        assert_eq!(utterance_for(&ControlSignal::Summarize), "요약해줘");
    }
}
