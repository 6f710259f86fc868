//! Control-signal to directive-line mapping for regenerated prompts.
//!
//! The same exhaustive-mapping contract as the realtime conversation turns,
//! expressed as a single line appended to the rebuilt plan.

use podcast_types::{ControlSignal, DepthChange, Direction, SpeedChange, ToneChange};

pub fn directive_for(signal: &ControlSignal) -> String {
    match signal {
        ControlSignal::TopicAppend(keyword) => format!("새로운 주제 추가: {keyword}"),
        ControlSignal::TopicRemove(keyword) => format!("주제 제거: {keyword}"),
        ControlSignal::Depth(DepthChange::Deeper) => {
            "내용 깊이 조정: 더 깊고 자세하게".to_string()
        }
        ControlSignal::Depth(DepthChange::Simpler) => {
            "내용 깊이 조정: 더 쉽고 간단하게".to_string()
        }
        ControlSignal::Speed(SpeedChange::Faster) => "말하기 속도 조정: 빨리".to_string(),
        ControlSignal::Speed(SpeedChange::Slower) => "말하기 속도 조정: 느리게".to_string(),
        ControlSignal::Tone(ToneChange::Softer) => "톤 조정: 부드럽고 차분하게".to_string(),
        ControlSignal::Tone(ToneChange::Energetic) => {
            "톤 조정: 에너지 있고 활기차게".to_string()
        }
        ControlSignal::Navigate(Direction::Next) => "다음 주제로 이동".to_string(),
        ControlSignal::Navigate(Direction::Prev) => "이전 주제로 이동".to_string(),
        ControlSignal::Summarize => "현재까지의 내용을 요약해주세요".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_variant_maps_to_a_nonempty_directive() {
        let mut signals = ControlSignal::fixed_variants();
        signals.push(ControlSignal::TopicAppend("환율".to_string()));
        signals.push(ControlSignal::TopicRemove("환율".to_string()));
        for signal in signals {
            assert!(!directive_for(&signal).is_empty(), "{signal:?}");
        }
    }

    #[test]
    fn directives_differ_from_realtime_utterances_where_documented() {
        // The fallback phrasing is more explicit than the conversation turn.
        assert_eq!(
            directive_for(&ControlSignal::Depth(DepthChange::Deeper)),
            "내용 깊이 조정: 더 깊고 자세하게"
        );
        assert_eq!(
            directive_for(&ControlSignal::Summarize),
            "현재까지의 내용을 요약해주세요"
        );
    }
}
