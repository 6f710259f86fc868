//! Voice-command matching.
//!
//! Recognized speech is matched against a fixed phrase table by substring;
//! the first entry that matches wins and unmatched text produces no signal.

use podcast_types::{
    ControlSignal, DepthChange, Direction, SpeedChange, ToneChange, VoiceCommand,
};

/// Maps recognized voice-command text to a control signal.
pub fn match_voice_command(text: &str) -> Option<ControlSignal> {
    // Table order matters: earlier entries win on overlapping phrases.
    let table = [
        ("다음 주제", ControlSignal::Navigate(Direction::Next)),
        ("이전 주제", ControlSignal::Navigate(Direction::Prev)),
        ("요약해줘", ControlSignal::Summarize),
        ("더 깊게", ControlSignal::Depth(DepthChange::Deeper)),
        ("더 쉽게", ControlSignal::Depth(DepthChange::Simpler)),
        ("속도 빨리", ControlSignal::Speed(SpeedChange::Faster)),
        ("속도 느리게", ControlSignal::Speed(SpeedChange::Slower)),
        ("부드럽게", ControlSignal::Tone(ToneChange::Softer)),
        ("에너지 있게", ControlSignal::Tone(ToneChange::Energetic)),
    ];

    table
        .into_iter()
        .find(|(phrase, _)| text.contains(phrase))
        .map(|(_, signal)| signal)
}

/// Matches a recognized-speech record. Confidence and timestamp come from
/// the recognizer; matching itself only looks at the text.
pub fn match_spoken(command: &VoiceCommand) -> Option<ControlSignal> {
    match_voice_command(&command.text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phrases_match_as_substrings() {
        assert_eq!(
            match_voice_command("이제 다음 주제로 넘어가 줘"),
            Some(ControlSignal::Navigate(Direction::Next))
        );
        assert_eq!(
            match_voice_command("조금 더 쉽게 설명해"),
            Some(ControlSignal::Depth(DepthChange::Simpler))
        );
        assert_eq!(
            match_voice_command("속도 느리게 해줘"),
            Some(ControlSignal::Speed(SpeedChange::Slower))
        );
    }

    #[test]
    fn first_table_entry_wins_on_overlap() {
        // Contains both "다음 주제" and "요약해줘"; the earlier entry wins.
        assert_eq!(
            match_voice_command("다음 주제 말고 요약해줘"),
            Some(ControlSignal::Navigate(Direction::Next))
        );
    }

    #[test]
    fn unmatched_text_produces_no_signal() {
        assert_eq!(match_voice_command("안녕하세요"), None);
        assert_eq!(match_voice_command(""), None);
    }

    #[test]
    fn spoken_records_match_on_their_text() {
        let spoken = VoiceCommand {
            text: "속도 빨리 해줘".to_string(),
            confidence: 0.92,
            timestamp: 1_700_000_000_000,
        };
        assert_eq!(
            match_spoken(&spoken),
            Some(ControlSignal::Speed(SpeedChange::Faster))
        );
    }
}
