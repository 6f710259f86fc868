//! Prompt assembly for both orchestration modes.
//!
//! Everything here is pure string formatting: the realtime session
//! instructions, the fallback generation plan, and the fixed lookup tables
//! that turn enumerated preferences into Korean labels and synthesis voices.
//! No network calls, no state.

use podcast_types::{InputMode, Language, PodcastConfig, PodcastLength, TonePreference};

/// System prompt shared by the realtime session and the fallback generator.
pub const SYSTEM_BASE_PROMPT: &str = "You are a Korean podcast DJ AI that generates personalized audio shows based on the user's keywords, tone hints, and target length.

Key instructions:
- Speak NATURALLY in Korean.
- Immediately begin speaking when the session starts.
- Structure content into short segments with smooth transitions and occasional summaries.
- Adapt in real time to control signals: deeper/simpler, faster/slower, softer/energetic, next/prev, summarize, topic append/remove.
- Keep hallucinations minimal; if uncertain, say you're uncertain and move on.
- NEVER mention tokens, APIs, or system details to the listener.
- Use natural pauses and conversational tone.
- When adapting to feedback, acknowledge the change briefly and continue smoothly.";

/// Voice used when a tone cannot be resolved, and by the session endpoint.
pub const DEFAULT_VOICE: &str = "alloy";

/// Upper bound, in characters, on the source excerpt embedded in the
/// realtime instructions.
pub const SOURCE_EXCERPT_MAX: usize = 1600;

/// Upper bound on the source excerpt embedded in the fallback plan, which is
/// regenerated on every control signal and so kept much shorter.
pub const PLAN_EXCERPT_MAX: usize = 200;

const NO_SOURCE_LABEL: &str = "추가 참고 자료 없음";
const NO_KEYWORDS_LABEL: &str = "사용자 지정 없음";
const DEFAULT_TOPIC: &str = "오늘의 추천 이슈";

/// Maps a tone preference to its synthesis voice. Every variant resolves to
/// a non-empty name; `DEFAULT_VOICE` covers anything outside this table.
pub fn tone_to_voice(tone: TonePreference) -> &'static str {
    match tone {
        TonePreference::Soft => "shimmer",
        TonePreference::Energetic => "nova",
        TonePreference::Calm => "alloy",
        TonePreference::Narrative => "onyx",
    }
}

fn tone_label(tone: TonePreference) -> &'static str {
    match tone {
        TonePreference::Soft => "부드럽고 따뜻한 톤",
        TonePreference::Energetic => "에너지 넘치고 리드미컬한 톤",
        TonePreference::Calm => "차분하고 안정적인 톤",
        TonePreference::Narrative => "다큐멘터리식 서사 톤",
    }
}

fn length_label(length: PodcastLength) -> &'static str {
    match length {
        PodcastLength::Minutes5 => "약 5분",
        PodcastLength::Minutes10 => "약 10분",
        PodcastLength::Minutes30 => "약 30분",
        PodcastLength::Minutes60 => "약 1시간",
        PodcastLength::Continuous => "중단 없이 이어지는 라이브 모드",
    }
}

fn topic_or_default(config: &PodcastConfig) -> &str {
    if config.topic.trim().is_empty() {
        DEFAULT_TOPIC
    } else {
        &config.topic
    }
}

fn keyword_list(config: &PodcastConfig) -> String {
    if config.content_keywords.is_empty() {
        NO_KEYWORDS_LABEL.to_string()
    } else {
        config.content_keywords.join(", ")
    }
}

/// Truncates `text` to at most `max_chars` characters, appending the `...`
/// marker only when something was actually cut. Operates on characters, not
/// bytes; most source material here is Korean.
fn truncate_chars(text: &str, max_chars: usize) -> String {
    let mut count = 0;
    for (idx, _) in text.char_indices() {
        if count == max_chars {
            return format!("{}...", &text[..idx]);
        }
        count += 1;
    }
    text.to_string()
}

fn source_excerpt(config: &PodcastConfig, max_chars: usize) -> String {
    match config.source_text() {
        Some(text) => truncate_chars(text, max_chars),
        None => NO_SOURCE_LABEL.to_string(),
    }
}

/// Builds the model instructions for a realtime session. Deterministic given
/// identical input.
pub fn build_instructions(config: &PodcastConfig) -> String {
    format!(
        "당신은 실시간으로 음성을 생성하는 한국어 팟캐스트 DJ입니다. 아래 정보를 참고하여 청취자에게 맞춤형 팟캐스트를 제공합니다.

- 주제: {topic}
- 원하는 팟캐스트 길이: {length}
- 키워드: {keywords}
- TTS 톤: {tone}
- 참고 자료: {source}

필수 지침:
- 사용자에게 되묻는 표현을 절대 사용하지 마세요. 주제가 모호하더라도 주어진 정보와 사전 지식을 바탕으로 최선을 다해 내용을 구성하고 진행하세요.
- 팟캐스트는 최소 5분 길이(약 1200단어 이상)여야 합니다. 충분히 길고 상세한 내용을 담아주세요.
- 자연스러운 한국어로만 말하세요. \"세그먼트 1\"과 같은 구조적인 표현은 절대 사용하지 마세요.
- 세션이 시작되면 즉시 말하기 시작하세요.
- 부드러운 전환과 가끔 요약을 포함하세요.
- 청취자에게 토큰, API, 시스템 세부 정보 등을 절대 언급하지 마세요.
",
        topic = topic_or_default(config),
        length = length_label(config.length),
        keywords = keyword_list(config),
        tone = tone_label(config.tone),
        source = source_excerpt(config, SOURCE_EXCERPT_MAX),
    )
}

/// Builds the user plan used as the generation prompt body in fallback mode.
pub fn build_plan(config: &PodcastConfig) -> String {
    let topic_description = match config.mode {
        InputMode::File | InputMode::Pdf if config.source_text().is_some() => {
            format!("파일 내용 기반: {}", source_excerpt(config, PLAN_EXCERPT_MAX))
        }
        _ => format!("컨텐츠 키워드: {}", keyword_list(config)),
    };

    format!(
        "주제: {topic}
{topic_description}
톤: {tone}
길이: {length}
언어: {language}
요청: 위 주제로 3~5개 세그먼트를 구성해 바로 말하기 시작. 각 세그먼트는 1~2분 분량.
피드백 신호가 오면 즉시 반영.",
        topic = topic_or_default(config),
        tone = tone_label(config.tone),
        length = length_label(config.length),
        language = match config.language {
            Language::Ko => "한국어",
            Language::En => "English",
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PodcastConfig {
        PodcastConfig {
            topic: "오늘의 경제 뉴스".to_string(),
            mode: InputMode::Keywords,
            content_keywords: vec!["금리".to_string(), "주식".to_string()],
            length: PodcastLength::Minutes10,
            tone: TonePreference::Soft,
            file_text: None,
            pdf_text: None,
            language: Language::Ko,
        }
    }

    #[test]
    fn instructions_carry_topic_keywords_length_and_tone() {
        let instructions = build_instructions(&config());
        assert!(instructions.contains("오늘의 경제 뉴스"));
        assert!(instructions.contains("금리, 주식"));
        assert!(instructions.contains("약 10분"));
        assert!(instructions.contains("부드럽고 따뜻한 톤"));
        assert!(instructions.contains(NO_SOURCE_LABEL));
    }

    #[test]
    fn instructions_are_deterministic() {
        assert_eq!(build_instructions(&config()), build_instructions(&config()));
    }

    #[test]
    fn empty_topic_falls_back_to_the_default_issue() {
        let mut config = config();
        config.topic = "  ".to_string();
        assert!(build_instructions(&config).contains(DEFAULT_TOPIC));
    }

    #[test]
    fn pdf_text_takes_precedence_over_file_text() {
        let mut config = config();
        config.file_text = Some("파일 본문".to_string());
        config.pdf_text = Some("PDF 본문".to_string());
        let instructions = build_instructions(&config);
        assert!(instructions.contains("PDF 본문"));
        assert!(!instructions.contains("파일 본문"));
    }

    #[test]
    fn long_source_text_is_truncated_with_marker() {
        let mut config = config();
        config.pdf_text = Some("가".repeat(SOURCE_EXCERPT_MAX + 1));
        let instructions = build_instructions(&config);
        let expected = format!("{}...", "가".repeat(SOURCE_EXCERPT_MAX));
        assert!(instructions.contains(&expected));
    }

    #[test]
    fn source_text_at_the_bound_is_untouched() {
        let mut config = config();
        config.pdf_text = Some("나".repeat(SOURCE_EXCERPT_MAX));
        let instructions = build_instructions(&config);
        assert!(instructions.contains(&"나".repeat(SOURCE_EXCERPT_MAX)));
        assert!(!instructions.contains(&format!("{}...", "나".repeat(SOURCE_EXCERPT_MAX))));
    }

    #[test]
    fn plan_uses_source_excerpt_in_file_mode() {
        let mut config = config();
        config.mode = InputMode::Pdf;
        config.set_pdf_text("다".repeat(PLAN_EXCERPT_MAX * 2));
        let plan = build_plan(&config);
        assert!(plan.contains("파일 내용 기반"));
        assert!(plan.contains(&format!("{}...", "다".repeat(PLAN_EXCERPT_MAX))));
    }

    #[test]
    fn every_tone_resolves_to_a_named_voice() {
        for tone in [
            TonePreference::Soft,
            TonePreference::Energetic,
            TonePreference::Calm,
            TonePreference::Narrative,
        ] {
            assert!(!tone_to_voice(tone).is_empty());
        }
        assert_eq!(tone_to_voice(TonePreference::Soft), "shimmer");
        assert_eq!(tone_to_voice(TonePreference::Energetic), "nova");
        assert_eq!(tone_to_voice(TonePreference::Calm), "alloy");
        assert_eq!(tone_to_voice(TonePreference::Narrative), "onyx");
        assert!(!DEFAULT_VOICE.is_empty());
    }
}
