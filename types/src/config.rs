//! Configuration and session value objects shared by every crate in the
//! workspace. These are plain data carriers; the orchestrators own all
//! behavior.

/// How the listener chose to seed the show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    /// Topic is driven by the keyword list.
    Keywords,
    /// Topic is derived from an uploaded plain-text file.
    File,
    /// Topic is derived from an extracted PDF.
    Pdf,
}

/// Desired show length. Serialized as the raw minute count (`5`, `10`, `30`,
/// `60`) or the literal string `"continuous"`, matching the persisted record
/// format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "LengthWire", into = "LengthWire")]
pub enum PodcastLength {
    Minutes5,
    Minutes10,
    Minutes30,
    Minutes60,
    Continuous,
}

#[derive(serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
enum LengthWire {
    Minutes(u32),
    Label(String),
}

impl TryFrom<LengthWire> for PodcastLength {
    type Error = String;

    fn try_from(wire: LengthWire) -> Result<Self, Self::Error> {
        match wire {
            LengthWire::Minutes(5) => Ok(PodcastLength::Minutes5),
            LengthWire::Minutes(10) => Ok(PodcastLength::Minutes10),
            LengthWire::Minutes(30) => Ok(PodcastLength::Minutes30),
            LengthWire::Minutes(60) => Ok(PodcastLength::Minutes60),
            LengthWire::Minutes(n) => Err(format!("unsupported podcast length: {n}")),
            LengthWire::Label(label) if label == "continuous" => Ok(PodcastLength::Continuous),
            LengthWire::Label(label) => Err(format!("unsupported podcast length: {label:?}")),
        }
    }
}

impl From<PodcastLength> for LengthWire {
    fn from(length: PodcastLength) -> Self {
        match length {
            PodcastLength::Minutes5 => LengthWire::Minutes(5),
            PodcastLength::Minutes10 => LengthWire::Minutes(10),
            PodcastLength::Minutes30 => LengthWire::Minutes(30),
            PodcastLength::Minutes60 => LengthWire::Minutes(60),
            PodcastLength::Continuous => LengthWire::Label("continuous".to_string()),
        }
    }
}

/// Narration tone requested at configuration time. Also selects the
/// synthesis voice in fallback mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TonePreference {
    Soft,
    Energetic,
    Calm,
    Narrative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Ko,
    En,
}

/// User-chosen generation parameters. Created by the configuration UI,
/// persisted client-local, read once per player session and mutated in place
/// when keywords change during playback.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodcastConfig {
    pub topic: String,
    pub mode: InputMode,
    pub content_keywords: Vec<String>,
    pub length: PodcastLength,
    pub tone: TonePreference,
    /// Text of an uploaded plain file. Mutually exclusive with `pdf_text`.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub file_text: Option<String>,
    /// Text extracted from an uploaded PDF. Mutually exclusive with `file_text`.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub pdf_text: Option<String>,
    pub language: Language,
}

impl PodcastConfig {
    /// Appends a keyword, silently ignoring duplicates.
    pub fn push_keyword(&mut self, keyword: &str) {
        if !self.content_keywords.iter().any(|k| k == keyword) {
            self.content_keywords.push(keyword.to_string());
        }
    }

    /// Removes every exact match of `keyword`, preserving the order of the
    /// remaining entries.
    pub fn remove_keyword(&mut self, keyword: &str) {
        self.content_keywords.retain(|k| k != keyword);
    }

    /// Sets the plain-file source text and clears any PDF text.
    pub fn set_file_text(&mut self, text: String) {
        self.file_text = Some(text);
        self.pdf_text = None;
    }

    /// Sets the PDF-extracted source text and clears any plain-file text.
    pub fn set_pdf_text(&mut self, text: String) {
        self.pdf_text = Some(text);
        self.file_text = None;
    }

    /// Attached source material, PDF text taking precedence over file text.
    pub fn source_text(&self) -> Option<&str> {
        self.pdf_text.as_deref().or(self.file_text.as_deref())
    }
}

/// Ephemeral credential issued by the session endpoint. Valid for one hour;
/// there is no renewal path, a new player session must be started after
/// expiry.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealtimeSession {
    pub session_id: String,
    pub client_secret: String,
    /// Expiry as epoch milliseconds.
    pub expires_at: u64,
}

impl RealtimeSession {
    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms >= self.expires_at
    }
}

/// Local playback/UI state. `is_realtime_mode` must reflect which
/// orchestrator currently owns control-signal delivery; exactly one mode is
/// active at a time.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioState {
    pub is_playing: bool,
    pub current_time: f64,
    pub duration: f64,
    pub is_recording: bool,
    pub is_realtime_mode: bool,
}

impl Default for AudioState {
    fn default() -> Self {
        Self {
            is_playing: false,
            current_time: 0.0,
            duration: 0.0,
            is_recording: false,
            is_realtime_mode: false,
        }
    }
}

/// A piece of recognized speech handed to the voice-command matcher.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct VoiceCommand {
    pub text: String,
    pub confidence: f32,
    pub timestamp: u64,
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
    fn length_round_trips_through_wire_format() {
        let json = serde_json::to_string(&PodcastLength::Minutes10).unwrap();
        assert_eq!(json, "10");
        let json = serde_json::to_string(&PodcastLength::Continuous).unwrap();
        assert_eq!(json, "\"continuous\"");
        let parsed: PodcastLength = serde_json::from_str("60").unwrap();
        assert_eq!(parsed, PodcastLength::Minutes60);
        assert!(serde_json::from_str::<PodcastLength>("7").is_err());
    }

    #[test]
    fn config_serializes_with_camel_case_keys() {
        let value = serde_json::to_value(config()).unwrap();
        assert_eq!(value["contentKeywords"][0], "금리");
        assert_eq!(value["mode"], "keywords");
        assert_eq!(value["tone"], "soft");
        assert_eq!(value["length"], 10);
        assert!(value.get("fileText").is_none());
    }

    #[test]
    fn source_text_fields_are_mutually_exclusive() {
        let mut config = config();
        config.set_file_text("plain".to_string());
        config.set_pdf_text("extracted".to_string());
        assert_eq!(config.file_text, None);
        assert_eq!(config.source_text(), Some("extracted"));

        config.set_file_text("plain again".to_string());
        assert_eq!(config.pdf_text, None);
        assert_eq!(config.source_text(), Some("plain again"));
    }

    #[test]
    fn remove_keyword_drops_only_exact_matches_in_order() {
        let mut config = config();
        config.content_keywords = vec![
            "금리".to_string(),
            "주식".to_string(),
            "금리".to_string(),
            "환율".to_string(),
        ];
        config.remove_keyword("금리");
        assert_eq!(config.content_keywords, vec!["주식", "환율"]);
    }

    #[test]
    fn push_keyword_rejects_duplicates() {
        let mut config = config();
        config.push_keyword("금리");
        config.push_keyword("부동산");
        assert_eq!(config.content_keywords, vec!["금리", "주식", "부동산"]);
    }

    #[test]
    fn session_expiry_is_inclusive() {
        let session = RealtimeSession {
            session_id: "sess_1".to_string(),
            client_secret: "secret".to_string(),
            expires_at: 1_000,
        };
        assert!(!session.is_expired(999));
        assert!(session.is_expired(1_000));
    }
}
