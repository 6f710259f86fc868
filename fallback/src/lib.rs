//! Regenerate-on-demand fallback orchestrator.
//!
//! Used when a realtime session cannot be established: each control signal
//! rebuilds the generation prompt, requests fresh narration text, synthesizes
//! speech for it, and replaces the loaded clip outright. Public methods
//! report success as a boolean; failures are logged and recovered here.

mod backend;
mod clip;
mod directive;

pub use backend::{GatewayBackend, GenerationBackend};
pub use clip::AudioClip;
pub use directive::directive_for;

use std::sync::Arc;

use anyhow::Result;
use podcast_audio::AudioOutput;
use podcast_core::prompts::{build_plan, tone_to_voice, SYSTEM_BASE_PROMPT};
use podcast_types::{ControlSignal, PodcastConfig};

/// Token budget for the initial generation.
pub const INITIAL_TOKEN_BUDGET: u32 = 1000;

/// Smaller budget for signal-driven regeneration.
pub const ADAPT_TOKEN_BUDGET: u32 = 800;

pub struct FallbackTts {
    backend: Arc<dyn GenerationBackend>,
    output: Option<AudioOutput>,
    current_config: Option<PodcastConfig>,
    clip: Option<AudioClip>,
    generating: bool,
}

impl FallbackTts {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self {
            backend,
            output: None,
            current_config: None,
            clip: None,
            generating: false,
        }
    }

    /// A fallback orchestrator talking to the gateway at `base_url`.
    pub fn with_gateway(base_url: &str) -> Self {
        Self::new(Arc::new(GatewayBackend::new(base_url)))
    }

    /// Generates and loads a full episode for `config`. The busy flag is set
    /// before the first await and cleared on every exit path; because the
    /// flag is checked and set through `&mut self` before any suspension,
    /// overlapping generations are structurally impossible rather than
    /// merely discouraged.
    pub async fn generate_podcast(&mut self, config: &PodcastConfig) -> bool {
        if self.generating {
            return false;
        }
        self.generating = true;
        self.current_config = Some(config.clone());

        let prompt = format!("{SYSTEM_BASE_PROMPT}\n\n{}", build_plan(config));
        let voice = tone_to_voice(config.tone);

        let result = self.run_generation(&prompt, INITIAL_TOKEN_BUDGET, voice).await;
        self.generating = false;

        match result {
            Ok(clip) => {
                self.clip = Some(clip);
                true
            }
            Err(e) => {
                tracing::warn!("podcast generation failed: {e:#}");
                self.clip = None;
                false
            }
        }
    }

    /// Applies a control signal by regenerating the episode with an appended
    /// directive line. Returns `false` when no configuration is loaded or a
    /// generation is still in flight; dropped signals are never queued.
    pub async fn handle_control_signal(&mut self, signal: &ControlSignal) -> bool {
        if self.generating {
            return false;
        }
        let (prompt, voice) = match self.current_config.as_mut() {
            None => return false,
            Some(config) => {
                // Topic signals mutate the live keyword list before the plan
                // is rebuilt so the regenerated episode reflects them.
                match signal {
                    ControlSignal::TopicAppend(keyword) => config.push_keyword(keyword),
                    ControlSignal::TopicRemove(keyword) => config.remove_keyword(keyword),
                    _ => {}
                }
                let mut plan = build_plan(config);
                plan.push('\n');
                plan.push_str(&directive::directive_for(signal));
                (
                    format!("{SYSTEM_BASE_PROMPT}\n\n{plan}"),
                    tone_to_voice(config.tone),
                )
            }
        };

        self.generating = true;
        let result = self.run_generation(&prompt, ADAPT_TOKEN_BUDGET, voice).await;
        self.generating = false;

        match result {
            Ok(clip) => {
                self.clip = Some(clip);
                true
            }
            Err(e) => {
                tracing::warn!("control signal regeneration failed: {e:#}");
                false
            }
        }
    }

    async fn run_generation(
        &mut self,
        prompt: &str,
        max_tokens: u32,
        voice: &str,
    ) -> Result<AudioClip> {
        let text = self.backend.generate_text(prompt, max_tokens).await?;
        let audio = self.backend.synthesize(&text, voice).await?;
        let output = self.output().await?;
        AudioClip::load(&output, audio)
    }

    async fn output(&mut self) -> Result<AudioOutput> {
        if let Some(output) = &self.output {
            return Ok(output.clone());
        }
        let output = AudioOutput::open().await?;
        self.output = Some(output.clone());
        Ok(output)
    }

    // Playback passthrough: thin delegation to the loaded clip.

    pub fn play(&mut self) -> bool {
        match self.clip.as_mut() {
            Some(clip) => {
                clip.play();
                true
            }
            None => false,
        }
    }

    pub fn pause(&mut self) {
        if let Some(clip) = self.clip.as_mut() {
            clip.pause();
        }
    }

    pub fn current_time(&self) -> f64 {
        self.clip.as_ref().map(AudioClip::current_time).unwrap_or(0.0)
    }

    pub fn duration(&self) -> f64 {
        self.clip.as_ref().map(AudioClip::duration).unwrap_or(0.0)
    }

    pub fn paused(&self) -> bool {
        self.clip.as_ref().map(AudioClip::paused).unwrap_or(true)
    }

    pub fn ended(&self) -> bool {
        self.clip.as_ref().map(AudioClip::ended).unwrap_or(false)
    }

    pub fn has_clip(&self) -> bool {
        self.clip.is_some()
    }

    pub fn generating(&self) -> bool {
        self.generating
    }

    pub fn current_config(&self) -> Option<&PodcastConfig> {
        self.current_config.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use crate::backend::MockGenerationBackend;
    use podcast_types::{InputMode, Language, PodcastLength, TonePreference};

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

    #[tokio::test]
    async fn synthesis_failure_leaves_no_clip_and_clears_the_busy_flag() {
        let mut backend = MockGenerationBackend::new();
        backend
            .expect_generate_text()
            .withf(|_, max_tokens| *max_tokens == INITIAL_TOKEN_BUDGET)
            .returning(|_, _| Box::pin(async { Ok("생성된 본문".to_string()) }));
        backend
            .expect_synthesize()
            .withf(|_, voice| voice == "shimmer")
            .returning(|_, _| Box::pin(async { Err(anyhow!("synthesis unavailable")) }));

        let mut tts = FallbackTts::new(Arc::new(backend));
        assert!(!tts.generate_podcast(&config()).await);
        assert!(!tts.has_clip());
        assert!(!tts.generating());
        // The config is still loaded, matching the recorded behavior.
        assert!(tts.current_config().is_some());
    }

    #[tokio::test]
    async fn generation_failure_never_reaches_synthesis() {
        let mut backend = MockGenerationBackend::new();
        backend
            .expect_generate_text()
            .returning(|_, _| Box::pin(async { Err(anyhow!("model unavailable")) }));
        // No expect_synthesize: a call would panic the mock.

        let mut tts = FallbackTts::new(Arc::new(backend));
        assert!(!tts.generate_podcast(&config()).await);
        assert!(!tts.generating());
    }

    #[tokio::test]
    async fn signals_are_rejected_without_a_loaded_config() {
        let backend = MockGenerationBackend::new();
        let mut tts = FallbackTts::new(Arc::new(backend));
        assert!(!tts.handle_control_signal(&ControlSignal::Summarize).await);
    }

    #[tokio::test]
    async fn topic_remove_mutates_once_and_feeds_the_directive_into_the_prompt() {
        let mut backend = MockGenerationBackend::new();
        backend
            .expect_generate_text()
            .withf(|prompt, max_tokens| {
                *max_tokens == INITIAL_TOKEN_BUDGET || prompt.contains("주제 제거: 금리")
            })
            .returning(|_, _| Box::pin(async { Err(anyhow!("model unavailable")) }));

        let mut tts = FallbackTts::new(Arc::new(backend));
        assert!(!tts.generate_podcast(&config()).await);

        assert!(
            !tts.handle_control_signal(&ControlSignal::TopicRemove("금리".to_string()))
                .await
        );
        let keywords = &tts.current_config().unwrap().content_keywords;
        assert_eq!(keywords, &vec!["주식".to_string()]);
    }

    #[tokio::test]
    async fn regeneration_uses_the_smaller_token_budget() {
        let mut backend = MockGenerationBackend::new();
        backend
            .expect_generate_text()
            .withf(|_, max_tokens| *max_tokens == INITIAL_TOKEN_BUDGET)
            .times(1)
            .returning(|_, _| Box::pin(async { Err(anyhow!("model unavailable")) }));
        backend
            .expect_generate_text()
            .withf(|_, max_tokens| *max_tokens == ADAPT_TOKEN_BUDGET)
            .times(1)
            .returning(|_, _| Box::pin(async { Err(anyhow!("model unavailable")) }));

        let mut tts = FallbackTts::new(Arc::new(backend));
        assert!(!tts.generate_podcast(&config()).await);
        assert!(
            !tts.handle_control_signal(&ControlSignal::Navigate(
                podcast_types::Direction::Next
            ))
            .await
        );
    }

    #[tokio::test]
    async fn playback_passthrough_is_inert_without_a_clip() {
        let backend = MockGenerationBackend::new();
        let mut tts = FallbackTts::new(Arc::new(backend));
        assert!(!tts.play());
        tts.pause();
        assert_eq!(tts.current_time(), 0.0);
        assert_eq!(tts.duration(), 0.0);
        assert!(tts.paused());
        assert!(!tts.ended());
    }
}
