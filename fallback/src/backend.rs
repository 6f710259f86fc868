//! The generate-then-synthesize request pair behind the fallback
//! orchestrator, abstracted as a trait so tests can run without a network.

use anyhow::{Context, Result};
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

#[async_trait]
#[cfg_attr(test, automock)]
pub trait GenerationBackend: Send + Sync {
    /// Requests narration text for `prompt` within a bounded token budget.
    async fn generate_text(&self, prompt: &str, max_tokens: u32) -> Result<String>;

    /// Requests synthesized speech for `text` using the named voice.
    async fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>>;
}

/// HTTP backend talking to the gateway's generate and TTS endpoints.
pub struct GatewayBackend {
    http: reqwest::Client,
    base_url: String,
}

#[derive(serde::Deserialize)]
struct GenerateResponse {
    text: String,
}

impl GatewayBackend {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl GenerationBackend for GatewayBackend {
    async fn generate_text(&self, prompt: &str, max_tokens: u32) -> Result<String> {
        let response: GenerateResponse = self
            .http
            .post(format!("{}/api/generate", self.base_url))
            .json(&serde_json::json!({ "prompt": prompt, "maxTokens": max_tokens }))
            .send()
            .await
            .context("generate endpoint unreachable")?
            .error_for_status()
            .context("text generation failed")?
            .json()
            .await
            .context("malformed generation response")?;
        Ok(response.text)
    }

    async fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>> {
        let audio = self
            .http
            .post(format!("{}/api/tts", self.base_url))
            .json(&serde_json::json!({ "text": text, "voice": voice }))
            .send()
            .await
            .context("tts endpoint unreachable")?
            .error_for_status()
            .context("speech synthesis failed")?
            .bytes()
            .await
            .context("failed to read synthesized audio")?;
        Ok(audio.to_vec())
    }
}
