//! Provider HTTP client.
//!
//! All three upstream calls live here: minting ephemeral realtime sessions,
//! chat-completion text generation, and speech synthesis. The long-lived API
//! key is attached to outbound requests only.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{anyhow, Context, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::config::GatewayConfig;
use podcast_types::RealtimeSession;

/// System message for fallback text generation.
const DJ_SYSTEM_MESSAGE: &str = "당신은 한국어 팟캐스트 DJ입니다. \
    자연스럽고 친근한 말투로, 대화하듯이 이야기하세요. \
    목록이나 머리글 없이 이어지는 문장으로만 답하세요.";

/// Ephemeral realtime credentials are valid for one hour.
const SESSION_TTL: Duration = Duration::from_secs(3600);

pub struct OpenAiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: SecretString,
    chat_model: String,
    tts_model: String,
    realtime_model: String,
}

#[derive(Deserialize)]
struct SessionResponse {
    id: String,
    client_secret: ClientSecret,
}

#[derive(Deserialize)]
struct ClientSecret {
    value: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: String,
}

impl OpenAiClient {
    pub fn new(config: &GatewayConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.openai_base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            chat_model: config.chat_model.clone(),
            tts_model: config.tts_model.clone(),
            realtime_model: config.realtime_model.clone(),
        }
    }

    /// Mints an ephemeral realtime session with the podcast instructions
    /// baked in. Audio runs pcm16 both ways with server-side voice activity
    /// detection; the returned secret is what the browser-side peer uses.
    pub async fn create_realtime_session(
        &self,
        instructions: &str,
        voice: &str,
    ) -> Result<RealtimeSession> {
        let body = serde_json::json!({
            "model": self.realtime_model,
            "modalities": ["text", "audio"],
            "instructions": instructions,
            "voice": voice,
            "input_audio_format": "pcm16",
            "output_audio_format": "pcm16",
            "turn_detection": {
                "type": "server_vad",
                "threshold": 0.5,
                "prefix_padding_ms": 300,
                "silence_duration_ms": 500,
            },
            "temperature": 0.8,
            "max_response_output_tokens": 4096,
        });

        let response: SessionResponse = self
            .http
            .post(format!("{}/v1/realtime/sessions", self.base_url))
            .bearer_auth(self.api_key.expose_secret())
            .header("OpenAI-Beta", "realtime=v1")
            .json(&body)
            .send()
            .await
            .context("realtime session endpoint unreachable")?
            .error_for_status()
            .context("realtime session creation failed")?
            .json()
            .await
            .context("malformed realtime session response")?;

        let expires_at = (SystemTime::now() + SESSION_TTL)
            .duration_since(UNIX_EPOCH)
            .context("system clock before epoch")?
            .as_millis() as u64;

        Ok(RealtimeSession {
            session_id: response.id,
            client_secret: response.client_secret.value,
            expires_at,
        })
    }

    /// Generates narration text for `prompt` within the given token budget.
    pub async fn generate_text(&self, prompt: &str, max_tokens: u32) -> Result<String> {
        let body = serde_json::json!({
            "model": self.chat_model,
            "messages": [
                { "role": "system", "content": DJ_SYSTEM_MESSAGE },
                { "role": "user", "content": prompt },
            ],
            "temperature": 0.8,
            "max_tokens": max_tokens,
        });

        let response: ChatResponse = self
            .http
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .context("chat completion endpoint unreachable")?
            .error_for_status()
            .context("text generation failed")?
            .json()
            .await
            .context("malformed chat completion response")?;

        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| anyhow!("chat completion returned no choices"))
    }

    /// Synthesizes `text` as mp3 audio using the named voice.
    pub async fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>> {
        let body = serde_json::json!({
            "model": self.tts_model,
            "input": text,
            "voice": voice,
            "response_format": "mp3",
        });

        let audio = self
            .http
            .post(format!("{}/v1/audio/speech", self.base_url))
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .context("speech endpoint unreachable")?
            .error_for_status()
            .context("speech synthesis failed")?
            .bytes()
            .await
            .context("failed to read synthesized audio")?;
        Ok(audio.to_vec())
    }
}
