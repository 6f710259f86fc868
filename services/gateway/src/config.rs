//! Gateway configuration.
//!
//! Loads settings from environment variables once at startup and hands the
//! rest of the service a single shareable struct. The provider key is the
//! one secret this process holds; it never appears in any response body.

use std::env;

use secrecy::SecretString;

/// Holds all configuration loaded from the environment.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub api_key: SecretString,
    pub bind_addr: String,
    pub openai_base_url: String,
    pub chat_model: String,
    pub tts_model: String,
    pub realtime_model: String,
    pub history_db: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
}

impl GatewayConfig {
    /// Loads configuration from environment variables.
    ///
    // *   `OPENAI_API_KEY`: Secret key for the OpenAI API. Required.
    // *   `GATEWAY_ADDR`: (Optional) Bind address. Defaults to "0.0.0.0:3000".
    // *   `OPENAI_BASE_URL`: (Optional) Provider base URL. Defaults to "https://api.openai.com".
    // *   `CHAT_MODEL`: (Optional) Text generation model. Defaults to "gpt-4o-mini".
    // *   `TTS_MODEL`: (Optional) Speech synthesis model. Defaults to "tts-1".
    // *   `REALTIME_MODEL`: (Optional) Realtime session model. Defaults to "gpt-4o-realtime-preview-2024-12-17".
    // *   `HISTORY_DB`: (Optional) SQLite path for saved episodes. Defaults to "podcast-history.sqlite".
    pub fn from_env() -> Result<Self, ConfigError> {
        // Ignored if no .env file is present.
        dotenvy::dotenv().ok();

        let api_key = env::var("OPENAI_API_KEY")
            .map(SecretString::from)
            .map_err(|_| ConfigError::MissingVar("OPENAI_API_KEY".to_string()))?;

        let bind_addr = env::var("GATEWAY_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let openai_base_url = env::var("OPENAI_BASE_URL")
            .unwrap_or_else(|_| "https://api.openai.com".to_string());
        let chat_model = env::var("CHAT_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());
        let tts_model = env::var("TTS_MODEL").unwrap_or_else(|_| "tts-1".to_string());
        let realtime_model = env::var("REALTIME_MODEL")
            .unwrap_or_else(|_| "gpt-4o-realtime-preview-2024-12-17".to_string());
        let history_db =
            env::var("HISTORY_DB").unwrap_or_else(|_| "podcast-history.sqlite".to_string());

        Ok(Self {
            api_key,
            bind_addr,
            openai_base_url,
            chat_model,
            tts_model,
            realtime_model,
            history_db,
        })
    }
}
