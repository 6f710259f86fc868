pub const DEFAULT_GATEWAY_URL: &str = "http://127.0.0.1:3000";
pub const DEFAULT_REALTIME_URL: &str = "https://api.openai.com/v1/realtime";
pub const DEFAULT_MODEL: &str = "gpt-4o-realtime-preview-2024-12-17";

pub const DATA_CHANNEL_LABEL: &str = "oai-events";
pub const STUN_SERVER: &str = "stun:stun.l.google.com:19302";

pub const OPENAI_BETA_HEADER: &str = "OpenAI-Beta";
pub const REALTIME_BETA_VALUE: &str = "realtime=v1";
