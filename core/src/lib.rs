pub mod commands;
pub mod prompts;
pub mod store;

pub use commands::{match_spoken, match_voice_command};
pub use prompts::{build_instructions, build_plan, tone_to_voice, DEFAULT_VOICE, SYSTEM_BASE_PROMPT};
pub use store::{ConfigStore, StoreError};
