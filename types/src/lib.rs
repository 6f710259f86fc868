pub mod config;
pub mod events;
pub mod signal;

pub use config::{
    AudioState, InputMode, Language, PodcastConfig, PodcastLength, RealtimeSession,
    TonePreference, VoiceCommand,
};
pub use events::{ClientEvent, ContentPart, Item, MessageItem, MessageRole};
pub use signal::{ControlSignal, DepthChange, Direction, SpeedChange, ToneChange};
