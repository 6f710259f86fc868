//! Interactive player session.
//!
//! Loads the saved podcast configuration, attempts a realtime session, and
//! silently degrades to regenerate-on-demand playback when the realtime path
//! is unavailable. Line commands on stdin drive both modes through the same
//! control-signal vocabulary.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use podcast_core::commands::match_voice_command;
use podcast_core::store::ConfigStore;
use podcast_fallback::FallbackTts;
use podcast_realtime::{ConnectionConfig, RealtimeConnection, DEFAULT_GATEWAY_URL};
use podcast_types::{
    AudioState, ControlSignal, DepthChange, Direction, PodcastConfig, SpeedChange, ToneChange,
};

#[derive(Parser)]
#[command(name = "podcast-player")]
struct Cli {
    /// Directory holding the saved podcast configuration
    #[arg(long, default_value = ".")]
    config_dir: PathBuf,

    /// Gateway base URL
    #[arg(long, default_value = DEFAULT_GATEWAY_URL)]
    gateway_url: String,
}

enum PlayerCommand {
    Play,
    Pause,
    Signal(ControlSignal),
    MicOn,
    MicOff,
    Say(String),
    Status,
    Quit,
}

fn parse_command(line: &str) -> Option<PlayerCommand> {
    let line = line.trim();
    let (word, rest) = match line.split_once(' ') {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let signal = |signal: ControlSignal| Some(PlayerCommand::Signal(signal));
    match word {
        "play" => Some(PlayerCommand::Play),
        "pause" => Some(PlayerCommand::Pause),
        "deeper" => signal(ControlSignal::Depth(DepthChange::Deeper)),
        "simpler" => signal(ControlSignal::Depth(DepthChange::Simpler)),
        "faster" => signal(ControlSignal::Speed(SpeedChange::Faster)),
        "slower" => signal(ControlSignal::Speed(SpeedChange::Slower)),
        "softer" => signal(ControlSignal::Tone(ToneChange::Softer)),
        "energetic" => signal(ControlSignal::Tone(ToneChange::Energetic)),
        "next" => signal(ControlSignal::Navigate(Direction::Next)),
        "prev" => signal(ControlSignal::Navigate(Direction::Prev)),
        "summary" => signal(ControlSignal::Summarize),
        "add" if !rest.is_empty() => signal(ControlSignal::TopicAppend(rest.to_string())),
        "rm" if !rest.is_empty() => signal(ControlSignal::TopicRemove(rest.to_string())),
        "mic" => match rest {
            "on" => Some(PlayerCommand::MicOn),
            "off" => Some(PlayerCommand::MicOff),
            _ => None,
        },
        "say" if !rest.is_empty() => Some(PlayerCommand::Say(rest.to_string())),
        "status" => Some(PlayerCommand::Status),
        "quit" | "exit" => Some(PlayerCommand::Quit),
        _ => None,
    }
}

struct Player {
    realtime: RealtimeConnection,
    fallback: FallbackTts,
    state: AudioState,
    store: ConfigStore,
    config: PodcastConfig,
}

impl Player {
    /// Connects the realtime session if possible, otherwise generates the
    /// first fallback episode. Exactly one mode owns signal delivery.
    async fn start(&mut self) {
        if self.realtime.connect(&self.config).await {
            self.state.is_realtime_mode = true;
            self.state.is_playing = true;
            info!("realtime session established");
            return;
        }
        self.state.is_realtime_mode = false;
        info!("realtime unavailable, using generated playback");
        if !self.fallback.generate_podcast(&self.config).await {
            warn!("initial episode generation failed; retry with 'play'");
        }
    }

    async fn dispatch(&mut self, command: PlayerCommand) -> bool {
        match command {
            PlayerCommand::Play => {
                if self.state.is_realtime_mode {
                    println!("realtime audio is live");
                } else if self.fallback.has_clip() {
                    self.state.is_playing = self.fallback.play();
                } else if self.fallback.generate_podcast(&self.config).await {
                    self.state.is_playing = self.fallback.play();
                } else {
                    println!("generation failed, try again");
                }
            }
            PlayerCommand::Pause => {
                if self.state.is_realtime_mode {
                    println!("realtime audio cannot be paused here");
                } else {
                    self.fallback.pause();
                    self.state.is_playing = false;
                }
            }
            PlayerCommand::Signal(signal) => self.send_signal(signal).await,
            PlayerCommand::MicOn => {
                if self.state.is_realtime_mode {
                    self.state.is_recording = self.realtime.start_listening().await;
                    if !self.state.is_recording {
                        println!("microphone unavailable");
                    }
                } else {
                    println!("microphone input needs a realtime session");
                }
            }
            PlayerCommand::MicOff => {
                self.realtime.stop_listening();
                self.state.is_recording = false;
            }
            PlayerCommand::Say(text) => match match_voice_command(&text) {
                Some(signal) => self.send_signal(signal).await,
                None => println!("no command recognized in: {text}"),
            },
            PlayerCommand::Status => {
                if self.state.is_realtime_mode {
                    println!(
                        "mode=realtime listening={} connected={}",
                        self.realtime.listening(),
                        self.realtime.connected()
                    );
                } else {
                    self.state.current_time = self.fallback.current_time();
                    self.state.duration = self.fallback.duration();
                    println!(
                        "mode=fallback playing={} position={:.1}s/{:.1}s",
                        self.state.is_playing, self.state.current_time, self.state.duration
                    );
                }
            }
            PlayerCommand::Quit => return false,
        }
        true
    }

    async fn send_signal(&mut self, signal: ControlSignal) {
        // Topic changes also update the persisted configuration so the next
        // session starts from the adjusted keyword list.
        match &signal {
            ControlSignal::TopicAppend(keyword) => {
                self.config.push_keyword(keyword);
                self.persist();
            }
            ControlSignal::TopicRemove(keyword) => {
                if let Err(e) = self.store.remove_keyword(&mut self.config, keyword) {
                    warn!("failed to persist configuration: {e}");
                }
            }
            _ => {}
        }

        let accepted = if self.state.is_realtime_mode {
            self.realtime.send_control_signal(&signal).await
        } else {
            self.fallback.handle_control_signal(&signal).await
        };
        if accepted {
            if !self.state.is_realtime_mode {
                self.state.is_playing = self.fallback.play();
            }
        } else {
            println!("signal dropped");
        }
    }

    fn persist(&self) {
        if let Err(e) = self.store.save(&self.config) {
            warn!("failed to persist configuration: {e}");
        }
    }

    async fn shutdown(&mut self) {
        self.realtime.disconnect().await;
        self.fallback.pause();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Cli::parse();

    let store = ConfigStore::new(&args.config_dir);
    let config = match store.load().context("failed to read saved configuration")? {
        Some(config) => config,
        None => bail!(
            "no saved podcast configuration at {}",
            store.path().display()
        ),
    };

    let connection_config = ConnectionConfig::builder()
        .with_gateway_url(&args.gateway_url)
        .build();

    let mut player = Player {
        realtime: RealtimeConnection::new(connection_config),
        fallback: FallbackTts::with_gateway(&args.gateway_url),
        state: AudioState::default(),
        store,
        config,
    };

    player.start().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("commands: play pause deeper simpler faster slower softer energetic next prev summary add <kw> rm <kw> mic on|off say <text> status quit");
    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Some(command) => {
                if !player.dispatch(command).await {
                    break;
                }
            }
            None if line.trim().is_empty() => {}
            None => println!("unknown command: {line}"),
        }
    }

    player.shutdown().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn words_map_to_the_expected_signals() {
        assert!(matches!(
            parse_command("deeper"),
            Some(PlayerCommand::Signal(ControlSignal::Depth(
                DepthChange::Deeper
            )))
        ));
        assert!(matches!(
            parse_command("summary"),
            Some(PlayerCommand::Signal(ControlSignal::Summarize))
        ));
        match parse_command("add 인공지능 동향") {
            Some(PlayerCommand::Signal(ControlSignal::TopicAppend(keyword))) => {
                assert_eq!(keyword, "인공지능 동향");
            }
            _ => panic!("expected topic append"),
        }
    }

    #[test]
    fn bare_add_and_unknown_words_are_rejected() {
        assert!(parse_command("add").is_none());
        assert!(parse_command("rm ").is_none());
        assert!(parse_command("volume up").is_none());
        assert!(parse_command("mic sideways").is_none());
    }

    #[test]
    fn spoken_text_is_wrapped_for_the_phrase_matcher() {
        match parse_command("say 속도 빨리 해줘") {
            Some(PlayerCommand::Say(text)) => {
                assert!(matches!(
                    match_voice_command(&text),
                    Some(ControlSignal::Speed(SpeedChange::Faster))
                ));
            }
            _ => panic!("expected say command"),
        }
    }
}
