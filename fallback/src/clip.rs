//! A single playable audio clip. The fallback orchestrator replaces the
//! whole clip on every regeneration; it never splices or appends.

use std::io::Cursor;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use podcast_audio::AudioOutput;
use rodio::{Decoder, Sink, Source};

pub struct AudioClip {
    sink: Sink,
    duration: Option<Duration>,
    started: bool,
    playing_since: Option<Instant>,
    played: Duration,
}

impl AudioClip {
    /// Decodes `audio` and loads it, paused, onto a fresh sink.
    pub fn load(output: &AudioOutput, audio: Vec<u8>) -> Result<Self> {
        let decoder = Decoder::new(Cursor::new(audio)).context("failed to decode audio clip")?;
        let duration = decoder.total_duration();
        let sink = output.new_sink()?;
        sink.pause();
        sink.append(decoder);
        Ok(Self {
            sink,
            duration,
            started: false,
            playing_since: None,
            played: Duration::ZERO,
        })
    }

    pub fn play(&mut self) {
        self.sink.play();
        self.started = true;
        if self.playing_since.is_none() {
            self.playing_since = Some(Instant::now());
        }
    }

    pub fn pause(&mut self) {
        if let Some(since) = self.playing_since.take() {
            self.played += since.elapsed();
        }
        self.sink.pause();
    }

    /// Playback position in seconds, clamped to the clip duration.
    pub fn current_time(&self) -> f64 {
        let mut elapsed = self.played;
        if let Some(since) = self.playing_since {
            elapsed += since.elapsed();
        }
        let seconds = elapsed.as_secs_f64();
        match self.duration {
            Some(total) => seconds.min(total.as_secs_f64()),
            None => seconds,
        }
    }

    /// Clip duration in seconds, `0.0` when the container does not report one.
    pub fn duration(&self) -> f64 {
        self.duration.map(|d| d.as_secs_f64()).unwrap_or(0.0)
    }

    pub fn paused(&self) -> bool {
        self.sink.is_paused()
    }

    pub fn ended(&self) -> bool {
        self.started && self.sink.empty()
    }
}
