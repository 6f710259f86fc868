//! Inbound narration playback: opus payloads from the remote track are
//! decoded and appended to a local sink as they arrive.

use std::sync::Arc;

use anyhow::{Context, Result};
use podcast_audio::{AudioOutput, CAPTURE_SAMPLE_RATE};
use rodio::buffer::SamplesBuffer;
use webrtc::track::track_remote::TrackRemote;

// Remote opus frames decode at up to 120 ms per packet.
const MAX_FRAME_SAMPLES: usize = 5760;
const CHANNELS: usize = 2;

/// Plays a remote audio track until it ends or the connection closes.
pub(crate) fn spawn_playback(track: Arc<TrackRemote>, output: AudioOutput) {
    tokio::spawn(async move {
        if let Err(e) = play_track(track, output).await {
            tracing::debug!("remote track playback ended: {e:#}");
        }
    });
}

async fn play_track(track: Arc<TrackRemote>, output: AudioOutput) -> Result<()> {
    let sink = output.new_sink()?;
    let mut decoder = opus::Decoder::new(CAPTURE_SAMPLE_RATE, opus::Channels::Stereo)
        .context("failed to create opus decoder")?;
    let mut pcm = vec![0i16; MAX_FRAME_SAMPLES * CHANNELS];

    loop {
        let (packet, _) = track.read_rtp().await?;
        if packet.payload.is_empty() {
            continue;
        }
        let samples = match decoder.decode(&packet.payload, &mut pcm, false) {
            Ok(samples) => samples,
            Err(e) => {
                tracing::warn!("opus decode failed: {e}");
                continue;
            }
        };
        sink.append(SamplesBuffer::new(
            CHANNELS as u16,
            CAPTURE_SAMPLE_RATE,
            pcm[..samples * CHANNELS].to_vec(),
        ));
    }
}
