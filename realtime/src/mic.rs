//! Microphone capture for the realtime session: PCM frames from the capture
//! thread are opus-encoded and written to a local track on the existing peer
//! connection.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use podcast_audio::{MicCapture, CAPTURE_SAMPLE_RATE};
use webrtc::api::media_engine::MIME_TYPE_OPUS;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::rtp_transceiver::rtp_codec::RTCRtpCodecCapability;
use webrtc::rtp_transceiver::rtp_sender::RTCRtpSender;
use webrtc::media::Sample;
use webrtc::track::track_local::track_local_static_sample::TrackLocalStaticSample;
use webrtc::track::track_local::TrackLocal;

const FRAME_DURATION: Duration = Duration::from_millis(20);
const MAX_OPUS_PACKET: usize = 1500;

/// Attaches the default microphone to `peer` as an opus track. Returns the
/// capture handle and the RTP sender so the caller can release both without
/// tearing down the session.
pub(crate) async fn attach(
    peer: &Arc<RTCPeerConnection>,
) -> Result<(MicCapture, Arc<RTCRtpSender>)> {
    let (capture, mut frames) = MicCapture::start().await?;

    let track = Arc::new(TrackLocalStaticSample::new(
        RTCRtpCodecCapability {
            mime_type: MIME_TYPE_OPUS.to_owned(),
            clock_rate: CAPTURE_SAMPLE_RATE,
            channels: 1,
            ..Default::default()
        },
        "audio".to_owned(),
        "podcast-mic".to_owned(),
    ));

    let sender = peer
        .add_track(Arc::clone(&track) as Arc<dyn TrackLocal + Send + Sync>)
        .await
        .context("failed to add microphone track")?;

    let mut encoder = opus::Encoder::new(
        CAPTURE_SAMPLE_RATE,
        opus::Channels::Mono,
        opus::Application::Voip,
    )
    .context("failed to create opus encoder")?;

    tokio::spawn(async move {
        while let Some(frame) = frames.recv().await {
            let payload = match encoder.encode_vec(&frame, MAX_OPUS_PACKET) {
                Ok(payload) => payload,
                Err(e) => {
                    tracing::warn!("opus encode failed: {e}");
                    continue;
                }
            };
            let sample = Sample {
                data: payload.into(),
                duration: FRAME_DURATION,
                ..Default::default()
            };
            if let Err(e) = track.write_sample(&sample).await {
                tracing::debug!("microphone track closed: {e}");
                break;
            }
        }
    });

    Ok((capture, sender))
}
