//! Realtime session orchestrator.
//!
//! Negotiates a peer-to-peer audio session with the hosted voice agent and
//! forwards control signals into it as conversation turns. Every public
//! method converts failure to a boolean at the boundary; nothing here
//! propagates an error to the caller, who is expected to fall back to the
//! regenerate-on-demand path when `connect` reports failure.

mod config;
mod consts;
mod mic;
mod sink;
mod utterance;

pub use config::{ConnectionConfig, ConnectionConfigBuilder};
pub use consts::DEFAULT_GATEWAY_URL;
pub use utterance::utterance_for;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use podcast_audio::{AudioOutput, MicCapture};
use podcast_types::{ClientEvent, ControlSignal, PodcastConfig, RealtimeSession};
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::api::APIBuilder;
use webrtc::data_channel::data_channel_message::DataChannelMessage;
use webrtc::data_channel::data_channel_state::RTCDataChannelState;
use webrtc::data_channel::RTCDataChannel;
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::rtp_transceiver::rtp_codec::RTPCodecType;
use webrtc::rtp_transceiver::rtp_sender::RTCRtpSender;
use webrtc::rtp_transceiver::rtp_transceiver_direction::RTCRtpTransceiverDirection;
use webrtc::rtp_transceiver::RTCRtpTransceiverInit;

/// Owns the peer connection, side channel, microphone and playback handles
/// for one realtime session. Created once per player session; all handles
/// are cleared by `disconnect`, which is safe to call repeatedly and from
/// any partially-connected state.
pub struct RealtimeConnection {
    config: ConnectionConfig,
    http: reqwest::Client,
    connected: Arc<AtomicBool>,
    peer: Option<Arc<RTCPeerConnection>>,
    channel: Option<Arc<RTCDataChannel>>,
    mic: Option<MicCapture>,
    mic_sender: Option<Arc<RTCRtpSender>>,
    output: Option<AudioOutput>,
    session: Option<RealtimeSession>,
}

impl RealtimeConnection {
    pub fn new(config: ConnectionConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
            connected: Arc::new(AtomicBool::new(false)),
            peer: None,
            channel: None,
            mic: None,
            mic_sender: None,
            output: None,
            session: None,
        }
    }

    /// Establishes the session. Returns `true` only once the provider's SDP
    /// answer has been applied; any failure tears the half-built session
    /// down and returns `false` so the caller can fall back.
    pub async fn connect(&mut self, podcast: &PodcastConfig) -> bool {
        match self.try_connect(podcast).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("realtime connect failed: {e:#}");
                self.disconnect().await;
                false
            }
        }
    }

    async fn try_connect(&mut self, podcast: &PodcastConfig) -> Result<()> {
        // The long-lived provider key stays on the gateway; the client only
        // ever sees the short-lived session secret.
        let session: RealtimeSession = self
            .http
            .post(format!("{}/api/session", self.config.gateway_url()))
            .json(&serde_json::json!({ "config": podcast }))
            .send()
            .await
            .context("session endpoint unreachable")?
            .error_for_status()
            .context("session endpoint rejected the request")?
            .json()
            .await
            .context("malformed session credential")?;

        let output = AudioOutput::open().await?;
        self.output = Some(output.clone());

        let peer = self.new_peer_connection().await?;
        self.peer = Some(Arc::clone(&peer));

        // Inbound narration plays the moment a track arrives.
        peer.on_track(Box::new(move |track, _receiver, _transceiver| {
            let output = output.clone();
            Box::pin(async move {
                if track.kind() == RTPCodecType::Audio {
                    sink::spawn_playback(track, output);
                }
            })
        }));

        let connected = Arc::clone(&self.connected);
        peer.on_peer_connection_state_change(Box::new(move |state: RTCPeerConnectionState| {
            tracing::debug!("realtime connection state: {state}");
            connected.store(state == RTCPeerConnectionState::Connected, Ordering::SeqCst);
            Box::pin(async {})
        }));

        let channel = peer
            .create_data_channel(consts::DATA_CHANNEL_LABEL, None)
            .await
            .context("failed to create side channel")?;
        self.channel = Some(Arc::clone(&channel));

        // Prime the model to start talking without waiting for user input.
        let kickoff_channel = Arc::clone(&channel);
        channel.on_open(Box::new(move || {
            let channel = Arc::clone(&kickoff_channel);
            Box::pin(async move {
                match serde_json::to_string(&ClientEvent::begin_response()) {
                    Ok(text) => {
                        if let Err(e) = channel.send_text(text).await {
                            tracing::warn!("failed to send kickoff event: {e}");
                        }
                    }
                    Err(e) => tracing::error!("failed to serialize kickoff event: {e}"),
                }
            })
        }));

        channel.on_message(Box::new(|message: DataChannelMessage| {
            Box::pin(async move {
                match serde_json::from_slice::<serde_json::Value>(&message.data) {
                    Ok(json) => {
                        let kind = json.get("type").and_then(|v| v.as_str()).unwrap_or("unknown");
                        tracing::debug!("received server event: {kind}");
                    }
                    Err(_) => tracing::debug!("non-JSON side channel message"),
                }
            })
        }));

        // Bidirectional audio is declared up front so inbound narration can
        // start before the user opts into voice input.
        peer.add_transceiver_from_kind(
            RTPCodecType::Audio,
            Some(RTCRtpTransceiverInit {
                direction: RTCRtpTransceiverDirection::Sendrecv,
                send_encodings: vec![],
            }),
        )
        .await
        .context("failed to add audio transceiver")?;

        let offer = peer.create_offer(None).await.context("offer failed")?;
        let mut gather_complete = peer.gathering_complete_promise().await;
        peer.set_local_description(offer)
            .await
            .context("failed to apply local description")?;
        let _ = gather_complete.recv().await;

        let local = peer
            .local_description()
            .await
            .context("no local description after ICE gathering")?;

        let answer_sdp = self
            .http
            .post(format!(
                "{}?model={}",
                self.config.realtime_url(),
                self.config.model()
            ))
            .bearer_auth(&session.client_secret)
            .header(reqwest::header::CONTENT_TYPE, "application/sdp")
            .header(consts::OPENAI_BETA_HEADER, consts::REALTIME_BETA_VALUE)
            .body(local.sdp)
            .send()
            .await
            .context("SDP negotiation endpoint unreachable")?
            .error_for_status()
            .context("SDP exchange failed")?
            .text()
            .await
            .context("malformed SDP answer")?;

        let answer = RTCSessionDescription::answer(answer_sdp).context("invalid SDP answer")?;
        peer.set_remote_description(answer)
            .await
            .context("failed to apply SDP answer")?;

        self.session = Some(session);
        Ok(())
    }

    async fn new_peer_connection(&self) -> Result<Arc<RTCPeerConnection>> {
        let mut media = MediaEngine::default();
        media
            .register_default_codecs()
            .context("failed to register codecs")?;
        let registry = register_default_interceptors(Registry::new(), &mut media)
            .context("failed to register interceptors")?;
        let api = APIBuilder::new()
            .with_media_engine(media)
            .with_interceptor_registry(registry)
            .build();

        let rtc_config = RTCConfiguration {
            ice_servers: vec![RTCIceServer {
                urls: vec![consts::STUN_SERVER.to_owned()],
                ..Default::default()
            }],
            ..Default::default()
        };

        Ok(Arc::new(
            api.new_peer_connection(rtc_config)
                .await
                .context("failed to create peer connection")?,
        ))
    }

    /// Lazily attaches the microphone to the live session. Idempotent while
    /// already listening; a denied or missing input device leaves the
    /// session connected with voice input inactive.
    pub async fn start_listening(&mut self) -> bool {
        if self.mic.is_some() {
            return true;
        }
        let Some(peer) = self.peer.clone() else {
            return false;
        };
        match mic::attach(&peer).await {
            Ok((capture, sender)) => {
                self.mic = Some(capture);
                self.mic_sender = Some(sender);
                true
            }
            Err(e) => {
                tracing::warn!("microphone unavailable: {e:#}");
                false
            }
        }
    }

    /// Releases the local track without tearing down the session.
    pub fn stop_listening(&mut self) {
        if let Some(mic) = self.mic.take() {
            mic.stop();
        }
        if let Some(sender) = self.mic_sender.take() {
            tokio::spawn(async move {
                let _ = sender.stop().await;
            });
        }
    }

    /// Forwards a control signal as a conversation turn. No-op (`false`)
    /// unless the side channel is open.
    pub async fn send_control_signal(&self, signal: &ControlSignal) -> bool {
        let Some(channel) = self.channel.as_ref() else {
            return false;
        };
        if channel.ready_state() != RTCDataChannelState::Open {
            return false;
        }

        let event = ClientEvent::user_message(utterance::utterance_for(signal));
        let text = match serde_json::to_string(&event) {
            Ok(text) => text,
            Err(e) => {
                tracing::error!("failed to serialize control event: {e}");
                return false;
            }
        };
        match channel.send_text(text).await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!("failed to send control event: {e}");
                false
            }
        }
    }

    /// Tears everything down: listening, side channel, outgoing tracks, the
    /// peer connection and the session handle. Safe from any state and
    /// callable repeatedly.
    pub async fn disconnect(&mut self) {
        self.stop_listening();
        if let Some(channel) = self.channel.take() {
            let _ = channel.close().await;
        }
        if let Some(peer) = self.peer.take() {
            for sender in peer.get_senders().await {
                let _ = sender.stop().await;
            }
            let _ = peer.close().await;
        }
        self.session = None;
        self.output = None;
        self.connected.store(false, Ordering::SeqCst);
    }

    pub fn connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    pub fn listening(&self) -> bool {
        self.mic.is_some()
    }

    /// The credential for the live session, if any. Credentials expire one
    /// hour after issue and are not renewed; a new player session must be
    /// started once this reports expired.
    pub fn session(&self) -> Option<&RealtimeSession> {
        self.session.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disconnect_is_safe_from_any_state_and_repeatable() {
        let mut connection = RealtimeConnection::new(ConnectionConfig::default());
        connection.disconnect().await;
        connection.disconnect().await;
        assert!(!connection.connected());
        assert!(connection.session().is_none());
    }

    #[tokio::test]
    async fn control_signals_are_dropped_without_an_open_channel() {
        let connection = RealtimeConnection::new(ConnectionConfig::default());
        assert!(
            !connection
                .send_control_signal(&ControlSignal::Summarize)
                .await
        );
    }

    #[tokio::test]
    async fn listening_is_inactive_before_connect() {
        let mut connection = RealtimeConnection::new(ConnectionConfig::default());
        // No peer connection yet, so this degrades to false without touching
        // the capture device.
        assert!(!connection.start_listening().await);
        assert!(!connection.listening());
    }
}
