use std::sync::mpsc as std_mpsc;
use std::thread;

use anyhow::{anyhow, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, SampleRate};
use tokio::sync::mpsc;

/// Capture rate expected by the opus encoder on the realtime path.
pub const CAPTURE_SAMPLE_RATE: u32 = 48_000;

/// Samples per emitted frame: 20 ms of mono audio at 48 kHz.
pub const FRAME_SAMPLES: usize = 960;

/// Microphone capture on a dedicated thread.
///
/// cpal streams are not `Send`, so the stream is built and parked on its own
/// thread; frames arrive on the returned channel as 16-bit mono PCM.
pub struct MicCapture {
    shutdown: std_mpsc::Sender<()>,
    thread: Option<thread::JoinHandle<()>>,
}

impl MicCapture {
    /// Opens the default input device at 48 kHz. Fails when no device exists,
    /// the device cannot run at the capture rate, or access is denied.
    pub async fn start() -> Result<(Self, mpsc::UnboundedReceiver<Vec<i16>>)> {
        let (frame_tx, frame_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = std_mpsc::channel::<()>();
        let (ready_tx, ready_rx) = tokio::sync::oneshot::channel();

        let handle = thread::spawn(move || capture_thread(frame_tx, shutdown_rx, ready_tx));

        match ready_rx.await {
            Ok(Ok(())) => Ok((
                Self {
                    shutdown: shutdown_tx,
                    thread: Some(handle),
                },
                frame_rx,
            )),
            Ok(Err(e)) => {
                let _ = handle.join();
                Err(e)
            }
            Err(_) => {
                let _ = handle.join();
                Err(anyhow!("capture thread exited before reporting readiness"))
            }
        }
    }

    /// Stops the stream and releases the device.
    pub fn stop(mut self) {
        let _ = self.shutdown.send(());
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for MicCapture {
    fn drop(&mut self) {
        let _ = self.shutdown.send(());
    }
}

fn capture_thread(
    frames: mpsc::UnboundedSender<Vec<i16>>,
    shutdown: std_mpsc::Receiver<()>,
    ready: tokio::sync::oneshot::Sender<Result<()>>,
) {
    let stream = match build_stream(frames) {
        Ok(stream) => stream,
        Err(e) => {
            let _ = ready.send(Err(e));
            return;
        }
    };
    if let Err(e) = stream.play() {
        let _ = ready.send(Err(anyhow!("failed to start input stream: {e}")));
        return;
    }
    let _ = ready.send(Ok(()));

    // Parked until stop() or the owning handle is dropped.
    let _ = shutdown.recv();
    drop(stream);
    tracing::debug!("microphone capture thread stopped");
}

fn build_stream(frames: mpsc::UnboundedSender<Vec<i16>>) -> Result<cpal::Stream> {
    let host = cpal::default_host();
    let device = host
        .default_input_device()
        .context("no default input device")?;
    let supported = device
        .supported_input_configs()
        .context("failed to enumerate input configs")?
        .find(|c| {
            c.min_sample_rate().0 <= CAPTURE_SAMPLE_RATE
                && CAPTURE_SAMPLE_RATE <= c.max_sample_rate().0
        })
        .ok_or_else(|| anyhow!("input device does not support {CAPTURE_SAMPLE_RATE} Hz"))?
        .with_sample_rate(SampleRate(CAPTURE_SAMPLE_RATE));

    let channels = supported.channels() as usize;
    let sample_format = supported.sample_format();
    let config: cpal::StreamConfig = supported.into();

    let mut buf: Vec<i16> = Vec::with_capacity(FRAME_SAMPLES);
    let err_fn = |e| tracing::error!("input stream error: {e}");

    let stream = match sample_format {
        SampleFormat::F32 => device.build_input_stream(
            &config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                // Mono downmix by taking the first channel of each frame.
                for frame in data.chunks(channels) {
                    let sample = (frame[0].clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
                    buf.push(sample);
                    if buf.len() == FRAME_SAMPLES {
                        if frames.send(std::mem::take(&mut buf)).is_err() {
                            return;
                        }
                        buf.reserve(FRAME_SAMPLES);
                    }
                }
            },
            err_fn,
            None,
        )?,
        SampleFormat::I16 => device.build_input_stream(
            &config,
            move |data: &[i16], _: &cpal::InputCallbackInfo| {
                for frame in data.chunks(channels) {
                    buf.push(frame[0]);
                    if buf.len() == FRAME_SAMPLES {
                        if frames.send(std::mem::take(&mut buf)).is_err() {
                            return;
                        }
                        buf.reserve(FRAME_SAMPLES);
                    }
                }
            },
            err_fn,
            None,
        )?,
        other => return Err(anyhow!("unsupported input sample format: {other:?}")),
    };

    Ok(stream)
}
