use std::sync::{mpsc as std_mpsc, Arc};
use std::thread;

use anyhow::{anyhow, Context, Result};
use rodio::{OutputStream, OutputStreamHandle, Sink};

/// Handle to the default playback device.
///
/// `rodio::OutputStream` is not `Send`, so the stream lives on a dedicated
/// thread for as long as any clone of this handle exists; sinks can be
/// created from any thread.
#[derive(Clone)]
pub struct AudioOutput {
    handle: OutputStreamHandle,
    _keepalive: Arc<Keepalive>,
}

struct Keepalive {
    _tx: std_mpsc::Sender<()>,
}

impl AudioOutput {
    /// Opens the default output device.
    pub async fn open() -> Result<Self> {
        let (keep_tx, keep_rx) = std_mpsc::channel::<()>();
        let (ready_tx, ready_rx) = tokio::sync::oneshot::channel();

        thread::spawn(move || {
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    let _ = ready_tx.send(Err(anyhow!("failed to open output device: {e}")));
                    return;
                }
            };
            let _ = ready_tx.send(Ok(handle));
            // Parked until every AudioOutput clone is gone.
            while keep_rx.recv().is_ok() {}
            drop(stream);
            tracing::debug!("audio output thread stopped");
        });

        let handle = ready_rx
            .await
            .map_err(|_| anyhow!("output thread exited before reporting readiness"))??;

        Ok(Self {
            handle,
            _keepalive: Arc::new(Keepalive { _tx: keep_tx }),
        })
    }

    /// Creates a fresh sink on the output mixer.
    pub fn new_sink(&self) -> Result<Sink> {
        Sink::try_new(&self.handle).context("failed to create audio sink")
    }
}
