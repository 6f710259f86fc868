//! Audio device plumbing shared by the two orchestrators: a playback output
//! kept alive on its own thread, and microphone capture producing fixed-size
//! PCM frames.

mod capture;
mod output;

pub use capture::{MicCapture, CAPTURE_SAMPLE_RATE, FRAME_SAMPLES};
pub use output::AudioOutput;
