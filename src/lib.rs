//! Vocal performance analysis: pitch, rhythm, loudness/timbre and spectral
//! statistics from mono PCM, plus a derived score and coaching recommendations.
//!
//! Every analysis call is a pure function of its input buffer. Calls share no
//! state and may run concurrently; see [`batch`] for a worker-pool driver.

pub mod audio;
pub mod batch;
pub mod error;
pub mod progress;
pub mod score;

pub use audio::analysis::{analyze, analyze_base64, analyze_samples, DEFAULT_SAMPLE_RATE};
pub use audio::decode::SampleBuffer;
pub use audio::features::AnalysisResult;
pub use error::{AnalysisError, Result};
