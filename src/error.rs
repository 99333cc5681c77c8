//! Error type for the analysis library.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Input that cannot be analyzed at all (zero sample rate, bad base64, no audio track).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to decode audio: {0}")]
    Decode(String),

    #[error("Failed to start worker pool: {0}")]
    WorkerPool(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<symphonia::core::errors::Error> for AnalysisError {
    fn from(err: symphonia::core::errors::Error) -> Self {
        match err {
            symphonia::core::errors::Error::IoError(e) => AnalysisError::Io(e),
            other => AnalysisError::Decode(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
