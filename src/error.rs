use std::time::Duration;

use thiserror::Error;

/// Shown to the user for every processing failure.
pub const PROCESSING_FAILURE_MESSAGE: &str =
    "An error occurred. The PDF might be corrupted or protected.";

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Failed to load PDF: {0:#}")]
    Load(anyhow::Error),

    #[error("Failed to save PDF: {0:#}")]
    Serialize(anyhow::Error),

    #[error("Processing did not finish within {0:?}")]
    TimedOut(Duration),

    #[error("Failed to start processing thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Processing thread stopped without a result")]
    WorkerLost,
}
