use thiserror::Error;

/// Result type for experiment operations.
pub type Result<T> = std::result::Result<T, ExperimentError>;

/// Errors that can occur while setting up or running the experiment.
#[derive(Debug, Error)]
pub enum ExperimentError {
    /// IO error while reading dataset files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Dataset file exists but does not parse
    #[error("Malformed dataset file: {0}")]
    Format(String),

    /// More samples requested than the dataset holds
    #[error("Requested {requested} samples but only {available} are available")]
    NotEnoughSamples { requested: usize, available: usize },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
