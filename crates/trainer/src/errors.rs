//! Error types for the trainer

use thiserror::Error;

/// Errors returned by the offline trainer.
#[derive(Debug, Error)]
pub enum TrainError {
    /// Training invoked on insufficient or degenerate data
    #[error("empty dataset: {0}")]
    EmptyDataset(String),

    /// Hyperparameters rejected before any computation starts
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Dataset file could not be parsed
    #[error("dataset error: {0}")]
    Dataset(String),

    #[error(transparent)]
    Feature(#[from] fraudsim_features::FeatureError),

    #[error(transparent)]
    Model(#[from] fraudsim_model::ModelError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for trainer operations
pub type Result<T> = std::result::Result<T, TrainError>;
