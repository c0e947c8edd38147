//! Error types for the model layer

use thiserror::Error;

/// Errors that can occur while evaluating or loading a model
#[derive(Debug, Error)]
pub enum ModelError {
    /// Input vector shape disagrees with the persisted schema
    #[error("schema mismatch: expected {expected} features, got {actual}")]
    SchemaMismatch { expected: usize, actual: usize },

    /// Artifact bytes do not match the recorded integrity hash
    #[error("model integrity check failed: {0}")]
    Integrity(String),

    /// Structural validation of a loaded model failed
    #[error("model validation failed: {0}")]
    Validation(String),

    /// I/O error while reading or writing an artifact
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for model-layer operations
pub type Result<T> = std::result::Result<T, ModelError>;
