//! Error types for the feature layer

use thiserror::Error;

/// Errors that can occur while validating input or applying a schema
#[derive(Debug, Error)]
pub enum FeatureError {
    /// A required raw field is absent from the input
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The schema handed to the transform is empty or malformed
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),
}

/// Result type for feature-layer operations
pub type Result<T> = std::result::Result<T, FeatureError>;
