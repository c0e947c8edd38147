//! Bagged decision-tree model and artifact handling
//!
//! Modules:
//! - `tree`: flat-array decision tree and leaf-probability evaluation
//! - `forest`: ensemble aggregation and training parameters
//! - `package`: persisted model + schema artifact with integrity hash
//! - `handle`: process-wide, atomically swappable loaded-model handle
//! - `errors`: model-layer error taxonomy

pub mod errors;
pub mod forest;
pub mod handle;
pub mod package;
pub mod tree;

pub use errors::ModelError;
pub use forest::{ForestModel, ModelMetadata, TrainingParams};
pub use handle::{LoadedModel, ModelHandle};
pub use package::ModelPackage;
pub use tree::{Node, Tree};

/// Crate version string for model metadata
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
