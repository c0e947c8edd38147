//! Deterministic offline trainer for the fraud classifier
//!
//! Training is a bounded batch computation: raw records in, a
//! persisted schema+forest package out. All randomness (bootstrap
//! sampling, feature subsampling, shuffling) flows from an explicit
//! seed through an LCG, so identical inputs and parameters produce
//! bit-identical models on every run.

pub mod cart;
pub mod dataset;
pub mod deterministic;
pub mod errors;
pub mod forest;
pub mod generator;
pub mod metrics;

pub use cart::{CartBuilder, TreeConfig};
pub use dataset::Dataset;
pub use deterministic::{xxhash64_i64, LcgRng, SplitTieBreaker};
pub use errors::TrainError;
pub use forest::ForestTrainer;
pub use generator::{generate, ground_truth_label, GeneratorConfig};
pub use metrics::{evaluate, EvaluationReport};

/// Crate version string for logs and reports
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
