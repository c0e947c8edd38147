//! Feature contract between training and serving
//!
//! The ordered column list fitted at training time is the only valid
//! shape for inference. `fit` discovers it, `transform` applies it,
//! and the model crate persists it next to the trees so the two can
//! never drift apart.
//!
//! Modules:
//! - `schema`: ordered feature schema and leakage exclusion
//! - `transform`: record-to-vector mapping (pure, stateless)
//! - `input`: serving-boundary payload validation
//! - `errors`: feature-layer error taxonomy

pub mod errors;
pub mod input;
pub mod schema;
pub mod transform;

pub use errors::FeatureError;
pub use input::RawTransaction;
pub use schema::{CategoryColumn, FeatureSchema, LEAKY_FIELDS, NUMERIC_COLUMNS};
pub use transform::{transform, transform_batch};
