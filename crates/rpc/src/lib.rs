//! HTTP scoring service
//!
//! Exposes the trained model over a small JSON API: `/predict-fraud`
//! for scoring, `/model/reload` for atomic artifact reloads, plus
//! `/health` and `/version`.

pub mod server;

pub use server::{build_router, validate_threshold, AppState, ServeError, DEFAULT_THRESHOLD};
