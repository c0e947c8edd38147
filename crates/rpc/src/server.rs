//! Scoring endpoint and service state

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use fraudsim_features::{transform, FeatureError, RawTransaction};
use fraudsim_model::{ModelError, ModelHandle, ModelPackage};
use fraudsim_types::Decision;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Default decision threshold for the fraud verdict.
pub const DEFAULT_THRESHOLD: f64 = 0.70;

/// Errors raised while configuring or running the service.
#[derive(Debug, Error)]
pub enum ServeError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Shared, read-only service state.
pub struct AppState {
    pub handle: ModelHandle,
    pub threshold: f64,
    pub model_dir: PathBuf,
    pub start_time: Instant,
    pub req_count: AtomicUsize,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    /// Validates the threshold and wraps a loaded package.
    pub fn new(
        package: ModelPackage,
        threshold: f64,
        model_dir: PathBuf,
    ) -> Result<Self, ServeError> {
        validate_threshold(threshold)?;
        Ok(Self {
            handle: ModelHandle::new(package)?,
            threshold,
            model_dir,
            start_time: Instant::now(),
            req_count: AtomicUsize::new(0),
        })
    }

    fn record_request(&self) -> usize {
        self.req_count.fetch_add(1, Ordering::Relaxed) + 1
    }
}

/// The decision threshold must leave room on both sides; 0 or 1 would
/// pin every verdict.
pub fn validate_threshold(threshold: f64) -> Result<(), ServeError> {
    if !(threshold > 0.0 && threshold < 1.0) {
        return Err(ServeError::InvalidConfiguration(format!(
            "threshold must be inside (0, 1), got {threshold}"
        )));
    }
    Ok(())
}

pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/version", get(handle_version))
        .route("/predict-fraud", post(handle_predict))
        .route("/model/reload", post(handle_reload))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Request-level error mapped onto an HTTP status and a JSON body.
enum ApiError {
    Feature(FeatureError),
    Model(ModelError),
}

impl From<FeatureError> for ApiError {
    fn from(err: FeatureError) -> Self {
        ApiError::Feature(err)
    }
}

impl From<ModelError> for ApiError {
    fn from(err: ModelError) -> Self {
        ApiError::Model(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Feature(err @ FeatureError::MissingField(_)) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            ApiError::Feature(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            ApiError::Model(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
        };
        if status.is_server_error() {
            warn!(%message, "scoring request failed");
        }
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Serialize)]
struct ScoreResponse {
    fraud_probability: f64,
    decision: Decision,
}

async fn handle_predict(
    State(state): State<SharedState>,
    Json(raw): Json<RawTransaction>,
) -> Result<Json<ScoreResponse>, ApiError> {
    state.record_request();

    let record = raw.validate()?;
    // One snapshot for the whole request: schema and forest can never
    // be observed mid-swap.
    let loaded = state.handle.get();
    let vector = transform(&record, &loaded.package.schema)?;
    let probability = loaded.package.model.predict_proba(&vector)?;

    Ok(Json(ScoreResponse {
        fraud_probability: (probability * 1000.0).round() / 1000.0,
        decision: Decision::from_probability(probability, state.threshold),
    }))
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    uptime_secs: u64,
    threshold: f64,
    trees: usize,
    feature_columns: usize,
    model_hash: String,
    req_total: usize,
}

async fn handle_health(State(state): State<SharedState>) -> Json<HealthResponse> {
    let loaded = state.handle.get();
    Json(HealthResponse {
        status: "ok",
        uptime_secs: state.start_time.elapsed().as_secs(),
        threshold: state.threshold,
        trees: loaded.package.model.trees.len(),
        feature_columns: loaded.package.schema.len(),
        // Hash is cached when the package is installed; this path
        // must never re-serialize the forest.
        model_hash: loaded.hash.clone(),
        req_total: state.req_count.load(Ordering::Relaxed),
    })
}

#[derive(Debug, Serialize)]
struct VersionResponse {
    version: &'static str,
    model_version: String,
}

async fn handle_version(State(state): State<SharedState>) -> Json<VersionResponse> {
    let loaded = state.handle.get();
    Json(VersionResponse {
        version: env!("CARGO_PKG_VERSION"),
        model_version: loaded.package.model.metadata.version.clone(),
    })
}

#[derive(Debug, Serialize)]
struct ReloadResponse {
    status: &'static str,
    trees: usize,
    feature_columns: usize,
}

/// Re-read the model directory and install the result atomically. On
/// failure the previously loaded package keeps serving.
async fn handle_reload(State(state): State<SharedState>) -> Result<Json<ReloadResponse>, ApiError> {
    let package = ModelPackage::load(&state.model_dir)?;
    let trees = package.model.trees.len();
    let feature_columns = package.schema.len();
    state.handle.swap(package)?;
    info!(trees, feature_columns, "model reloaded");
    Ok(Json(ReloadResponse {
        status: "reloaded",
        trees,
        feature_columns,
    }))
}
