//! `fraud-serve`: HTTP scoring service for the fraud model

use anyhow::{Context, Result};
use clap::Parser;
use fraudsim_model::ModelPackage;
use fraudsim_rpc::{build_router, validate_threshold, AppState, DEFAULT_THRESHOLD};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "fraud-serve", about = "Serve fraud-probability scoring over HTTP")]
struct Args {
    /// Directory holding model.json and model.hash
    #[arg(long, default_value = "models/fraud")]
    model_dir: PathBuf,

    /// Listen address
    #[arg(long, default_value = "127.0.0.1:8080")]
    listen: SocketAddr,

    /// Decision threshold, exclusive of 0 and 1
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    threshold: f64,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    // Reject a bad threshold before touching the model directory.
    validate_threshold(args.threshold)?;

    let package = ModelPackage::load(&args.model_dir)
        .with_context(|| format!("loading model package from {}", args.model_dir.display()))?;
    info!(
        trees = package.model.trees.len(),
        feature_columns = package.schema.len(),
        model_version = %package.model.metadata.version,
        "model package loaded"
    );

    let state = Arc::new(AppState::new(package, args.threshold, args.model_dir)?);
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(args.listen)
        .await
        .with_context(|| format!("binding {}", args.listen))?;
    info!(addr = %args.listen, threshold = args.threshold, "scoring service listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(%err, "failed to install shutdown handler");
    }
    info!("shutdown signal received");
}
