//! Fraud classifier trainer CLI
//!
//! Deterministic offline trainer: raw transactions in (CSV or the
//! built-in synthetic generator), a hashed schema+forest package out.

use anyhow::{Context, Result};
use clap::Parser;
use fraudsim_features::{transform_batch, FeatureSchema};
use fraudsim_model::{ModelPackage, TrainingParams};
use fraudsim_trainer::{evaluate, generate, Dataset, ForestTrainer, GeneratorConfig};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "fraud-train")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Deterministic trainer for the transaction fraud classifier", long_about = None)]
struct Args {
    /// Input CSV dataset; omitted = generate a synthetic one
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Number of synthetic records when no input file is given
    #[arg(long, default_value = "5000")]
    generate: usize,

    /// Also write the (possibly generated) dataset to this CSV path
    #[arg(long)]
    emit_dataset: Option<PathBuf>,

    /// Output directory for the model package
    #[arg(short, long, default_value = "models/fraud")]
    output: PathBuf,

    /// Number of bagged trees
    #[arg(long, default_value = "200")]
    trees: usize,

    /// Maximum tree depth
    #[arg(long, default_value = "12")]
    max_depth: usize,

    /// Minimum samples required to split a node
    #[arg(long, default_value = "5")]
    min_samples_split: usize,

    /// Random seed for shuffling, bootstrap, and feature subsampling
    #[arg(long, default_value = "42")]
    seed: i64,

    /// Held-out fraction for evaluation
    #[arg(long, default_value = "0.2")]
    test_fraction: f64,

    /// Disable balanced class weighting
    #[arg(long)]
    no_class_weighting: bool,

    /// Disable per-node feature subsampling
    #[arg(long)]
    no_feature_subsampling: bool,

    /// Skip dataset shuffling
    #[arg(long)]
    no_shuffle: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    info!("fraud-train v{}", env!("CARGO_PKG_VERSION"));

    // Hyperparameters are validated before any data is touched.
    let params = TrainingParams {
        num_trees: args.trees,
        max_depth: args.max_depth,
        min_samples_split: args.min_samples_split,
        seed: args.seed,
        class_weighting: !args.no_class_weighting,
        feature_subsampling: !args.no_feature_subsampling,
    };
    let trainer = ForestTrainer::new(params)?;

    let mut dataset = match &args.input {
        Some(path) => {
            info!("Loading dataset from: {}", path.display());
            Dataset::from_csv(path).context("Failed to load dataset")?
        }
        None => {
            info!("Generating {} synthetic records", args.generate);
            Dataset::new(generate(&GeneratorConfig {
                num_records: args.generate,
                seed: args.seed,
            }))
        }
    };
    info!("Dataset: {} records", dataset.len());

    if let Some(path) = &args.emit_dataset {
        dataset.to_csv(path).context("Failed to write dataset")?;
        info!("Dataset written to: {}", path.display());
    }

    if !args.no_shuffle {
        info!("Shuffling with seed {}", args.seed);
        dataset.shuffle(args.seed);
    }

    let (train_set, test_set) = dataset.split(args.test_fraction)?;
    info!(
        "Split: {} train / {} test",
        train_set.len(),
        test_set.len()
    );

    // The schema is fitted on the training batch only; serving reuses
    // it verbatim from the persisted package.
    let schema = FeatureSchema::fit(&train_set.records);
    info!("Feature schema: {} columns", schema.len());
    for name in schema.column_names() {
        info!("  {}", name);
    }

    let train_matrix = transform_batch(&train_set.records, &schema)?;
    let train_labels = train_set.labels()?;

    info!("Training {} trees...", args.trees);
    let mut model = trainer.train(&train_matrix, &train_labels)?;

    if !test_set.is_empty() {
        let test_matrix = transform_batch(&test_set.records, &schema)?;
        let test_labels = test_set.labels()?;
        let report = evaluate(&model, &test_matrix, &test_labels, 0.5)?;
        info!("Held-out evaluation:\n{}", report);
        model.metadata.metrics = report.to_metrics_map();
    }

    let package = ModelPackage::new(schema, model);
    package.save(&args.output).context("Failed to save model")?;

    info!(
        "Model package saved to {} (hash {})",
        args.output.display(),
        package.artifact_hash()?
    );

    Ok(())
}
