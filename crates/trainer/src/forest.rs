//! Bagged ensemble training
//!
//! Each tree gets its own bootstrap sample and RNG stream, seeded by a
//! deterministic mix of the base seed and the tree index, so trees are
//! independent enough to bag yet fully reproducible. Tree construction
//! is embarrassingly parallel and runs on the rayon pool; results are
//! collected in tree-index order.

use chrono::Utc;
use fraudsim_model::{ForestModel, ModelMetadata, TrainingParams};
use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::cart::{CartBuilder, TreeConfig};
use crate::deterministic::{xxhash64_i64, LcgRng};
use crate::errors::{Result, TrainError};

/// Bagged-forest trainer
pub struct ForestTrainer {
    params: TrainingParams,
}

impl ForestTrainer {
    /// Rejects bad hyperparameters before any computation starts.
    pub fn new(params: TrainingParams) -> Result<Self> {
        if params.num_trees == 0 {
            return Err(TrainError::InvalidConfiguration(
                "num_trees must be positive".into(),
            ));
        }
        if params.max_depth == 0 {
            return Err(TrainError::InvalidConfiguration(
                "max_depth must be positive".into(),
            ));
        }
        if params.min_samples_split < 2 {
            return Err(TrainError::InvalidConfiguration(
                "min_samples_split must be at least 2".into(),
            ));
        }
        Ok(Self { params })
    }

    /// Train a forest on a feature matrix and binary labels
    /// (1 = fraud).
    pub fn train(&self, matrix: &[Vec<f64>], labels: &[u8]) -> Result<ForestModel> {
        let n = matrix.len();
        if n < 2 {
            return Err(TrainError::EmptyDataset(format!(
                "need at least 2 training examples, got {n}"
            )));
        }
        if labels.len() != n {
            return Err(TrainError::Dataset(format!(
                "{n} feature rows but {} labels",
                labels.len()
            )));
        }

        let feature_count = matrix[0].len();
        if matrix.iter().any(|row| row.len() != feature_count) {
            return Err(TrainError::Dataset("ragged feature matrix".into()));
        }

        let fraud_count = labels.iter().filter(|&&l| l == 1).count();
        if fraud_count == 0 || fraud_count == n {
            return Err(TrainError::EmptyDataset(
                "training labels contain a single class, nothing to learn".into(),
            ));
        }

        let weights = self.sample_weights(labels, fraud_count);
        let tree_config = TreeConfig {
            max_depth: self.params.max_depth,
            min_samples_split: self.params.min_samples_split,
            feature_subsample: self
                .params
                .feature_subsampling
                .then(|| ((feature_count as f64).sqrt().floor() as usize).max(1)),
        };

        info!(
            samples = n,
            features = feature_count,
            fraud = fraud_count,
            trees = self.params.num_trees,
            "training forest"
        );

        // Per-tree seeds derived up front so the parallel region has
        // no shared RNG state.
        let seeds: Vec<i64> = (0..self.params.num_trees)
            .map(|t| xxhash64_i64(&[t as i64], self.params.seed))
            .collect();

        let builder = CartBuilder::new(matrix, labels, &weights, tree_config);
        let trees: Vec<_> = seeds
            .par_iter()
            .enumerate()
            .map(|(t, &seed)| {
                let mut rng = LcgRng::new(seed);
                let sample = rng.bootstrap_indices(n, n);
                let tree = builder.build(&sample, &mut rng);
                debug!(tree = t, nodes = tree.nodes.len(), "tree built");
                tree
            })
            .collect();

        let metadata = ModelMetadata {
            version: crate::VERSION.to_string(),
            created_at: Utc::now().timestamp(),
            feature_count,
            tree_count: trees.len(),
            metrics: BTreeMap::new(),
        };

        Ok(ForestModel {
            trees,
            params: self.params.clone(),
            metadata,
        })
    }

    /// Balanced class weights: total / (num_classes * class_count).
    fn sample_weights(&self, labels: &[u8], fraud_count: usize) -> Vec<f64> {
        if !self.params.class_weighting {
            return vec![1.0; labels.len()];
        }

        let total = labels.len() as f64;
        let fraud_weight = total / (2.0 * fraud_count as f64);
        let legit_weight = total / (2.0 * (labels.len() - fraud_count) as f64);

        labels
            .iter()
            .map(|&l| if l == 1 { fraud_weight } else { legit_weight })
            .collect()
    }
}
