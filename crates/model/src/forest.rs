//! Bagged ensemble aggregation
//!
//! The forest owns its trees outright; once trained it is immutable
//! apart from full retraining. Inference averages per-tree leaf
//! probabilities, so the output is already a probability and needs no
//! further calibration.

use crate::errors::{ModelError, Result};
use crate::tree::Tree;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Hyperparameters a forest was trained with, persisted for
/// reproducibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingParams {
    pub num_trees: usize,
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub seed: i64,
    pub class_weighting: bool,
    pub feature_subsampling: bool,
}

impl Default for TrainingParams {
    fn default() -> Self {
        Self {
            num_trees: 200,
            max_depth: 12,
            min_samples_split: 5,
            seed: 42,
            class_weighting: true,
            feature_subsampling: true,
        }
    }
}

/// Descriptive metadata persisted with a trained forest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub version: String,
    pub created_at: i64,
    pub feature_count: usize,
    pub tree_count: usize,
    /// Held-out evaluation metrics recorded by the trainer
    pub metrics: BTreeMap<String, f64>,
}

/// A trained bagged-decision-tree classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestModel {
    pub trees: Vec<Tree>,
    pub params: TrainingParams,
    pub metadata: ModelMetadata,
}

impl ForestModel {
    /// Probability of the positive (fraud) class: arithmetic mean of
    /// per-tree leaf probabilities.
    pub fn predict_proba(&self, features: &[f64]) -> Result<f64> {
        if features.len() != self.metadata.feature_count {
            return Err(ModelError::SchemaMismatch {
                expected: self.metadata.feature_count,
                actual: features.len(),
            });
        }
        if self.trees.is_empty() {
            return Err(ModelError::Validation("forest has no trees".into()));
        }

        let mut sum = 0.0;
        for tree in &self.trees {
            sum += tree.predict_fraud(features)?;
        }
        Ok(sum / self.trees.len() as f64)
    }

    /// Structural validation of every tree against the feature count.
    pub fn validate(&self) -> Result<()> {
        if self.trees.is_empty() {
            return Err(ModelError::Validation("forest has no trees".into()));
        }
        if self.trees.len() != self.metadata.tree_count {
            return Err(ModelError::Validation(format!(
                "metadata records {} trees but forest holds {}",
                self.metadata.tree_count,
                self.trees.len()
            )));
        }
        for tree in &self.trees {
            tree.validate(self.metadata.feature_count)?;
        }
        Ok(())
    }
}
