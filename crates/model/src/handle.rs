//! Process-wide loaded-model handle
//!
//! The scoring service holds one handle for its lifetime. Readers
//! clone an `Arc` to the current package and keep using it even while
//! a reload installs a replacement, so an in-flight request observes
//! either the old or the new schema+forest pair, never a mix.

use crate::errors::Result;
use crate::package::ModelPackage;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::info;

/// A package with its artifact hash, computed once when installed.
/// Serializing and hashing a full forest is far too heavy to repeat
/// on read paths.
#[derive(Debug)]
pub struct LoadedModel {
    pub package: ModelPackage,
    pub hash: String,
}

impl LoadedModel {
    fn install(package: ModelPackage) -> Result<Arc<Self>> {
        let hash = package.artifact_hash()?;
        Ok(Arc::new(Self { package, hash }))
    }
}

/// Atomically swappable reference to the currently served model.
#[derive(Debug)]
pub struct ModelHandle {
    current: RwLock<Arc<LoadedModel>>,
}

impl ModelHandle {
    pub fn new(package: ModelPackage) -> Result<Self> {
        Ok(Self {
            current: RwLock::new(LoadedModel::install(package)?),
        })
    }

    /// Snapshot of the currently installed package and its hash.
    pub fn get(&self) -> Arc<LoadedModel> {
        self.current.read().clone()
    }

    /// Install a fully built replacement package.
    pub fn swap(&self, package: ModelPackage) -> Result<()> {
        let next = LoadedModel::install(package)?;
        let trees = next.package.model.trees.len();
        *self.current.write() = next;
        info!(trees, "model package swapped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forest::{ForestModel, ModelMetadata, TrainingParams};
    use crate::tree::{Node, Tree};
    use fraudsim_features::FeatureSchema;
    use std::collections::BTreeMap;

    fn package_with_leaf(p_fraud: f64) -> ModelPackage {
        ModelPackage::new(
            FeatureSchema { categories: vec![] },
            ForestModel {
                trees: vec![Tree {
                    nodes: vec![Node::leaf(p_fraud, 1.0 - p_fraud)],
                }],
                params: TrainingParams::default(),
                metadata: ModelMetadata {
                    version: crate::VERSION.to_string(),
                    created_at: 0,
                    feature_count: 3,
                    tree_count: 1,
                    metrics: BTreeMap::new(),
                },
            },
        )
    }

    #[test]
    fn test_swap_replaces_snapshot() {
        let handle = ModelHandle::new(package_with_leaf(0.2)).unwrap();
        let before = handle.get();
        handle.swap(package_with_leaf(0.9)).unwrap();
        let after = handle.get();

        let probe = [0.0, 0.0, 0.0];
        assert_eq!(before.package.model.predict_proba(&probe).unwrap(), 0.2);
        assert_eq!(after.package.model.predict_proba(&probe).unwrap(), 0.9);
    }

    #[test]
    fn test_old_snapshot_survives_swap() {
        let handle = ModelHandle::new(package_with_leaf(0.2)).unwrap();
        let snapshot = handle.get();
        handle.swap(package_with_leaf(0.9)).unwrap();
        // A request that grabbed the old Arc keeps a coherent pair.
        assert_eq!(
            snapshot.package.model.predict_proba(&[0.0, 0.0, 0.0]).unwrap(),
            0.2
        );
    }

    #[test]
    fn test_hash_is_computed_once_per_install() {
        let package = package_with_leaf(0.2);
        let expected = package.artifact_hash().unwrap();
        let handle = ModelHandle::new(package).unwrap();
        assert_eq!(handle.get().hash, expected);

        let replacement = package_with_leaf(0.9);
        let replacement_hash = replacement.artifact_hash().unwrap();
        handle.swap(replacement).unwrap();
        assert_eq!(handle.get().hash, replacement_hash);
        assert_ne!(handle.get().hash, expected);
    }
}
