//! Persisted model artifact
//!
//! A package bundles the trained forest with the feature schema it
//! was trained against; the two are written, hashed, and loaded as one
//! unit so a model can never be served against a schema it was not
//! trained with. On disk: `model.json` plus a `model.hash` sidecar
//! holding the hex blake3 digest of the JSON bytes.

use crate::errors::{ModelError, Result};
use crate::forest::ForestModel;
use fraudsim_features::FeatureSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// File name of the serialized package inside the model directory.
pub const MODEL_FILE: &str = "model.json";

/// File name of the integrity hash sidecar.
pub const HASH_FILE: &str = "model.hash";

/// Trained forest and its feature schema, versioned together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPackage {
    pub schema: FeatureSchema,
    pub model: ForestModel,
}

impl ModelPackage {
    pub fn new(schema: FeatureSchema, model: ForestModel) -> Self {
        Self { schema, model }
    }

    /// Hex blake3 digest of the serialized package.
    pub fn artifact_hash(&self) -> Result<String> {
        let json = serde_json::to_string_pretty(self)?;
        Ok(hex::encode(blake3::hash(json.as_bytes()).as_bytes()))
    }

    /// Consistency checks between schema and forest, applied at load
    /// time rather than at first request.
    pub fn validate(&self) -> Result<()> {
        if self.schema.len() != self.model.metadata.feature_count {
            return Err(ModelError::SchemaMismatch {
                expected: self.model.metadata.feature_count,
                actual: self.schema.len(),
            });
        }
        self.model.validate()
    }

    /// Write `model.json` and its hash sidecar into `dir`.
    pub fn save(&self, dir: &Path) -> Result<()> {
        self.validate()?;
        std::fs::create_dir_all(dir)?;

        let json = serde_json::to_string_pretty(self)?;
        let hash = hex::encode(blake3::hash(json.as_bytes()).as_bytes());

        std::fs::write(dir.join(MODEL_FILE), &json)?;
        std::fs::write(dir.join(HASH_FILE), &hash)?;

        info!(
            path = %dir.join(MODEL_FILE).display(),
            hash = %hash,
            trees = self.model.trees.len(),
            columns = self.schema.len(),
            "model package saved"
        );
        Ok(())
    }

    /// Load a package from `dir`, verifying the integrity hash and the
    /// schema/forest pairing before returning it.
    pub fn load(dir: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(dir.join(MODEL_FILE))?;
        let recorded = std::fs::read_to_string(dir.join(HASH_FILE))?;
        let actual = hex::encode(blake3::hash(json.as_bytes()).as_bytes());

        if recorded.trim() != actual {
            return Err(ModelError::Integrity(format!(
                "hash sidecar records {} but artifact hashes to {}",
                recorded.trim(),
                actual
            )));
        }

        let package: ModelPackage = serde_json::from_str(&json)?;
        package.validate()?;

        info!(
            path = %dir.join(MODEL_FILE).display(),
            trees = package.model.trees.len(),
            columns = package.schema.len(),
            "model package loaded"
        );
        Ok(package)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forest::{ModelMetadata, TrainingParams};
    use crate::tree::{Node, Tree};
    use chrono::NaiveDate;
    use fraudsim_types::TransactionRecord;
    use std::collections::BTreeMap;

    fn sample_package() -> ModelPackage {
        let records = vec![
            TransactionRecord::new(
                NaiveDate::from_ymd_opt(2024, 1, 15)
                    .unwrap()
                    .and_hms_opt(9, 0, 0)
                    .unwrap(),
                500,
                "USD",
                "PAYMENT",
                "CARD",
            ),
            TransactionRecord::new(
                NaiveDate::from_ymd_opt(2024, 1, 16)
                    .unwrap()
                    .and_hms_opt(22, 0, 0)
                    .unwrap(),
                90_000,
                "INR",
                "TRANSFER",
                "ATM",
            ),
        ];
        let schema = FeatureSchema::fit(&records);
        let feature_count = schema.len();
        let model = ForestModel {
            trees: vec![Tree {
                nodes: vec![
                    Node::split(0, 50_000.0, 1, 2),
                    Node::leaf(0.05, 0.95),
                    Node::leaf(0.95, 0.05),
                ],
            }],
            params: TrainingParams::default(),
            metadata: ModelMetadata {
                version: crate::VERSION.to_string(),
                created_at: 0,
                feature_count,
                tree_count: 1,
                metrics: BTreeMap::new(),
            },
        };
        ModelPackage::new(schema, model)
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let package = sample_package();
        package.save(dir.path()).unwrap();
        let loaded = ModelPackage::load(dir.path()).unwrap();
        assert_eq!(package, loaded);
    }

    #[test]
    fn test_tampered_artifact_fails_integrity() {
        let dir = tempfile::tempdir().unwrap();
        sample_package().save(dir.path()).unwrap();

        let path = dir.path().join(MODEL_FILE);
        let mut json = std::fs::read_to_string(&path).unwrap();
        json.push(' ');
        std::fs::write(&path, json).unwrap();

        assert!(matches!(
            ModelPackage::load(dir.path()),
            Err(ModelError::Integrity(_))
        ));
    }

    #[test]
    fn test_schema_forest_drift_fails_at_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut package = sample_package();
        package.save(dir.path()).unwrap();

        // Rewrite the artifact with a forest trained against a
        // different feature count, keeping the hash consistent.
        package.model.metadata.feature_count += 1;
        let json = serde_json::to_string_pretty(&package).unwrap();
        let hash = hex::encode(blake3::hash(json.as_bytes()).as_bytes());
        std::fs::write(dir.path().join(MODEL_FILE), &json).unwrap();
        std::fs::write(dir.path().join(HASH_FILE), &hash).unwrap();

        assert!(matches!(
            ModelPackage::load(dir.path()),
            Err(ModelError::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn test_missing_artifact_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            ModelPackage::load(dir.path()),
            Err(ModelError::Io(_))
        ));
    }
}
