//! Flat-array decision tree with probability leaves
//!
//! Trees are stored as a flat node vector with explicit child indices,
//! built once during training and read-only afterwards. Each leaf
//! carries the weighted class distribution `[p_fraud, p_legit]` of the
//! training samples that reached it, not a hard vote, because the
//! ensemble aggregates probabilities.

use crate::errors::{ModelError, Result};
use serde::{Deserialize, Serialize};

/// A decision tree node (internal or leaf)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Feature index to compare (for internal nodes)
    pub feature_index: u16,
    /// Split threshold; samples with `value <= threshold` go left
    pub threshold: f64,
    /// Index of left child node
    pub left: u32,
    /// Index of right child node
    pub right: u32,
    /// Leaf distribution `[p_fraud, p_legit]` (None for internal nodes)
    pub value: Option<[f64; 2]>,
}

impl Node {
    pub fn leaf(p_fraud: f64, p_legit: f64) -> Self {
        Self {
            feature_index: 0,
            threshold: 0.0,
            left: 0,
            right: 0,
            value: Some([p_fraud, p_legit]),
        }
    }

    pub fn split(feature_index: u16, threshold: f64, left: u32, right: u32) -> Self {
        Self {
            feature_index,
            threshold,
            left,
            right,
            value: None,
        }
    }
}

/// A single decision tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    /// Nodes in construction order; node 0 is the root
    pub nodes: Vec<Node>,
}

impl Tree {
    /// Walk the tree and return the leaf probability of fraud.
    pub fn predict_fraud(&self, features: &[f64]) -> Result<f64> {
        let mut idx = 0usize;

        loop {
            let node = self
                .nodes
                .get(idx)
                .ok_or_else(|| ModelError::Validation(format!("node index {idx} out of range")))?;

            if let Some([p_fraud, _]) = node.value {
                return Ok(p_fraud);
            }

            let feature_idx = node.feature_index as usize;
            let feature_value =
                *features
                    .get(feature_idx)
                    .ok_or_else(|| ModelError::SchemaMismatch {
                        expected: feature_idx + 1,
                        actual: features.len(),
                    })?;

            idx = if feature_value <= node.threshold {
                node.left as usize
            } else {
                node.right as usize
            };
        }
    }

    /// Structural checks: non-empty, child indices in range and
    /// strictly after their parent, leaf distributions valid and
    /// summing to 1.
    pub fn validate(&self, feature_count: usize) -> Result<()> {
        if self.nodes.is_empty() {
            return Err(ModelError::Validation("tree has no nodes".into()));
        }

        for (i, node) in self.nodes.iter().enumerate() {
            match node.value {
                Some([p_fraud, p_legit]) => {
                    let ok = (0.0..=1.0).contains(&p_fraud)
                        && (0.0..=1.0).contains(&p_legit)
                        && ((p_fraud + p_legit) - 1.0).abs() < 1e-9;
                    if !ok {
                        return Err(ModelError::Validation(format!(
                            "leaf {i} has invalid distribution [{p_fraud}, {p_legit}]"
                        )));
                    }
                }
                None => {
                    if node.feature_index as usize >= feature_count {
                        return Err(ModelError::Validation(format!(
                            "node {i} splits on feature {} but model has {feature_count}",
                            node.feature_index
                        )));
                    }
                    if node.left as usize >= self.nodes.len()
                        || node.right as usize >= self.nodes.len()
                    {
                        return Err(ModelError::Validation(format!(
                            "node {i} has child index out of range"
                        )));
                    }
                    // Construction order places children after their
                    // parent; anything else could cycle during
                    // prediction.
                    if node.left as usize <= i || node.right as usize <= i {
                        return Err(ModelError::Validation(format!(
                            "node {i} has a non-forward child index"
                        )));
                    }
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple_tree() -> Tree {
        Tree {
            nodes: vec![
                Node::split(0, 50.0, 1, 2),
                Node::leaf(0.1, 0.9),
                Node::leaf(0.8, 0.2),
            ],
        }
    }

    #[test]
    fn test_left_branch() {
        assert_eq!(simple_tree().predict_fraud(&[30.0]).unwrap(), 0.1);
    }

    #[test]
    fn test_right_branch() {
        assert_eq!(simple_tree().predict_fraud(&[60.0]).unwrap(), 0.8);
    }

    #[test]
    fn test_split_boundary_goes_left() {
        assert_eq!(simple_tree().predict_fraud(&[50.0]).unwrap(), 0.1);
    }

    #[test]
    fn test_short_feature_vector_is_schema_mismatch() {
        assert!(matches!(
            simple_tree().predict_fraud(&[]),
            Err(ModelError::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn test_validate_accepts_well_formed_tree() {
        assert!(simple_tree().validate(1).is_ok());
    }

    #[test]
    fn test_validate_rejects_unnormalized_leaf() {
        let tree = Tree {
            nodes: vec![Node::leaf(0.6, 0.6)],
        };
        assert!(tree.validate(1).is_err());
    }

    #[test]
    fn test_validate_rejects_dangling_child() {
        let tree = Tree {
            nodes: vec![Node::split(0, 1.0, 5, 6)],
        };
        assert!(tree.validate(1).is_err());
    }

    #[test]
    fn test_validate_rejects_backward_child() {
        // Right child points back at the root; following it during
        // prediction would never terminate.
        let tree = Tree {
            nodes: vec![Node::split(0, 50.0, 1, 0), Node::leaf(0.3, 0.7)],
        };
        assert!(matches!(
            tree.validate(1),
            Err(ModelError::Validation(_))
        ));
    }
}
