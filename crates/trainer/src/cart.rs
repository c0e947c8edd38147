//! CART (Classification and Regression Tree) builder
//!
//! Exact-greedy binary classification trees scored by weighted Gini
//! impurity reduction, with deterministic tie-breaking and optional
//! per-node feature subsampling for ensemble decorrelation.

use fraudsim_model::tree::{Node, Tree};

use crate::deterministic::{LcgRng, SplitTieBreaker};

/// Training parameters for a single tree
#[derive(Clone, Debug)]
pub struct TreeConfig {
    pub max_depth: usize,
    pub min_samples_split: usize,
    /// Number of candidate features evaluated per node; `None`
    /// evaluates all of them.
    pub feature_subsample: Option<usize>,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: 12,
            min_samples_split: 5,
            feature_subsample: None,
        }
    }
}

/// Split candidate with its impurity reduction and tie-breaker
#[derive(Debug, Clone)]
struct SplitCandidate {
    feature_idx: usize,
    threshold: f64,
    reduction: f64,
    tie_breaker: SplitTieBreaker,
}

impl SplitCandidate {
    fn new(feature_idx: usize, threshold: f64, reduction: f64) -> Self {
        Self {
            feature_idx,
            threshold,
            reduction,
            tie_breaker: SplitTieBreaker::new(feature_idx, threshold),
        }
    }
}

/// Builds one classification tree over borrowed training data.
///
/// Labels are 1 for fraud, 0 for legit; `weights` carry the class
/// balancing computed by the ensemble trainer.
pub struct CartBuilder<'a> {
    config: TreeConfig,
    matrix: &'a [Vec<f64>],
    labels: &'a [u8],
    weights: &'a [f64],
    feature_count: usize,
}

impl<'a> CartBuilder<'a> {
    pub fn new(
        matrix: &'a [Vec<f64>],
        labels: &'a [u8],
        weights: &'a [f64],
        config: TreeConfig,
    ) -> Self {
        assert_eq!(matrix.len(), labels.len());
        assert_eq!(matrix.len(), weights.len());

        let feature_count = matrix.first().map_or(0, |row| row.len());

        Self {
            config,
            matrix,
            labels,
            weights,
            feature_count,
        }
    }

    /// Build a tree over the given row indices (a bootstrap sample).
    pub fn build(&self, indices: &[usize], rng: &mut LcgRng) -> Tree {
        let mut nodes = Vec::new();
        self.build_node(indices, 0, &mut nodes, rng);
        Tree { nodes }
    }

    fn build_node(
        &self,
        indices: &[usize],
        depth: usize,
        nodes: &mut Vec<Node>,
        rng: &mut LcgRng,
    ) -> u32 {
        let current_idx = nodes.len() as u32;
        let (p_fraud, p_legit) = self.leaf_distribution(indices);

        let pure = p_fraud == 0.0 || p_legit == 0.0;
        if depth >= self.config.max_depth
            || indices.len() < self.config.min_samples_split
            || pure
        {
            nodes.push(Node::leaf(p_fraud, p_legit));
            return current_idx;
        }

        let split = match self.find_best_split(indices, rng) {
            Some(s) => s,
            None => {
                nodes.push(Node::leaf(p_fraud, p_legit));
                return current_idx;
            }
        };

        let (left_indices, right_indices) =
            self.partition(indices, split.feature_idx, split.threshold);

        // Reserve the current slot, then fill children below it
        nodes.push(Node::split(split.feature_idx as u16, split.threshold, 0, 0));

        let left_idx = self.build_node(&left_indices, depth + 1, nodes, rng);
        let right_idx = self.build_node(&right_indices, depth + 1, nodes, rng);

        nodes[current_idx as usize].left = left_idx;
        nodes[current_idx as usize].right = right_idx;

        current_idx
    }

    /// Exact-greedy search over candidate features and midpoint
    /// thresholds; returns None when no split gives a positive
    /// impurity reduction.
    fn find_best_split(&self, indices: &[usize], rng: &mut LcgRng) -> Option<SplitCandidate> {
        let parent_impurity = self.gini(indices);
        let parent_weight = self.total_weight(indices);
        if parent_weight <= 0.0 {
            return None;
        }

        let features = self.candidate_features(rng);
        let mut best: Option<SplitCandidate> = None;

        for feature_idx in features {
            for threshold in self.candidate_thresholds(indices, feature_idx) {
                let (left, right) = self.partition(indices, feature_idx, threshold);
                if left.is_empty() || right.is_empty() {
                    continue;
                }

                let left_weight = self.total_weight(&left);
                let right_weight = self.total_weight(&right);
                let weighted_child_impurity = (left_weight * self.gini(&left)
                    + right_weight * self.gini(&right))
                    / parent_weight;
                let reduction = parent_impurity - weighted_child_impurity;

                if reduction <= 0.0 {
                    continue;
                }

                let candidate = SplitCandidate::new(feature_idx, threshold, reduction);
                best = match best {
                    None => Some(candidate),
                    Some(current) => {
                        if candidate.reduction > current.reduction
                            || (candidate.reduction == current.reduction
                                && candidate.tie_breaker < current.tie_breaker)
                        {
                            Some(candidate)
                        } else {
                            Some(current)
                        }
                    }
                };
            }
        }

        best
    }

    /// Features considered at this node: all of them, or a distinct
    /// random subset in ascending index order when subsampling is on.
    fn candidate_features(&self, rng: &mut LcgRng) -> Vec<usize> {
        match self.config.feature_subsample {
            Some(count) => rng.sample_without_replacement(self.feature_count, count.max(1)),
            None => (0..self.feature_count).collect(),
        }
    }

    /// Midpoints between consecutive distinct sorted values present in
    /// the node. A feature with a single distinct value contributes no
    /// candidates.
    fn candidate_thresholds(&self, indices: &[usize], feature_idx: usize) -> Vec<f64> {
        let mut values: Vec<f64> = indices
            .iter()
            .map(|&i| self.matrix[i][feature_idx])
            .collect();
        values.sort_by(f64::total_cmp);
        values.dedup();

        values
            .windows(2)
            .map(|pair| (pair[0] + pair[1]) / 2.0)
            .collect()
    }

    fn partition(
        &self,
        indices: &[usize],
        feature_idx: usize,
        threshold: f64,
    ) -> (Vec<usize>, Vec<usize>) {
        let mut left = Vec::new();
        let mut right = Vec::new();

        for &idx in indices {
            if self.matrix[idx][feature_idx] <= threshold {
                left.push(idx);
            } else {
                right.push(idx);
            }
        }

        (left, right)
    }

    /// Weighted Gini impurity: 1 - p_fraud^2 - p_legit^2
    fn gini(&self, indices: &[usize]) -> f64 {
        let (p_fraud, p_legit) = self.leaf_distribution(indices);
        1.0 - p_fraud * p_fraud - p_legit * p_legit
    }

    fn total_weight(&self, indices: &[usize]) -> f64 {
        indices.iter().map(|&i| self.weights[i]).sum()
    }

    /// Weighted class distribution of a sample set.
    fn leaf_distribution(&self, indices: &[usize]) -> (f64, f64) {
        let mut fraud = 0.0;
        let mut total = 0.0;

        for &idx in indices {
            let w = self.weights[idx];
            total += w;
            if self.labels[idx] == 1 {
                fraud += w;
            }
        }

        if total <= 0.0 {
            // Unreachable by construction; a defect upstream if hit.
            return (0.0, 1.0);
        }

        (fraud / total, (total - fraud) / total)
    }
}
