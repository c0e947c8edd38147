//! Held-out evaluation metrics
//!
//! Binary classification metrics at a fixed decision threshold,
//! computed over a held-out split and embedded into the persisted
//! model metadata by the CLI.

use fraudsim_model::ForestModel;
use std::collections::BTreeMap;
use std::fmt;

use crate::errors::Result;

/// Evaluation summary at one decision threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationReport {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// `confusion[actual][predicted]`, class 1 = fraud
    pub confusion: [[u64; 2]; 2],
    pub threshold: f64,
}

impl EvaluationReport {
    /// Flatten into the metadata metrics map.
    pub fn to_metrics_map(&self) -> BTreeMap<String, f64> {
        let mut map = BTreeMap::new();
        map.insert("accuracy".to_string(), self.accuracy);
        map.insert("precision".to_string(), self.precision);
        map.insert("recall".to_string(), self.recall);
        map.insert("f1".to_string(), self.f1);
        map.insert("eval_threshold".to_string(), self.threshold);
        map
    }
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "accuracy={:.4} precision={:.4} recall={:.4} f1={:.4} (threshold {:.2})",
            self.accuracy, self.precision, self.recall, self.f1, self.threshold
        )?;
        writeln!(f, "confusion (rows: actual legit/fraud, cols: predicted):")?;
        writeln!(f, "  [{:>6} {:>6}]", self.confusion[0][0], self.confusion[0][1])?;
        write!(f, "  [{:>6} {:>6}]", self.confusion[1][0], self.confusion[1][1])
    }
}

/// Score every row and tally the confusion matrix.
pub fn evaluate(
    model: &ForestModel,
    matrix: &[Vec<f64>],
    labels: &[u8],
    threshold: f64,
) -> Result<EvaluationReport> {
    let mut confusion = [[0u64; 2]; 2];

    for (row, &label) in matrix.iter().zip(labels) {
        let probability = model.predict_proba(row)?;
        let predicted = usize::from(probability >= threshold);
        confusion[label as usize][predicted] += 1;
    }

    let tp = confusion[1][1] as f64;
    let fp = confusion[0][1] as f64;
    let missed = confusion[1][0] as f64;
    let tn = confusion[0][0] as f64;
    let total = tp + fp + missed + tn;

    let accuracy = if total > 0.0 { (tp + tn) / total } else { 0.0 };
    let precision = if tp + fp > 0.0 { tp / (tp + fp) } else { 0.0 };
    let recall = if tp + missed > 0.0 { tp / (tp + missed) } else { 0.0 };
    let f1 = if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    };

    Ok(EvaluationReport {
        accuracy,
        precision,
        recall,
        f1,
        confusion,
        threshold,
    })
}
