//! Scoring verdict and threshold rule

use serde::{Deserialize, Serialize};

/// Final decision returned by the scoring endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    #[serde(rename = "FRAUD")]
    Fraud,
    #[serde(rename = "LEGIT")]
    Legit,
}

impl Decision {
    /// Apply the decision threshold. The boundary is inclusive: a
    /// probability exactly equal to the threshold is flagged as fraud.
    pub fn from_probability(probability: f64, threshold: f64) -> Self {
        if probability >= threshold {
            Decision::Fraud
        } else {
            Decision::Legit
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Fraud => "FRAUD",
            Decision::Legit => "LEGIT",
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
