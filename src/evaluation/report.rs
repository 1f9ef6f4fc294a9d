//! Benchmark reports

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;

/// Outcome of a KNN train/test run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KNNReport {
    pub k: usize,
    pub train_size: usize,
    pub test_size: usize,
    pub correct: usize,
    /// Fraction of correctly classified test rows
    pub accuracy: f64,
}

/// Outcome of a perceptron cross-validation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerceptronReport {
    pub n_folds: usize,
    pub fold_accuracies: Vec<f64>,
    pub mean_accuracy: f64,
}

impl KNNReport {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl PerceptronReport {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for KNNReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "K: {}", self.k)?;
        writeln!(
            f,
            "Predicted {} correctly from {} instances",
            self.correct, self.test_size
        )?;
        write!(f, "Accuracy: {:.2}", self.accuracy * 100.0)
    }
}

impl fmt::Display for PerceptronReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "K: {}", self.n_folds)?;
        write!(f, "Accuracy: {:.2}", self.mean_accuracy * 100.0)
    }
}
