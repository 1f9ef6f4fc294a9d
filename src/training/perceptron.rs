//! Online perceptron classifier
//!
//! Binary {0, 1} classifier trained by per-row stochastic updates. The
//! weight vector has one slot per column; the slot at the class index is
//! the bias.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::error::{BenchError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerceptronConfig {
    pub learning_rate: f64,
    pub epochs: usize,
}

impl Default for PerceptronConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.01,
            epochs: 500,
        }
    }
}

impl PerceptronConfig {
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.learning_rate.is_nan() || self.learning_rate <= 0.0 {
            return Err(BenchError::invalid_parameter(
                "learning_rate",
                self.learning_rate,
                "must be positive",
            ));
        }
        if self.epochs == 0 {
            return Err(BenchError::invalid_parameter("epochs", 0, "must be at least 1"));
        }
        Ok(())
    }
}

/// `bias + Σ w[i]·row[i]` over the attribute columns
pub fn activation(row: ArrayView1<'_, f64>, weights: &Array1<f64>, class_index: usize) -> f64 {
    row.iter()
        .zip(weights.iter())
        .enumerate()
        .filter(|(i, _)| *i != class_index)
        .fold(weights[class_index], |acc, (_, (x, w))| acc + w * x)
}

/// 1.0 when the activation is non-negative, 0.0 otherwise
pub fn predict_row(row: ArrayView1<'_, f64>, weights: &Array1<f64>, class_index: usize) -> f64 {
    if activation(row, weights, class_index) >= 0.0 {
        1.0
    } else {
        0.0
    }
}

/// Train a weight vector from zero over `epochs` passes. Row order is the
/// same on every pass.
pub fn train_weights(
    train: ArrayView2<'_, f64>,
    learning_rate: f64,
    epochs: usize,
    class_index: usize,
) -> Result<Array1<f64>> {
    if train.nrows() == 0 {
        return Err(BenchError::ValidationError("training set is empty".to_string()));
    }
    if class_index >= train.ncols() {
        return Err(BenchError::invalid_parameter(
            "class_index",
            class_index,
            format!("rows have {} columns", train.ncols()),
        ));
    }

    let mut weights = Array1::zeros(train.ncols());

    for _ in 0..epochs {
        for row in train.rows() {
            let error = row[class_index] - predict_row(row, &weights, class_index);
            if error == 0.0 {
                continue;
            }

            let step = learning_rate * error;
            for (i, (w, x)) in weights.iter_mut().zip(row.iter()).enumerate() {
                if i == class_index {
                    *w += step;
                } else {
                    *w += step * x;
                }
            }
        }
    }

    Ok(weights)
}

/// Fraction of rows whose prediction equals the stored label. An empty set
/// scores 0.0.
pub fn evaluate(weights: &Array1<f64>, test: ArrayView2<'_, f64>, class_index: usize) -> f64 {
    if test.nrows() == 0 {
        return 0.0;
    }
    let correct = test
        .rows()
        .into_iter()
        .filter(|row| predict_row(row.view(), weights, class_index) == row[class_index])
        .count();
    correct as f64 / test.nrows() as f64
}

/// Perceptron model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Perceptron {
    pub config: PerceptronConfig,
    weights: Option<Array1<f64>>,
    class_index: usize,
}

impl Default for Perceptron {
    fn default() -> Self {
        Self::new(PerceptronConfig::default())
    }
}

impl Perceptron {
    pub fn new(config: PerceptronConfig) -> Self {
        Self {
            config,
            weights: None,
            class_index: 0,
        }
    }

    pub fn fit(&mut self, train: &Array2<f64>, class_index: usize) -> Result<&mut Self> {
        self.config.validate()?;
        let weights = train_weights(
            train.view(),
            self.config.learning_rate,
            self.config.epochs,
            class_index,
        )?;
        self.weights = Some(weights);
        self.class_index = class_index;
        Ok(self)
    }

    pub fn weights(&self) -> Option<&Array1<f64>> {
        self.weights.as_ref()
    }

    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let weights = self.weights.as_ref().ok_or(BenchError::ModelNotFitted)?;
        Ok(x.rows()
            .into_iter()
            .map(|row| predict_row(row, weights, self.class_index))
            .collect())
    }

    /// Accuracy on `test`
    pub fn score(&self, test: &Array2<f64>) -> Result<f64> {
        let weights = self.weights.as_ref().ok_or(BenchError::ModelNotFitted)?;
        Ok(evaluate(weights, test.view(), self.class_index))
    }
}
