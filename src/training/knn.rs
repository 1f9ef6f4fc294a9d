//! K-Nearest Neighbors implementation
//!
//! Majority-vote classifier over Euclidean distance. The class column stays
//! inside each row and is skipped when measuring distance.

use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::error::{BenchError, Result};
use crate::preprocessing::Codebook;

/// KNN configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KNNConfig {
    /// Number of neighbors
    pub n_neighbors: usize,
}

impl Default for KNNConfig {
    fn default() -> Self {
        Self { n_neighbors: 3 }
    }
}

/// Distance and label of one training row, relative to a query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbour {
    pub distance: f64,
    pub label: f64,
}

/// K-Nearest Neighbors Classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KNNClassifier {
    config: KNNConfig,
    x_train: Option<Array2<f64>>,
    class_index: usize,
}

impl KNNClassifier {
    pub fn new(config: KNNConfig) -> Self {
        Self {
            config,
            x_train: None,
            class_index: 0,
        }
    }

    /// Create with default config and specified k
    pub fn with_k(k: usize) -> Self {
        Self::new(KNNConfig { n_neighbors: k })
    }

    pub fn k(&self) -> usize {
        self.config.n_neighbors
    }

    /// Fit the classifier (stores training rows, labels included)
    pub fn fit(&mut self, x: &Array2<f64>, class_index: usize) -> Result<&mut Self> {
        let k = self.config.n_neighbors;
        if x.nrows() == 0 {
            return Err(BenchError::ValidationError("training set is empty".to_string()));
        }
        if k == 0 || k > x.nrows() {
            return Err(BenchError::invalid_parameter(
                "k",
                k,
                format!("must be between 1 and the training set size ({})", x.nrows()),
            ));
        }
        if class_index >= x.ncols() {
            return Err(BenchError::invalid_parameter(
                "class_index",
                class_index,
                format!("rows have {} columns", x.ncols()),
            ));
        }

        self.x_train = Some(x.clone());
        self.class_index = class_index;
        Ok(self)
    }

    /// The k nearest training rows, nearest first. Equal distances keep
    /// training set order.
    pub fn neighbours(&self, query: ArrayView1<'_, f64>) -> Result<Vec<Neighbour>> {
        let x_train = self.x_train.as_ref().ok_or(BenchError::ModelNotFitted)?;
        if query.len() != x_train.ncols() {
            return Err(BenchError::ValidationError(format!(
                "query has {} columns, training rows have {}",
                query.len(),
                x_train.ncols()
            )));
        }

        let mut neighbours: Vec<Neighbour> = x_train
            .rows()
            .into_iter()
            .map(|row| Neighbour {
                distance: euclidean_distance(row, query, self.class_index),
                label: row[self.class_index],
            })
            .collect();

        neighbours.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        neighbours.truncate(self.config.n_neighbors);
        Ok(neighbours)
    }

    /// Predict the class code of one row
    pub fn predict_row(&self, query: ArrayView1<'_, f64>) -> Result<f64> {
        let neighbours = self.neighbours(query)?;
        Ok(vote(&neighbours))
    }

    /// Predict class codes for every row of `x`
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        x.rows()
            .into_iter()
            .map(|row| self.predict_row(row))
            .collect::<Result<Vec<_>>>()
            .map(Array1::from_vec)
    }

    /// Predict and decode the label through the class codebook
    pub fn classify(&self, query: ArrayView1<'_, f64>, classes: &Codebook) -> Result<String> {
        let code = self.predict_row(query)?;
        Ok(classes.label(code).to_string())
    }
}

/// Euclidean distance over every column except `class_index`
pub fn euclidean_distance(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>, class_index: usize) -> f64 {
    a.iter()
        .zip(b.iter())
        .enumerate()
        .filter(|(i, _)| *i != class_index)
        .map(|(_, (ai, bi))| {
            let d = ai - bi;
            d * d
        })
        .sum::<f64>()
        .sqrt()
}

/// Majority vote, walking the neighbours nearest first. A label takes the
/// lead only by strictly beating the current count, so ties go to the label
/// that reached the top count first.
fn vote(neighbours: &[Neighbour]) -> f64 {
    if let [only] = neighbours {
        return only.label;
    }

    let mut tally: Vec<(f64, usize)> = Vec::with_capacity(neighbours.len());
    let mut winner = 0.0;
    let mut best = 0;

    for n in neighbours {
        let pos = tally.iter().position(|(label, _)| *label == n.label);
        let count = match pos {
            Some(pos) => {
                tally[pos].1 += 1;
                tally[pos].1
            }
            None => {
                tally.push((n.label, 1));
                1
            }
        };
        if count > best {
            best = count;
            winner = n.label;
        }
    }

    winner
}
