//! Concurrent k-fold cross-validation
//!
//! One rayon task per fold trains and scores an independent model; the
//! ordered collect is the aggregation point and returns once every fold is
//! done.

use ndarray::Array2;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::perceptron::{evaluate, train_weights, PerceptronConfig};
use super::split::{Fold, Splitter};
use crate::error::{BenchError, Result};

/// Trains a fresh model on a fold's training rows and scores it on the
/// fold's test rows
pub trait FoldEvaluator: Sync {
    fn evaluate_fold(&self, fold: &Fold, class_index: usize) -> Result<f64>;
}

impl FoldEvaluator for PerceptronConfig {
    fn evaluate_fold(&self, fold: &Fold, class_index: usize) -> Result<f64> {
        let weights = train_weights(fold.train.view(), self.learning_rate, self.epochs, class_index)?;
        Ok(evaluate(&weights, fold.test.view(), class_index))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossValidationConfig {
    pub n_folds: usize,
    /// Worker threads; `None` runs on the global rayon pool
    pub n_jobs: Option<usize>,
}

impl Default for CrossValidationConfig {
    fn default() -> Self {
        Self {
            n_folds: 3,
            n_jobs: None,
        }
    }
}

impl CrossValidationConfig {
    pub fn with_folds(mut self, n_folds: usize) -> Self {
        self.n_folds = n_folds;
        self
    }

    pub fn with_n_jobs(mut self, n_jobs: usize) -> Self {
        self.n_jobs = Some(n_jobs);
        self
    }
}

/// Cross-validation results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CVResults {
    /// Score of each fold, in fold order
    pub scores: Vec<f64>,
    /// Mean score across folds
    pub mean_score: f64,
    /// Standard deviation of scores
    pub std_score: f64,
    /// Number of folds
    pub n_folds: usize,
}

impl CVResults {
    /// Create CV results from fold scores
    pub fn from_scores(scores: Vec<f64>) -> Self {
        let n_folds = scores.len();
        let mean_score = scores.iter().sum::<f64>() / n_folds as f64;
        let variance = scores.iter().map(|s| (s - mean_score).powi(2)).sum::<f64>() / n_folds as f64;
        let std_score = variance.sqrt();

        Self {
            scores,
            mean_score,
            std_score,
            n_folds,
        }
    }
}

/// k-fold cross-validator
pub struct CrossValidator<R = ChaCha8Rng> {
    config: CrossValidationConfig,
    splitter: Splitter<R>,
}

impl<R: Rng> CrossValidator<R> {
    pub fn new(config: CrossValidationConfig, splitter: Splitter<R>) -> Self {
        Self { config, splitter }
    }

    /// Split `data` into folds and evaluate each one concurrently
    pub fn run<E: FoldEvaluator>(
        &mut self,
        data: &Array2<f64>,
        class_index: usize,
        evaluator: &E,
    ) -> Result<CVResults> {
        if class_index >= data.ncols() {
            return Err(BenchError::invalid_parameter(
                "class_index",
                class_index,
                format!("rows have {} columns", data.ncols()),
            ));
        }

        let folds = self.splitter.k_fold(data, self.config.n_folds)?;

        let scores = match self.config.n_jobs {
            Some(n_jobs) => {
                let pool = rayon::ThreadPoolBuilder::new().num_threads(n_jobs).build()?;
                pool.install(|| evaluate_folds(&folds, class_index, evaluator))?
            }
            None => evaluate_folds(&folds, class_index, evaluator)?,
        };

        let results = CVResults::from_scores(scores);
        info!(
            folds = results.n_folds,
            mean = results.mean_score,
            std = results.std_score,
            "Cross-validation finished"
        );
        Ok(results)
    }
}

fn evaluate_folds<E: FoldEvaluator>(folds: &[Fold], class_index: usize, evaluator: &E) -> Result<Vec<f64>> {
    folds
        .par_iter()
        .map(|fold| {
            debug!(
                fold = fold.fold_idx,
                train = fold.train.nrows(),
                test = fold.test.nrows(),
                "Fold starting"
            );
            let accuracy = evaluator.evaluate_fold(fold, class_index)?;
            debug!(fold = fold.fold_idx, accuracy, "Fold done");
            Ok(accuracy)
        })
        .collect()
}

/// Mean perceptron accuracy over `n_folds` folds
pub fn run_k_fold<R: Rng>(
    splitter: Splitter<R>,
    data: &Array2<f64>,
    n_folds: usize,
    learning_rate: f64,
    epochs: usize,
    class_index: usize,
) -> Result<f64> {
    let model = PerceptronConfig { learning_rate, epochs };
    model.validate()?;

    let config = CrossValidationConfig::default().with_folds(n_folds);
    let results = CrossValidator::new(config, splitter).run(data, class_index, &model)?;
    Ok(results.mean_score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedScores {
        scores: Vec<f64>,
        calls: AtomicUsize,
    }

    impl FoldEvaluator for FixedScores {
        fn evaluate_fold(&self, fold: &Fold, _class_index: usize) -> Result<f64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.scores[fold.fold_idx])
        }
    }

    struct FailingFold;

    impl FoldEvaluator for FailingFold {
        fn evaluate_fold(&self, fold: &Fold, _class_index: usize) -> Result<f64> {
            if fold.fold_idx == 1 {
                Err(BenchError::ValidationError("boom".to_string()))
            } else {
                Ok(1.0)
            }
        }
    }

    fn data(n: usize) -> Array2<f64> {
        Array2::from_shape_fn((n, 3), |(i, j)| if j == 2 { (i % 2) as f64 } else { i as f64 })
    }

    #[test]
    fn test_mean_of_fold_scores() {
        let evaluator = FixedScores {
            scores: vec![0.5, 0.75, 1.0, 0.25],
            calls: AtomicUsize::new(0),
        };
        let config = CrossValidationConfig::default().with_folds(4);
        let mut cv = CrossValidator::new(config, Splitter::seeded(1));

        let results = cv.run(&data(20), 2, &evaluator).unwrap();

        assert_eq!(evaluator.calls.load(Ordering::SeqCst), 4);
        assert_eq!(results.n_folds, 4);
        assert_eq!(results.scores, vec![0.5, 0.75, 1.0, 0.25]);
        assert!((results.mean_score - 0.625).abs() < 1e-12);
    }

    #[test]
    fn test_dedicated_pool() {
        let evaluator = FixedScores {
            scores: vec![1.0, 0.0, 0.5],
            calls: AtomicUsize::new(0),
        };
        let config = CrossValidationConfig::default().with_folds(3).with_n_jobs(2);
        let mut cv = CrossValidator::new(config, Splitter::seeded(2));

        let results = cv.run(&data(9), 2, &evaluator).unwrap();
        assert_eq!(evaluator.calls.load(Ordering::SeqCst), 3);
        assert!((results.mean_score - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_fold_error_aborts_run() {
        let config = CrossValidationConfig::default().with_folds(3);
        let mut cv = CrossValidator::new(config, Splitter::seeded(3));
        assert!(cv.run(&data(9), 2, &FailingFold).is_err());
    }

    #[test]
    fn test_cv_results_from_scores() {
        let results = CVResults::from_scores(vec![0.8, 0.6]);
        assert!((results.mean_score - 0.7).abs() < 1e-12);
        assert!((results.std_score - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_run_k_fold_perceptron() {
        // label = 1 when the first attribute is positive
        let data = Array2::from_shape_fn((30, 2), |(i, j)| {
            let x = i as f64 - 14.5;
            if j == 0 { x } else if x > 0.0 { 1.0 } else { 0.0 }
        });
        let mean = run_k_fold(Splitter::seeded(11), &data, 3, 0.01, 200, 1).unwrap();
        assert!(mean > 0.9, "mean accuracy {}", mean);
    }
}
