//! End-to-end benchmark drivers
//!
//! [`Evaluator`] owns the random source shared by every split it makes and
//! runs the two pipelines:
//! - KNN: normalize → train/test split → classify each test row → accuracy
//! - Perceptron: normalize → k-fold cross-validation → mean accuracy

mod report;

pub use report::{KNNReport, PerceptronReport};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{BenchError, Result};
use crate::preprocessing::{Normalizer, NormalizerConfig, RawTable};
use crate::training::{CrossValidationConfig, CrossValidator, KNNClassifier, KNNConfig, PerceptronConfig, Splitter};

/// Settings of a KNN benchmark run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KNNBenchmarkConfig {
    pub normalizer: NormalizerConfig,
    pub knn: KNNConfig,
    /// Share of rows used for training
    pub split: f64,
}

impl Default for KNNBenchmarkConfig {
    fn default() -> Self {
        Self {
            normalizer: NormalizerConfig::default(),
            knn: KNNConfig::default(),
            split: 0.6,
        }
    }
}

impl KNNBenchmarkConfig {
    pub fn with_k(mut self, k: usize) -> Self {
        self.knn.n_neighbors = k;
        self
    }

    pub fn with_split(mut self, split: f64) -> Self {
        self.split = split;
        self
    }

    pub fn with_normalizer(mut self, normalizer: NormalizerConfig) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.split) {
            return Err(BenchError::invalid_parameter(
                "split",
                self.split,
                "must be between 0 and 1",
            ));
        }
        if self.knn.n_neighbors == 0 {
            return Err(BenchError::invalid_parameter("k", 0, "must be at least 1"));
        }
        Ok(())
    }
}

/// Settings of a perceptron benchmark run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerceptronBenchmarkConfig {
    pub normalizer: NormalizerConfig,
    pub perceptron: PerceptronConfig,
    pub cross_validation: CrossValidationConfig,
}

impl Default for PerceptronBenchmarkConfig {
    fn default() -> Self {
        Self {
            normalizer: NormalizerConfig::default().with_force_normalize(true),
            perceptron: PerceptronConfig::default(),
            cross_validation: CrossValidationConfig::default(),
        }
    }
}

impl PerceptronBenchmarkConfig {
    pub fn with_folds(mut self, n_folds: usize) -> Self {
        self.cross_validation.n_folds = n_folds;
        self
    }

    pub fn with_perceptron(mut self, perceptron: PerceptronConfig) -> Self {
        self.perceptron = perceptron;
        self
    }

    pub fn with_normalizer(mut self, normalizer: NormalizerConfig) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.perceptron.validate()?;
        if self.cross_validation.n_folds < 2 {
            return Err(BenchError::invalid_parameter(
                "folds",
                self.cross_validation.n_folds,
                "must be at least 2",
            ));
        }
        Ok(())
    }
}

/// Runs benchmarks with one random source
pub struct Evaluator<R = ChaCha8Rng> {
    rng: R,
}

impl Evaluator<ChaCha8Rng> {
    pub fn with_random_state(random_state: Option<u64>) -> Self {
        let rng = match random_state {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self::new(rng)
    }
}

impl<R: Rng> Evaluator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Normalize, split, then classify every test row and compare the
    /// decoded labels
    pub fn run_knn(&mut self, table: &RawTable, config: &KNNBenchmarkConfig) -> Result<KNNReport> {
        config.validate()?;

        let dataset = Normalizer::new(config.normalizer.clone()).normalize(table)?;
        let class_index = dataset.class_index();
        let classes = dataset
            .class_codebook()
            .ok_or_else(|| BenchError::DataError("class column has no codebook".to_string()))?;

        let (train, test) = Splitter::new(&mut self.rng).split(dataset.data(), config.split)?;
        info!(train = train.nrows(), test = test.nrows(), "Split successful");

        if test.nrows() == 0 {
            return Err(BenchError::ValidationError(format!(
                "split {} leaves no rows to test",
                config.split
            )));
        }

        let mut knn = KNNClassifier::new(config.knn.clone());
        knn.fit(&train, class_index)?;

        let mut correct = 0;
        for row in test.rows() {
            let predicted = knn.classify(row, classes)?;
            if predicted == classes.label(row[class_index]) {
                correct += 1;
            }
        }

        let accuracy = correct as f64 / test.nrows() as f64;
        info!(correct, total = test.nrows(), accuracy, "KNN benchmark done");

        Ok(KNNReport {
            k: knn.k(),
            train_size: train.nrows(),
            test_size: test.nrows(),
            correct,
            accuracy,
        })
    }

    /// Normalize, then cross-validate a fresh perceptron per fold
    pub fn run_perceptron(
        &mut self,
        table: &RawTable,
        config: &PerceptronBenchmarkConfig,
    ) -> Result<PerceptronReport> {
        config.validate()?;

        let dataset = Normalizer::new(config.normalizer.clone()).normalize(table)?;

        let mut cv = CrossValidator::new(config.cross_validation.clone(), Splitter::new(&mut self.rng));
        let results = cv.run(dataset.data(), dataset.class_index(), &config.perceptron)?;

        Ok(PerceptronReport {
            n_folds: results.n_folds,
            fold_accuracies: results.scores,
            mean_accuracy: results.mean_score,
        })
    }
}
