//! Model training module
//!
//! Provides the two benchmarked classifiers and the splitting machinery:
//! - Train/test and k-fold splitting with an injected random source
//! - K-Nearest Neighbors (majority vote, Euclidean distance)
//! - Perceptron (online updates, sign activation)
//! - Concurrent k-fold cross-validation

pub mod cross_validation;
pub mod knn;
pub mod perceptron;
pub mod split;

pub use cross_validation::{run_k_fold, CVResults, CrossValidationConfig, CrossValidator, FoldEvaluator};
pub use knn::{euclidean_distance, KNNClassifier, KNNConfig, Neighbour};
pub use perceptron::{Perceptron, PerceptronConfig};
pub use split::{Fold, FoldIndices, Splitter};
