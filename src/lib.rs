//! ml-bench - Classic classifier benchmarks over delimited tables
//!
//! This crate provides:
//! - Loading of delimited text tables with every cell kept as a string
//! - Normalization: ordinal encoding of categorical columns and min-max
//!   scaling of attributes
//! - A k-nearest-neighbours classifier evaluated on a random train/test split
//! - A single-layer perceptron evaluated with concurrent k-fold
//!   cross-validation
//!
//! # Modules
//!
//! - [`preprocessing`] - Raw tables, encoding, scaling, normalization
//! - [`dataset`] - The numeric matrix produced by normalization
//! - [`training`] - Splitting, KNN, perceptron, cross-validation
//! - [`evaluation`] - End-to-end benchmark drivers and reports
//! - [`utils`] - CSV loading and timing
//! - [`cli`] - Command-line interface

// Core error handling
pub mod error;

// Core ML modules
pub mod dataset;
pub mod preprocessing;
pub mod training;
pub mod evaluation;

// Utilities
pub mod utils;

// Services
pub mod cli;

pub use error::{BenchError, Result};

/// Re-export commonly used types
pub mod prelude {
    // Error handling
    pub use crate::error::{BenchError, Result};

    // Preprocessing
    pub use crate::dataset::Dataset;
    pub use crate::preprocessing::{ColumnRole, Codebook, Normalizer, NormalizerConfig, RawTable};

    // Training
    pub use crate::training::{
        run_k_fold, CrossValidationConfig, CrossValidator, FoldEvaluator, KNNClassifier, KNNConfig,
        Perceptron, PerceptronConfig, Splitter,
    };

    // Evaluation
    pub use crate::evaluation::{
        Evaluator, KNNBenchmarkConfig, KNNReport, PerceptronBenchmarkConfig, PerceptronReport,
    };

    // Utilities
    pub use crate::utils::DataLoader;
}
