//! Data preprocessing module
//!
//! Turns raw string tables into numeric datasets:
//! - Rectangular table validation
//! - Categorical detection and ordinal encoding
//! - Min-max scaling

mod config;
mod encoder;
mod normalizer;
mod scaler;
mod table;

pub use config::NormalizerConfig;
pub use encoder::{Codebook, OrdinalEncoder};
pub use normalizer::Normalizer;
pub use scaler::MinMaxScaler;
pub use table::RawTable;

use serde::{Deserialize, Serialize};

/// How a column is interpreted during normalization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnRole {
    Numeric,
    Categorical,
}
