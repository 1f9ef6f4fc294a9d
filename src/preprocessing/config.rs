//! Normalizer configuration

use serde::{Deserialize, Serialize};

/// Configuration for turning a raw table into a numeric dataset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizerConfig {
    /// Label column. Defaults to the last column when unset.
    pub class_index: Option<usize>,

    /// Min-max scale every attribute even when no categorical
    /// attribute was found
    pub force_normalize: bool,
}

impl NormalizerConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the class column
    pub fn with_class_index(mut self, class_index: usize) -> Self {
        self.class_index = Some(class_index);
        self
    }

    /// Builder method to force min-max scaling
    pub fn with_force_normalize(mut self, force: bool) -> Self {
        self.force_normalize = force;
        self
    }
}
