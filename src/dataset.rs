//! Normalized numeric dataset shared by both classifiers

use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::preprocessing::{Codebook, ColumnRole};

/// Output of the normalizer: the numeric matrix together with everything
/// needed to interpret it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    data: Array2<f64>,
    class_index: usize,
    roles: Vec<ColumnRole>,
    codebooks: BTreeMap<usize, Codebook>,
    normalized: bool,
}

impl Dataset {
    pub fn new(
        data: Array2<f64>,
        class_index: usize,
        roles: Vec<ColumnRole>,
        codebooks: BTreeMap<usize, Codebook>,
        normalized: bool,
    ) -> Self {
        Self {
            data,
            class_index,
            roles,
            codebooks,
            normalized,
        }
    }

    pub fn data(&self) -> &Array2<f64> {
        &self.data
    }

    pub fn class_index(&self) -> usize {
        self.class_index
    }

    pub fn roles(&self) -> &[ColumnRole] {
        &self.roles
    }

    /// Whether min-max scaling was applied
    pub fn is_normalized(&self) -> bool {
        self.normalized
    }

    pub fn codebook(&self, column: usize) -> Option<&Codebook> {
        self.codebooks.get(&column)
    }

    pub fn class_codebook(&self) -> Option<&Codebook> {
        self.codebook(self.class_index)
    }

    /// Decode a class code back to its label, or `""` if unknown
    pub fn class_label(&self, code: f64) -> &str {
        self.class_codebook().map(|cb| cb.label(code)).unwrap_or("")
    }

    /// Encoded labels, one per row
    pub fn labels(&self) -> ArrayView1<'_, f64> {
        self.data.column(self.class_index)
    }
}
