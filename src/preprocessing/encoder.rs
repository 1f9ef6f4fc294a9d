//! Ordinal encoding of categorical columns

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use super::table::RawTable;

/// Mapping of the distinct values of one column to ordinal codes.
///
/// Codes are assigned in first-seen order starting at 0, so a codebook with
/// `n` entries uses exactly the codes `0.0..n`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Codebook {
    categories: Vec<String>,
    mapping: HashMap<String, usize>,
}

impl Codebook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the code of `value`, assigning the next one if unseen
    pub fn insert(&mut self, value: &str) -> f64 {
        if let Some(&idx) = self.mapping.get(value) {
            return idx as f64;
        }
        let idx = self.categories.len();
        self.categories.push(value.to_string());
        self.mapping.insert(value.to_string(), idx);
        idx as f64
    }

    pub fn encode(&self, value: &str) -> Option<f64> {
        self.mapping.get(value).map(|&idx| idx as f64)
    }

    /// Reverse lookup of a code
    pub fn decode(&self, code: f64) -> Option<&str> {
        if code < 0.0 || code.fract() != 0.0 {
            return None;
        }
        self.categories.get(code as usize).map(String::as_str)
    }

    /// Like [`Codebook::decode`] but falls back to the empty string
    pub fn label(&self, code: f64) -> &str {
        self.decode(code).unwrap_or("")
    }

    /// Categories in code order
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Ordinal encoder holding one codebook per categorical column index
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrdinalEncoder {
    codebooks: BTreeMap<usize, Codebook>,
    is_fitted: bool,
}

impl OrdinalEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the codebooks of `columns` from every row of `table`, in row order
    pub fn fit(&mut self, table: &RawTable, columns: &[usize]) -> &mut Self {
        for &col in columns {
            let codebook = self.codebooks.entry(col).or_default();
            for value in table.column(col) {
                codebook.insert(value);
            }
        }
        self.is_fitted = true;
        self
    }

    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }

    pub fn is_categorical(&self, column: usize) -> bool {
        self.codebooks.contains_key(&column)
    }

    /// Encode a single cell; `None` if the column is not categorical or the
    /// value was never seen during `fit`
    pub fn encode(&self, column: usize, value: &str) -> Option<f64> {
        self.codebooks.get(&column).and_then(|cb| cb.encode(value))
    }

    pub fn codebook(&self, column: usize) -> Option<&Codebook> {
        self.codebooks.get(&column)
    }

    pub fn into_codebooks(self) -> BTreeMap<usize, Codebook> {
        self.codebooks
    }
}
