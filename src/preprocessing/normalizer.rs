//! Raw table normalization
//!
//! Detects categorical columns from the first row, encodes them with
//! first-seen ordinal codes, parses the rest as numbers and optionally
//! min-max scales every attribute column.

use ndarray::Array2;
use tracing::{debug, info};

use super::{
    config::NormalizerConfig,
    encoder::OrdinalEncoder,
    scaler::MinMaxScaler,
    table::RawTable,
    ColumnRole,
};
use crate::dataset::Dataset;
use crate::error::{BenchError, Result};

/// Converts a [`RawTable`] into a numeric [`Dataset`]
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    config: NormalizerConfig,
}

impl Normalizer {
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Run the whole pipeline. The input table is left untouched.
    pub fn normalize(&self, table: &RawTable) -> Result<Dataset> {
        let class_index = self.resolve_class_index(table)?;
        info!(class_index, "Class index resolved");

        let (roles, found_categorical) = detect_roles(table, class_index);
        let normalize = self.config.force_normalize || found_categorical;

        let categorical: Vec<usize> = roles
            .iter()
            .enumerate()
            .filter(|(_, role)| **role == ColumnRole::Categorical)
            .map(|(idx, _)| idx)
            .collect();
        debug!(columns = ?categorical, "Categorical columns detected");

        let mut encoder = OrdinalEncoder::new();
        encoder.fit(table, &categorical);

        let mut data = parse_matrix(table, &roles, &encoder)?;

        if normalize {
            let attributes: Vec<usize> = (0..table.n_cols()).filter(|&c| c != class_index).collect();
            MinMaxScaler::new().fit_transform_inplace(&mut data, &attributes)?;
        }

        info!(
            rows = data.nrows(),
            cols = data.ncols(),
            normalized = normalize,
            "Normalization done"
        );

        Ok(Dataset::new(
            data,
            class_index,
            roles,
            encoder.into_codebooks(),
            normalize,
        ))
    }

    fn resolve_class_index(&self, table: &RawTable) -> Result<usize> {
        let n_cols = table.n_cols();
        match self.config.class_index {
            None => Ok(n_cols - 1),
            Some(idx) if idx < n_cols => Ok(idx),
            Some(idx) => Err(BenchError::invalid_parameter(
                "class_index",
                idx,
                format!("table has {} columns", n_cols),
            )),
        }
    }
}

/// Classify columns from the first row. The class column is always
/// categorical and does not count towards enabling scaling.
fn detect_roles(table: &RawTable, class_index: usize) -> (Vec<ColumnRole>, bool) {
    let mut found_categorical = false;
    let first = table.rows().first().map(Vec::as_slice).unwrap_or_default();

    let roles = first
        .iter()
        .enumerate()
        .map(|(idx, cell)| {
            if idx == class_index {
                ColumnRole::Categorical
            } else if cell.parse::<f64>().is_ok() {
                ColumnRole::Numeric
            } else {
                found_categorical = true;
                ColumnRole::Categorical
            }
        })
        .collect();

    (roles, found_categorical)
}

fn parse_matrix(table: &RawTable, roles: &[ColumnRole], encoder: &OrdinalEncoder) -> Result<Array2<f64>> {
    let mut flat = Vec::with_capacity(table.n_rows() * table.n_cols());

    for (row_idx, row) in table.rows().iter().enumerate() {
        for (col_idx, cell) in row.iter().enumerate() {
            let value = match roles[col_idx] {
                // every value was seen while fitting, so a miss cannot happen
                ColumnRole::Categorical => encoder.encode(col_idx, cell).unwrap_or(0.0),
                ColumnRole::Numeric => cell.parse::<f64>().map_err(|_| BenchError::ParseFailure {
                    row: row_idx,
                    column: col_idx,
                    value: cell.clone(),
                })?,
            };
            flat.push(value);
        }
    }

    Ok(Array2::from_shape_vec((table.n_rows(), table.n_cols()), flat)?)
}
