//! Min-max feature scaling

use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

use crate::error::{BenchError, Result};

/// Parameters for one fitted column
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct ScalerParams {
    min: f64,
    // max - min, or 1.0 for a constant column
    scale: f64,
    degenerate: bool,
}

/// Column-wise min-max scaler: `(x - min) / (max - min)`.
///
/// A column whose min equals its max cannot be scaled; it keeps a scale of
/// 1.0 so every value maps to 0.0.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MinMaxScaler {
    params: BTreeMap<usize, ScalerParams>,
    is_fitted: bool,
}

impl MinMaxScaler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fit the scaler to `columns` of `data`
    pub fn fit(&mut self, data: &Array2<f64>, columns: &[usize]) -> Result<&mut Self> {
        if data.nrows() == 0 {
            return Err(BenchError::ValidationError(
                "cannot fit a scaler on an empty matrix".to_string(),
            ));
        }

        for &col in columns {
            if col >= data.ncols() {
                return Err(BenchError::invalid_parameter(
                    "column",
                    col,
                    format!("matrix has {} columns", data.ncols()),
                ));
            }

            let column = data.index_axis(Axis(1), col);
            let (min, max) = column
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
            let range = max - min;
            let degenerate = range == 0.0;
            if degenerate {
                warn!(column = col, value = min, "Constant column, scaling it to 0.0");
            }

            self.params.insert(
                col,
                ScalerParams {
                    min,
                    scale: if degenerate { 1.0 } else { range },
                    degenerate,
                },
            );
        }

        self.is_fitted = true;
        Ok(self)
    }

    /// Scale the fitted columns of `data` in place
    pub fn transform_inplace(&self, data: &mut Array2<f64>) -> Result<()> {
        if !self.is_fitted {
            return Err(BenchError::ModelNotFitted);
        }

        for (&col, params) in &self.params {
            data.column_mut(col)
                .mapv_inplace(|v| (v - params.min) / params.scale);
        }
        Ok(())
    }

    /// Fit and scale in one step
    pub fn fit_transform_inplace(&mut self, data: &mut Array2<f64>, columns: &[usize]) -> Result<()> {
        self.fit(data, columns)?;
        self.transform_inplace(data)
    }

    /// Columns found constant during `fit`
    pub fn degenerate_columns(&self) -> Vec<usize> {
        self.params
            .iter()
            .filter(|(_, p)| p.degenerate)
            .map(|(&col, _)| col)
            .collect()
    }
}
