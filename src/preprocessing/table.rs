//! Raw string tables as read from delimited text

use crate::error::{BenchError, Result};

/// Rectangular table of string cells: ordered rows of ordered columns.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    rows: Vec<Vec<String>>,
    n_cols: usize,
}

impl RawTable {
    /// Build a table, checking that it is non-empty and every row has the
    /// width of the first one.
    pub fn new(rows: Vec<Vec<String>>) -> Result<Self> {
        let n_cols = match rows.first() {
            Some(first) if !first.is_empty() => first.len(),
            Some(_) => return Err(BenchError::DataError("table has no columns".to_string())),
            None => return Err(BenchError::DataError("table has no rows".to_string())),
        };

        if let Some((row, actual)) = rows
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|&(_, len)| len != n_cols)
        {
            return Err(BenchError::MalformedRow {
                row,
                expected: n_cols,
                actual,
            });
        }

        Ok(Self { rows, n_cols })
    }

    /// Convenience constructor from borrowed cells
    pub fn from_str_rows<S: AsRef<str>>(rows: &[Vec<S>]) -> Result<Self> {
        Self::new(
            rows.iter()
                .map(|row| row.iter().map(|c| c.as_ref().to_string()).collect())
                .collect(),
        )
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&[String]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Iterate over the cells of one column, top to bottom
    pub fn column(&self, index: usize) -> impl Iterator<Item = &str> + '_ {
        self.rows.iter().map(move |row| row[index].as_str())
    }
}
