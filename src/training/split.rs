//! Random train/test and k-fold partitioning

use ndarray::{Array2, Axis};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::{BenchError, Result};

/// Row indices of a single fold
#[derive(Debug, Clone, PartialEq)]
pub struct FoldIndices {
    pub fold_idx: usize,
    pub train_indices: Vec<usize>,
    pub test_indices: Vec<usize>,
}

/// A single fold with its rows materialized
#[derive(Debug, Clone)]
pub struct Fold {
    pub fold_idx: usize,
    pub train: Array2<f64>,
    pub test: Array2<f64>,
}

/// Dataset splitter driven by an injected random source
#[derive(Debug, Clone)]
pub struct Splitter<R = ChaCha8Rng> {
    rng: R,
}

impl Splitter<ChaCha8Rng> {
    /// Deterministic splitter for reproducible runs
    pub fn seeded(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> Splitter<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Uniformly random permutation of `0..n`
    pub fn permutation(&mut self, n: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..n).collect();
        indices.shuffle(&mut self.rng);
        indices
    }

    /// Shuffle, then give the first `floor(ratio * n)` rows to training
    pub fn train_test_indices(&mut self, n_samples: usize, ratio: f64) -> Result<(Vec<usize>, Vec<usize>)> {
        if !(0.0..=1.0).contains(&ratio) {
            return Err(BenchError::invalid_parameter(
                "split",
                ratio,
                "must be between 0 and 1",
            ));
        }

        let mut indices = self.permutation(n_samples);
        let n_train = ((ratio * n_samples as f64).floor() as usize).min(n_samples);
        let test = indices.split_off(n_train);
        Ok((indices, test))
    }

    /// Split the rows of `data` into `(train, test)`
    pub fn split(&mut self, data: &Array2<f64>, ratio: f64) -> Result<(Array2<f64>, Array2<f64>)> {
        let (train, test) = self.train_test_indices(data.nrows(), ratio)?;
        Ok((data.select(Axis(0), &train), data.select(Axis(0), &test)))
    }

    /// Shuffle once and cut into `k` contiguous folds of `n / k` rows; the
    /// last fold takes the remainder. Training rows of fold `i` are every
    /// other fold in ascending order.
    pub fn k_fold_indices(&mut self, n_samples: usize, n_folds: usize) -> Result<Vec<FoldIndices>> {
        if n_folds < 2 {
            return Err(BenchError::invalid_parameter(
                "folds",
                n_folds,
                "must be at least 2",
            ));
        }
        if n_samples < n_folds {
            return Err(BenchError::ValidationError(format!(
                "n_samples ({}) must be >= n_folds ({})",
                n_samples, n_folds
            )));
        }

        let indices = self.permutation(n_samples);
        let fold_size = n_samples / n_folds;

        let chunks: Vec<&[usize]> = (0..n_folds)
            .map(|i| {
                let start = i * fold_size;
                let end = if i == n_folds - 1 { n_samples } else { start + fold_size };
                &indices[start..end]
            })
            .collect();

        let splits = (0..n_folds)
            .map(|fold_idx| FoldIndices {
                fold_idx,
                train_indices: chunks
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != fold_idx)
                    .flat_map(|(_, chunk)| chunk.iter().copied())
                    .collect(),
                test_indices: chunks[fold_idx].to_vec(),
            })
            .collect();

        Ok(splits)
    }

    /// k-fold partition of the rows of `data`
    pub fn k_fold(&mut self, data: &Array2<f64>, n_folds: usize) -> Result<Vec<Fold>> {
        let splits = self.k_fold_indices(data.nrows(), n_folds)?;
        Ok(splits
            .into_iter()
            .map(|s| Fold {
                fold_idx: s.fold_idx,
                train: data.select(Axis(0), &s.train_indices),
                test: data.select(Axis(0), &s.test_indices),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_sizes() {
        // (ratio, n) pairs
        let cases = [
            (0.2, 6),
            (0.3, 6),
            (0.4, 6),
            (0.5, 6),
            (0.5, 7),
            (0.6, 7),
            (0.7, 7),
            (0.8, 7),
        ];
        let mut splitter = Splitter::seeded(7);

        for (ratio, n) in cases {
            let (train, test) = splitter.train_test_indices(n, ratio).unwrap();
            let expected = (ratio * n as f64).floor() as usize;
            assert_eq!(train.len() + test.len(), n);
            assert_eq!(train.len(), expected, "ratio {} of {}", ratio, n);
        }
    }

    #[test]
    fn test_split_rejects_ratio_above_one() {
        let mut splitter = Splitter::seeded(0);
        assert!(matches!(
            splitter.train_test_indices(10, 1.5),
            Err(BenchError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_split_materializes_rows() {
        let data = Array2::from_shape_fn((10, 2), |(i, j)| (i * 10 + j) as f64);
        let mut splitter = Splitter::seeded(1);
        let (train, test) = splitter.split(&data, 0.6).unwrap();

        assert_eq!(train.nrows(), 6);
        assert_eq!(test.nrows(), 4);
        // rows are moved whole
        for row in train.rows().into_iter().chain(test.rows()) {
            assert_eq!(row[1] - row[0], 1.0);
        }
    }

    #[test]
    fn test_k_fold_last_fold_takes_remainder() {
        let mut splitter = Splitter::seeded(3);
        let splits = splitter.k_fold_indices(11, 3).unwrap();

        let sizes: Vec<usize> = splits.iter().map(|s| s.test_indices.len()).collect();
        assert_eq!(sizes, vec![3, 3, 5]);

        let mut all_test: Vec<usize> = splits.iter().flat_map(|s| s.test_indices.clone()).collect();
        all_test.sort();
        assert_eq!(all_test, (0..11).collect::<Vec<_>>());

        for split in &splits {
            assert_eq!(split.train_indices.len() + split.test_indices.len(), 11);
            assert!(split.test_indices.iter().all(|i| !split.train_indices.contains(i)));
        }
    }

    #[test]
    fn test_k_fold_train_in_ascending_fold_order() {
        let mut splitter = Splitter::seeded(5);
        let splits = splitter.k_fold_indices(9, 3).unwrap();

        let expected: Vec<usize> = splits[0]
            .test_indices
            .iter()
            .chain(splits[2].test_indices.iter())
            .copied()
            .collect();
        assert_eq!(splits[1].train_indices, expected);
    }

    #[test]
    fn test_k_fold_validation() {
        let mut splitter = Splitter::seeded(0);
        assert!(splitter.k_fold_indices(10, 1).is_err());
        assert!(splitter.k_fold_indices(2, 3).is_err());
    }

    #[test]
    fn test_same_seed_same_split() {
        let a = Splitter::seeded(42).permutation(50);
        let b = Splitter::seeded(42).permutation(50);
        assert_eq!(a, b);
    }
}
