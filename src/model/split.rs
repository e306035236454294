//! Seeded train/test partitioning

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::{AnalysisError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainTestSplit {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Shuffle row indices with `seed` and hold out `ceil(n * test_fraction)`
/// of them, keeping at least one row on each side.
pub fn train_test_split(n: usize, test_fraction: f64, seed: u64) -> Result<TrainTestSplit> {
    if n < 2 {
        return Err(AnalysisError::DataShape(format!(
            "need at least 2 samples to split into train and test sets, got {}",
            n
        )));
    }
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(AnalysisError::DataShape(format!(
            "test fraction must lie strictly between 0 and 1, got {}",
            test_fraction
        )));
    }

    let test_size = ((n as f64 * test_fraction).ceil() as usize).clamp(1, n - 1);

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let train = indices.split_off(test_size);
    Ok(TrainTestSplit {
        train,
        test: indices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_follow_the_fraction() {
        let split = train_test_split(10, 0.2, 42).unwrap();
        assert_eq!(split.test.len(), 2);
        assert_eq!(split.train.len(), 8);

        let mut all: Vec<usize> = split.train.iter().chain(&split.test).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn two_samples_split_one_and_one() {
        let split = train_test_split(2, 0.2, 42).unwrap();
        assert_eq!((split.train.len(), split.test.len()), (1, 1));
    }

    #[test]
    fn single_sample_is_a_shape_error() {
        assert!(matches!(train_test_split(1, 0.2, 42), Err(AnalysisError::DataShape(_))));
    }

    #[test]
    fn seeded_split_is_repeatable() {
        assert_eq!(train_test_split(50, 0.3, 9).unwrap(), train_test_split(50, 0.3, 9).unwrap());
    }
}
