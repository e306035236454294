//! Bagged regression trees

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::error::{AnalysisError, Result};
use crate::model::tree::{normalize_importances, RegressionTree, TreeParams};

#[derive(Debug, Clone)]
pub struct RandomForest {
    trees: Vec<RegressionTree>,
}

impl RandomForest {
    /// Each tree sees a bootstrap sample drawn from its own seeded stream,
    /// so the forest is identical however the pool schedules the fits
    pub fn fit(x: &Array2<f64>, y: &[f64], n_trees: usize, params: TreeParams, seed: u64) -> Result<Self> {
        if n_trees == 0 {
            return Err(AnalysisError::DataShape("a forest needs at least one tree".into()));
        }

        let n = y.len();
        let trees = (0..n_trees)
            .into_par_iter()
            .map(|t| {
                let mut rng = StdRng::seed_from_u64(seed.wrapping_add(t as u64));
                let rows: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n.max(1))).collect();
                RegressionTree::fit(x, y, &rows, params)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { trees })
    }

    pub fn predict(&self, x: &Array2<f64>) -> Vec<f64> {
        let scale = 1.0 / self.trees.len() as f64;
        x.rows()
            .into_iter()
            .map(|row| self.trees.iter().map(|tree| tree.predict_row(row)).sum::<f64>() * scale)
            .collect()
    }

    /// Mean of the per-tree normalized importances
    pub fn feature_importances(&self) -> Vec<f64> {
        let Some(first) = self.trees.first() else {
            return Vec::new();
        };

        let mut totals = vec![0.0; first.raw_gains().len()];
        for tree in &self.trees {
            for (total, value) in totals.iter_mut().zip(tree.feature_importances()) {
                *total += value;
            }
        }
        normalize_importances(totals)
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear_data() -> (Array2<f64>, Vec<f64>) {
        let x = Array2::from_shape_fn((40, 2), |(i, j)| if j == 0 { i as f64 } else { (i % 3) as f64 });
        let y = (0..40).map(|i| 3.0 * i as f64).collect();
        (x, y)
    }

    const PARAMS: TreeParams = TreeParams {
        max_depth: 10,
        min_samples_split: 2,
    };

    #[test]
    fn same_seed_same_forest() {
        let (x, y) = linear_data();
        let a = RandomForest::fit(&x, &y, 10, PARAMS, 42).unwrap();
        let b = RandomForest::fit(&x, &y, 10, PARAMS, 42).unwrap();
        assert_eq!(a.predict(&x), b.predict(&x));
        assert_eq!(a.tree_count(), 10);
    }

    #[test]
    fn importance_follows_the_signal() {
        let (x, y) = linear_data();
        let forest = RandomForest::fit(&x, &y, 20, PARAMS, 7).unwrap();
        let importances = forest.feature_importances();
        assert!(importances[0] > importances[1]);
        assert!((importances.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn zero_trees_is_rejected() {
        let (x, y) = linear_data();
        assert!(RandomForest::fit(&x, &y, 0, PARAMS, 1).is_err());
    }
}
