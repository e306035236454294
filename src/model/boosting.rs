//! Gradient-boosted regression trees on squared loss.
//!
//! Starts from the target mean and fits each round's tree to the current
//! residuals, shrunk by the learning rate.

use ndarray::Array2;

use crate::error::{AnalysisError, Result};
use crate::model::tree::{normalize_importances, RegressionTree, TreeParams};

#[derive(Debug, Clone)]
pub struct GradientBoosting {
    base: f64,
    learning_rate: f64,
    trees: Vec<RegressionTree>,
}

impl GradientBoosting {
    pub fn fit(
        x: &Array2<f64>,
        y: &[f64],
        rounds: usize,
        learning_rate: f64,
        params: TreeParams,
    ) -> Result<Self> {
        if y.is_empty() {
            return Err(AnalysisError::DataShape("cannot boost on zero rows".into()));
        }
        if learning_rate.is_nan() || learning_rate <= 0.0 {
            return Err(AnalysisError::Training {
                model: "gradient_boosting".into(),
                message: format!("learning rate must be positive, got {}", learning_rate),
            });
        }

        let base = y.iter().sum::<f64>() / y.len() as f64;
        let rows: Vec<usize> = (0..y.len()).collect();
        let mut fitted = vec![base; y.len()];
        let mut trees = Vec::with_capacity(rounds);

        for round in 0..rounds {
            let residuals: Vec<f64> = y.iter().zip(&fitted).map(|(t, f)| t - f).collect();
            if residuals.iter().all(|r| r.abs() < 1e-12) {
                log::debug!("Boosting stopped after {} rounds: residuals vanished", round);
                break;
            }

            let tree = RegressionTree::fit(x, &residuals, &rows, params)?;
            for (value, row) in fitted.iter_mut().zip(x.rows()) {
                *value += learning_rate * tree.predict_row(row);
            }
            trees.push(tree);
        }

        Ok(Self {
            base,
            learning_rate,
            trees,
        })
    }

    pub fn predict(&self, x: &Array2<f64>) -> Vec<f64> {
        x.rows()
            .into_iter()
            .map(|row| {
                self.base
                    + self.learning_rate
                        * self.trees.iter().map(|tree| tree.predict_row(row)).sum::<f64>()
            })
            .collect()
    }

    /// Rounds actually fitted; fewer than requested once residuals vanish
    pub fn round_count(&self) -> usize {
        self.trees.len()
    }

    /// Squared-error reduction summed over every round, normalized
    pub fn feature_importances(&self) -> Vec<f64> {
        let Some(first) = self.trees.first() else {
            return Vec::new();
        };

        let mut totals = vec![0.0; first.raw_gains().len()];
        for tree in &self.trees {
            for (total, gain) in totals.iter_mut().zip(tree.raw_gains()) {
                *total += gain;
            }
        }
        normalize_importances(totals)
    }
}
