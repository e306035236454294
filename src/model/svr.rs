//! Epsilon-insensitive support-vector regression with an RBF kernel.
//!
//! The dual is solved by cyclic coordinate descent. The intercept is folded
//! into the kernel (`K + 1`), which removes the equality constraint and
//! leaves box constraints `-C <= beta_i <= C` only.

use ndarray::{Array2, ArrayView1, Axis};

use crate::error::{AnalysisError, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SvrParams {
    pub c: f64,
    pub epsilon: f64,
    /// `None` picks 1 / (n_features * variance of the training matrix)
    pub gamma: Option<f64>,
    pub max_iterations: usize,
    pub tolerance: f64,
}

#[derive(Debug, Clone)]
pub struct SupportVectorRegressor {
    support: Array2<f64>,
    coefficients: Vec<f64>,
    gamma: f64,
}

impl SupportVectorRegressor {
    pub fn fit(x: &Array2<f64>, y: &[f64], params: SvrParams) -> Result<Self> {
        let n = x.nrows();
        if n == 0 || n != y.len() {
            return Err(AnalysisError::DataShape(format!(
                "support-vector regression needs matching non-empty inputs, got {} rows and {} targets",
                n,
                y.len()
            )));
        }
        if params.c.is_nan() || params.c <= 0.0 {
            return Err(AnalysisError::Training {
                model: "support_vector".into(),
                message: format!("C must be positive, got {}", params.c),
            });
        }

        let gamma = params.gamma.unwrap_or_else(|| scale_gamma(x));

        // rbf(x, x) = 1, so every diagonal entry of K + 1 is 2
        let diagonal = 2.0;
        let mut beta = vec![0.0; n];
        // (K + 1) * beta, kept in sync with every coordinate update
        let mut fitted = vec![0.0; n];
        let mut converged = false;

        for sweep in 0..params.max_iterations {
            let mut largest_step: f64 = 0.0;

            for i in 0..n {
                let gradient = fitted[i] - y[i];
                let z = beta[i] - gradient / diagonal;
                let shrunk = z.signum() * (z.abs() - params.epsilon / diagonal).max(0.0);
                let updated = shrunk.clamp(-params.c, params.c);

                let step = updated - beta[i];
                if step != 0.0 {
                    // Kernel rows are recomputed on demand; memory stays linear in n
                    let row = x.row(i);
                    for (value, other) in fitted.iter_mut().zip(x.rows()) {
                        *value += step * (rbf(row, other, gamma) + 1.0);
                    }
                    beta[i] = updated;
                    largest_step = largest_step.max(step.abs());
                }
            }

            if largest_step < params.tolerance {
                log::debug!("SVR converged after {} sweeps", sweep + 1);
                converged = true;
                break;
            }
        }

        if !converged {
            log::debug!("SVR stopped at the {} sweep cap", params.max_iterations);
        }

        let support_rows: Vec<usize> = (0..n).filter(|&i| beta[i] != 0.0).collect();
        let support = x.select(Axis(0), &support_rows);
        let coefficients = support_rows.iter().map(|&i| beta[i]).collect();

        Ok(Self {
            support,
            coefficients,
            gamma,
        })
    }

    pub fn predict(&self, x: &Array2<f64>) -> Vec<f64> {
        x.rows()
            .into_iter()
            .map(|row| {
                self.support
                    .rows()
                    .into_iter()
                    .zip(&self.coefficients)
                    .map(|(sv, beta)| beta * (rbf(sv, row, self.gamma) + 1.0))
                    .sum::<f64>()
            })
            .collect()
    }

    pub fn support_vector_count(&self) -> usize {
        self.coefficients.len()
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }
}

fn rbf(a: ArrayView1<f64>, b: ArrayView1<f64>, gamma: f64) -> f64 {
    let distance: f64 = a.iter().zip(b.iter()).map(|(p, q)| (p - q) * (p - q)).sum();
    (-gamma * distance).exp()
}

/// 1 / (n_features * var(X)) over every matrix entry; 1.0 for a constant matrix
fn scale_gamma(x: &Array2<f64>) -> f64 {
    let variance = x.var(0.0);
    if variance > 0.0 && variance.is_finite() {
        1.0 / (x.ncols() as f64 * variance)
    } else {
        1.0
    }
}
