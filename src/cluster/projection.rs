//! Two-component principal projection for plotting.
//!
//! Leading eigenvectors of the covariance matrix are found by power
//! iteration with deflation. Each component's sign is fixed so its largest
//! loading is positive, which keeps coordinates stable across runs.

use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

const MAX_ITERATIONS: usize = 1000;
const TOLERANCE: f64 = 1e-10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    /// One (x, y) pair per input row
    pub coordinates: Vec<(f64, f64)>,
    /// Share of total variance captured by each axis
    pub explained_variance_ratio: [f64; 2],
}

/// Project rows onto their first two principal components
pub fn project_2d(data: &Array2<f64>) -> Projection {
    let (n, p) = data.dim();
    if n == 0 || p == 0 {
        return Projection {
            coordinates: vec![(0.0, 0.0); n],
            explained_variance_ratio: [0.0; 2],
        };
    }

    let mean = data.mean_axis(Axis(0)).unwrap_or_else(|| Array1::zeros(p));
    let centered = data - &mean;
    let denominator = (n.max(2) - 1) as f64;
    let mut covariance = centered.t().dot(&centered) / denominator;
    let total_variance = covariance.diag().sum();

    let mut axes = Vec::with_capacity(2);
    let mut ratios = [0.0; 2];

    for ratio in ratios.iter_mut().take(p.min(2)) {
        let (value, vector) = leading_eigenpair(&covariance);

        // Rounding residue left by deflation is not a direction
        if value <= total_variance * 1e-12 {
            axes.push(Array1::zeros(p));
            continue;
        }
        *ratio = value / total_variance;

        // Remove the found direction before the next pass
        let outer = vector
            .view()
            .insert_axis(Axis(1))
            .dot(&vector.view().insert_axis(Axis(0)));
        covariance = covariance - outer * value;
        axes.push(vector);
    }

    let coordinates = centered
        .rows()
        .into_iter()
        .map(|row| {
            let x = axes.first().map_or(0.0, |axis| row.dot(axis));
            let y = axes.get(1).map_or(0.0, |axis| row.dot(axis));
            (x, y)
        })
        .collect();

    Projection {
        coordinates,
        explained_variance_ratio: ratios,
    }
}

/// Largest eigenvalue and its unit eigenvector of a symmetric PSD matrix
fn leading_eigenpair(matrix: &Array2<f64>) -> (f64, Array1<f64>) {
    let p = matrix.nrows();
    let mut vector = Array1::from_elem(p, 1.0 / (p as f64).sqrt());

    // A start vector orthogonal to the dominant direction would stall;
    // retry from each basis vector in turn
    for start in 0..=p {
        if start > 0 {
            vector = Array1::zeros(p);
            vector[start - 1] = 1.0;
        }

        if let Some(found) = iterate(matrix, vector.clone()) {
            let value = found.dot(&matrix.dot(&found));
            return (value.max(0.0), orient(found));
        }
    }

    (0.0, Array1::zeros(p))
}

fn iterate(matrix: &Array2<f64>, mut vector: Array1<f64>) -> Option<Array1<f64>> {
    for _ in 0..MAX_ITERATIONS {
        let next = matrix.dot(&vector);
        let norm = next.dot(&next).sqrt();
        if norm <= f64::EPSILON {
            return None;
        }
        let next = next / norm;
        let change = (&next - &vector).mapv(f64::abs).sum();
        vector = next;
        if change < TOLERANCE {
            break;
        }
    }
    Some(vector)
}

/// Flip so the largest-magnitude loading is positive
fn orient(vector: Array1<f64>) -> Array1<f64> {
    let pivot = vector
        .iter()
        .copied()
        .fold(0.0_f64, |best, v| if v.abs() > best.abs() { v } else { best });
    if pivot < 0.0 {
        -vector
    } else {
        vector
    }
}
