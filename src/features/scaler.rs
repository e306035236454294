//! Population z-score standardization.
//!
//! Fitting produces plain parameters that callers pass along explicitly;
//! nothing is cached between calls.

use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// Per-column mean and scale learned from one matrix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalerParams {
    pub mean: Vec<f64>,
    /// Population standard deviation, 1.0 for constant columns
    pub scale: Vec<f64>,
}

/// Fit column means and population standard deviations
pub fn fit_scaler(data: &Array2<f64>) -> ScalerParams {
    let columns = data.ncols();
    if data.nrows() == 0 {
        return ScalerParams {
            mean: vec![0.0; columns],
            scale: vec![1.0; columns],
        };
    }

    let mut mean = Vec::with_capacity(columns);
    let mut scale = Vec::with_capacity(columns);

    for column in data.axis_iter(Axis(1)) {
        mean.push(column.iter().mean());
        let std = column.iter().population_std_dev();
        scale.push(if std > 0.0 && std.is_finite() { std } else { 1.0 });
    }

    ScalerParams { mean, scale }
}

impl ScalerParams {
    pub fn transform(&self, data: &Array2<f64>) -> Array2<f64> {
        let mut scaled = data.clone();
        for (j, mut column) in scaled.axis_iter_mut(Axis(1)).enumerate() {
            column.mapv_inplace(|x| (x - self.mean[j]) / self.scale[j]);
        }
        scaled
    }

    pub fn fit_transform(data: &Array2<f64>) -> (Self, Array2<f64>) {
        let params = fit_scaler(data);
        let scaled = params.transform(data);
        (params, scaled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn standardizes_with_population_deviation() {
        let data = array![[1.0, 5.0], [3.0, 5.0]];
        let (params, scaled) = ScalerParams::fit_transform(&data);

        assert_eq!(params.mean, vec![2.0, 5.0]);
        assert_eq!(params.scale, vec![1.0, 1.0]);
        assert_eq!(scaled, array![[-1.0, 0.0], [1.0, 0.0]]);
    }

    #[test]
    fn test_rows_use_training_parameters() {
        let train = array![[0.0], [4.0]];
        let params = fit_scaler(&train);
        let test = params.transform(&array![[6.0]]);
        assert_eq!(test[[0, 0]], 2.0);
    }
}
