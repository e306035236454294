//! Held-out regression metrics

/// Coefficient of determination.
///
/// A constant target scores 1.0 when predicted exactly and 0.0 otherwise,
/// keeping the value finite for model comparison.
pub fn r2_score(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    let mean = actual.iter().sum::<f64>() / actual.len() as f64;
    let residual: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p) * (a - p))
        .sum();
    let total: f64 = actual.iter().map(|a| (a - mean) * (a - mean)).sum();

    if total == 0.0 {
        return if residual == 0.0 { 1.0 } else { 0.0 };
    }
    1.0 - residual / total
}

pub fn rmse(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    let mse = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p) * (a - p))
        .sum::<f64>()
        / actual.len() as f64;
    mse.sqrt()
}

pub fn mae(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    actual.iter().zip(predicted).map(|(a, p)| (a - p).abs()).sum::<f64>() / actual.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_and_mean_predictions() {
        let actual = [1.0, 2.0, 3.0];
        assert_eq!(r2_score(&actual, &actual), 1.0);
        assert_eq!(r2_score(&actual, &[2.0, 2.0, 2.0]), 0.0);
        assert_eq!(rmse(&actual, &actual), 0.0);
    }

    #[test]
    fn error_magnitudes() {
        let actual = [0.0, 0.0];
        let predicted = [3.0, -3.0];
        assert_eq!(rmse(&actual, &predicted), 3.0);
        assert_eq!(mae(&actual, &predicted), 3.0);
        assert_eq!(r2_score(&actual, &predicted), 0.0);
        assert_eq!(r2_score(&actual, &actual), 1.0);
    }
}
