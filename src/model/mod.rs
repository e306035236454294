//! Citation prediction ensemble.
//!
//! Every configured regressor is trained on the same seeded split and
//! standardization, independently and in parallel. A model that fails is
//! recorded and skipped; the ensemble fails only when none succeeds.

#[cfg(feature = "boosting")]
pub mod boosting;
pub mod evaluation;
pub mod forest;
pub mod split;
pub mod svr;
pub mod tree;

use itertools::Itertools;
use ndarray::{Array2, Axis};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::{ModelKind, PredictionConfig};
use crate::error::{AnalysisError, Result};
use crate::features::{citation_targets, feature_matrix, AuthorFeatureVector, Feature, ScalerParams};

pub use split::{train_test_split, TrainTestSplit};

use forest::RandomForest;
use svr::{SupportVectorRegressor, SvrParams};
use tree::{RegressionTree, TreeParams};

/// A fitted regressor of one of the supported kinds
#[derive(Debug, Clone)]
pub enum TrainedModel {
    RandomForest(RandomForest),
    #[cfg(feature = "boosting")]
    GradientBoosting(boosting::GradientBoosting),
    DecisionTree(RegressionTree),
    SupportVector(SupportVectorRegressor),
}

impl TrainedModel {
    /// Fit `kind` on an already standardized training matrix
    pub fn train(kind: ModelKind, x: &Array2<f64>, y: &[f64], config: &PredictionConfig) -> Result<Self> {
        let tree_params = TreeParams {
            max_depth: config.max_depth,
            min_samples_split: config.min_samples_split,
        };

        match kind {
            ModelKind::RandomForest => Ok(TrainedModel::RandomForest(RandomForest::fit(
                x,
                y,
                config.forest_trees,
                tree_params,
                config.seed,
            )?)),
            ModelKind::GradientBoosting => Self::train_boosting(x, y, config, tree_params),
            ModelKind::DecisionTree => {
                let rows: Vec<usize> = (0..y.len()).collect();
                Ok(TrainedModel::DecisionTree(RegressionTree::fit(x, y, &rows, tree_params)?))
            }
            ModelKind::SupportVector => Ok(TrainedModel::SupportVector(SupportVectorRegressor::fit(
                x,
                y,
                SvrParams {
                    c: config.svr_c,
                    epsilon: config.svr_epsilon,
                    gamma: config.svr_gamma,
                    max_iterations: config.svr_max_iterations,
                    tolerance: config.svr_tolerance,
                },
            )?)),
        }
    }

    #[cfg(feature = "boosting")]
    fn train_boosting(x: &Array2<f64>, y: &[f64], config: &PredictionConfig, params: TreeParams) -> Result<Self> {
        Ok(TrainedModel::GradientBoosting(boosting::GradientBoosting::fit(
            x,
            y,
            config.boosting_rounds,
            config.learning_rate,
            params,
        )?))
    }

    #[cfg(not(feature = "boosting"))]
    fn train_boosting(_x: &Array2<f64>, _y: &[f64], _config: &PredictionConfig, _params: TreeParams) -> Result<Self> {
        Err(AnalysisError::LibraryUnavailable("gradient boosting"))
    }

    pub fn predict(&self, x: &Array2<f64>) -> Vec<f64> {
        match self {
            TrainedModel::RandomForest(model) => model.predict(x),
            #[cfg(feature = "boosting")]
            TrainedModel::GradientBoosting(model) => model.predict(x),
            TrainedModel::DecisionTree(model) => model.predict(x),
            TrainedModel::SupportVector(model) => model.predict(x),
        }
    }

    /// Short size description for debug logging
    pub fn describe(&self) -> String {
        match self {
            TrainedModel::RandomForest(model) => format!("{} trees", model.tree_count()),
            #[cfg(feature = "boosting")]
            TrainedModel::GradientBoosting(model) => format!("{} boosting rounds", model.round_count()),
            TrainedModel::DecisionTree(model) => format!("depth {}", model.depth()),
            TrainedModel::SupportVector(model) => format!("{} support vectors", model.support_vector_count()),
        }
    }

    /// Impurity importances for tree-based models; `None` otherwise
    pub fn feature_importances(&self) -> Option<Vec<f64>> {
        match self {
            TrainedModel::RandomForest(model) => Some(model.feature_importances()),
            #[cfg(feature = "boosting")]
            TrainedModel::GradientBoosting(model) => Some(model.feature_importances()),
            TrainedModel::DecisionTree(model) => Some(model.feature_importances()),
            TrainedModel::SupportVector(_) => None,
        }
    }
}

/// Held-out performance of one trained model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelResult {
    pub model: ModelKind,
    pub r2_score: f64,
    pub rmse: f64,
    pub mae: f64,
    /// Predictions for the test rows, aligned with `PredictionReport::actual`
    pub predictions: Vec<f64>,
    pub feature_importance: Option<Vec<f64>>,
}

/// A model that was skipped, with the reason
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelFailure {
    pub model: ModelKind,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub importance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionReport {
    /// Successful models in configured order
    pub results: Vec<ModelResult>,
    pub best_model: ModelKind,
    pub feature_names: Vec<String>,
    /// Importances of the best model, highest first
    pub feature_importance: Vec<FeatureImportance>,
    pub test_authors: Vec<String>,
    pub actual: Vec<f64>,
    pub failures: Vec<ModelFailure>,
    pub train_size: usize,
    /// Standardization fitted on the training rows
    pub scaler: ScalerParams,
}

impl PredictionReport {
    pub fn result(&self, model: ModelKind) -> Option<&ModelResult> {
        self.results.iter().find(|r| r.model == model)
    }

    pub fn best(&self) -> Option<&ModelResult> {
        self.result(self.best_model)
    }
}

/// Trains and compares the configured regressors
pub struct PredictiveModelEnsemble {
    config: PredictionConfig,
}

impl PredictiveModelEnsemble {
    pub fn new(config: PredictionConfig) -> Self {
        Self { config }
    }

    /// Predict total citations from the remaining fused features
    pub fn predict_citations(&self, rows: &[AuthorFeatureVector]) -> Result<PredictionReport> {
        let split = train_test_split(rows.len(), self.config.test_fraction, self.config.seed)?;

        let x = feature_matrix(rows, &Feature::PREDICTORS);
        let y = citation_targets(rows);

        let (scaler, x_train) = ScalerParams::fit_transform(&x.select(Axis(0), &split.train));
        let x_test = scaler.transform(&x.select(Axis(0), &split.test));
        let y_train: Vec<f64> = split.train.iter().map(|&i| y[i]).collect();
        let y_test: Vec<f64> = split.test.iter().map(|&i| y[i]).collect();

        let models: Vec<ModelKind> = self.config.models.iter().copied().unique().collect();
        if models.is_empty() {
            return Err(AnalysisError::Training {
                model: "ensemble".into(),
                message: "no models configured".into(),
            });
        }

        log::info!(
            "Training {} models on {} authors ({} held out)",
            models.len(),
            split.train.len(),
            split.test.len()
        );

        let n_features = Feature::PREDICTORS.len();
        let outcomes: Vec<(ModelKind, Result<ModelResult>)> = models
            .par_iter()
            .map(|&kind| {
                let outcome = TrainedModel::train(kind, &x_train, &y_train, &self.config).map(|model| {
                    log::debug!("{} fitted with {}", kind, model.describe());
                    let predictions = model.predict(&x_test);
                    ModelResult {
                        model: kind,
                        r2_score: evaluation::r2_score(&y_test, &predictions),
                        rmse: evaluation::rmse(&y_test, &predictions),
                        mae: evaluation::mae(&y_test, &predictions),
                        feature_importance: model.feature_importances(),
                        predictions,
                    }
                });
                (kind, outcome)
            })
            .collect();

        let mut results = Vec::new();
        let mut failures = Vec::new();
        for (kind, outcome) in outcomes {
            match outcome {
                Ok(result) => {
                    log::info!(
                        "{}: R^2 = {:.4}, RMSE = {:.2}",
                        kind,
                        result.r2_score,
                        result.rmse
                    );
                    results.push(result);
                }
                Err(AnalysisError::LibraryUnavailable(what)) => {
                    log::warn!("Skipping {}: {} is not available in this build", kind, what);
                    failures.push(ModelFailure {
                        model: kind,
                        reason: AnalysisError::LibraryUnavailable(what).to_string(),
                    });
                }
                Err(err) => {
                    log::error!("Training {} failed: {}", kind, err);
                    failures.push(ModelFailure {
                        model: kind,
                        reason: err.to_string(),
                    });
                }
            }
        }

        let best = select_best(&results).ok_or_else(|| AnalysisError::Training {
            model: "ensemble".into(),
            message: format!("all {} models failed", failures.len()),
        })?;

        let feature_names: Vec<String> = Feature::PREDICTORS.iter().map(|f| f.name().to_string()).collect();
        let importances = best
            .feature_importance
            .clone()
            .unwrap_or_else(|| vec![0.0; n_features]);
        let feature_importance = rank_importances(&feature_names, &importances);

        log::info!("Best model: {} (R^2 = {:.4})", best.model, best.r2_score);

        Ok(PredictionReport {
            best_model: best.model,
            feature_names,
            feature_importance,
            test_authors: split.test.iter().map(|&i| rows[i].author_id.clone()).collect(),
            actual: y_test,
            failures,
            train_size: split.train.len(),
            scaler,
            results,
        })
    }
}

/// Highest R^2; the first model in configured order wins ties
pub fn select_best(results: &[ModelResult]) -> Option<&ModelResult> {
    results.iter().fold(None, |best: Option<&ModelResult>, candidate| match best {
        Some(current) if current.r2_score >= candidate.r2_score => Some(current),
        _ => Some(candidate),
    })
}

fn rank_importances(names: &[String], values: &[f64]) -> Vec<FeatureImportance> {
    names
        .iter()
        .zip(values)
        .map(|(feature, &importance)| FeatureImportance {
            feature: feature.clone(),
            importance,
        })
        .sorted_by(|a, b| b.importance.total_cmp(&a.importance))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authors(n: usize) -> Vec<AuthorFeatureVector> {
        (0..n)
            .map(|i| AuthorFeatureVector {
                author_id: format!("author {}", i),
                publication_count: (i % 7 + 1) as u64,
                total_citations: (10 * (i % 7 + 1) + i % 3) as u64,
                avg_citations_per_paper: 10.0,
                h_index_approx: (i % 4) as u64,
                degree: i % 5,
                degree_centrality: (i % 5) as f64 / 10.0,
                betweenness_centrality: (i % 3) as f64 / 10.0,
                closeness_centrality: 0.5,
                eigenvector_centrality: (i % 6) as f64 / 6.0,
                pagerank: 1.0 / n as f64,
            })
            .collect()
    }

    fn result(model: ModelKind, r2: f64) -> ModelResult {
        ModelResult {
            model,
            r2_score: r2,
            rmse: 1.0,
            mae: 1.0,
            predictions: Vec::new(),
            feature_importance: None,
        }
    }

    #[test]
    fn single_row_is_a_shape_error() {
        let ensemble = PredictiveModelEnsemble::new(PredictionConfig::default());
        assert!(matches!(
            ensemble.predict_citations(&authors(1)),
            Err(AnalysisError::DataShape(_))
        ));
    }

    #[test]
    fn best_model_maximizes_r2() {
        let ensemble = PredictiveModelEnsemble::new(PredictionConfig {
            forest_trees: 10,
            boosting_rounds: 20,
            ..Default::default()
        });
        let report = ensemble.predict_citations(&authors(40)).unwrap();

        let max = report
            .results
            .iter()
            .map(|r| r.r2_score)
            .fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(report.best().unwrap().r2_score, max);
        assert!(report.results.iter().all(|r| r.rmse >= 0.0));
        assert_eq!(report.actual.len(), 8);
        assert_eq!(report.feature_names.len(), Feature::PREDICTORS.len());
    }

    #[test]
    fn support_vector_reports_no_importances() {
        let ensemble = PredictiveModelEnsemble::new(PredictionConfig {
            models: vec![ModelKind::SupportVector],
            ..Default::default()
        });
        let report = ensemble.predict_citations(&authors(20)).unwrap();
        assert_eq!(report.best_model, ModelKind::SupportVector);
        assert!(report.feature_importance.iter().all(|f| f.importance == 0.0));
    }

    #[test]
    fn ties_keep_configured_order() {
        let results = vec![
            result(ModelKind::DecisionTree, 0.5),
            result(ModelKind::RandomForest, 0.5),
            result(ModelKind::SupportVector, 0.1),
        ];
        assert_eq!(select_best(&results).unwrap().model, ModelKind::DecisionTree);
        assert!(select_best(&[]).is_none());
    }

    #[cfg(not(feature = "boosting"))]
    #[test]
    fn unavailable_boosting_is_skipped() {
        let report = PredictiveModelEnsemble::new(PredictionConfig::default())
            .predict_citations(&authors(20))
            .unwrap();
        assert!(report.failures.iter().any(|f| f.model == ModelKind::GradientBoosting));
    }

    #[test]
    fn failing_model_is_recorded_and_others_still_report() {
        let report = PredictiveModelEnsemble::new(PredictionConfig {
            forest_trees: 0,
            boosting_rounds: 10,
            ..Default::default()
        })
        .predict_citations(&authors(30))
        .unwrap();

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].model, ModelKind::RandomForest);
        assert!(report.result(ModelKind::RandomForest).is_none());
        assert!(report.result(ModelKind::DecisionTree).is_some());
        assert!(report.result(ModelKind::SupportVector).is_some());
        assert_ne!(report.best_model, ModelKind::RandomForest);
        assert!(report.best().is_some());
    }

    #[test]
    fn ensemble_fails_when_every_model_fails() {
        let result = PredictiveModelEnsemble::new(PredictionConfig {
            models: vec![ModelKind::RandomForest],
            forest_trees: 0,
            ..Default::default()
        })
        .predict_citations(&authors(20));

        match result {
            Err(AnalysisError::Training { model, message }) => {
                assert_eq!(model, "ensemble");
                assert!(message.contains("all 1 models failed"));
            }
            other => panic!("expected a training error, got {:?}", other),
        }
    }

    #[test]
    fn fitted_models_describe_their_size() {
        let x = ndarray::array![[0.0], [1.0], [2.0], [3.0]];
        let y = [0.0, 0.0, 5.0, 5.0];
        let config = PredictionConfig {
            forest_trees: 3,
            max_depth: 1,
            ..Default::default()
        };

        let forest = TrainedModel::train(ModelKind::RandomForest, &x, &y, &config).unwrap();
        assert_eq!(forest.describe(), "3 trees");
        let tree = TrainedModel::train(ModelKind::DecisionTree, &x, &y, &config).unwrap();
        assert_eq!(tree.describe(), "depth 1");
        let svr = TrainedModel::train(ModelKind::SupportVector, &x, &y, &config).unwrap();
        assert!(svr.describe().ends_with("support vectors"));
    }

    #[test]
    fn same_seed_same_report() {
        let config = PredictionConfig {
            forest_trees: 5,
            boosting_rounds: 10,
            ..Default::default()
        };
        let data = authors(30);
        let a = PredictiveModelEnsemble::new(config.clone()).predict_citations(&data).unwrap();
        let b = PredictiveModelEnsemble::new(config).predict_citations(&data).unwrap();
        assert_eq!(a, b);
    }
}
