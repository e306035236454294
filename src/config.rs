//! Configuration management for the co-authorship impact analyzer

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::data::AuthorRanking;
use crate::error::Result;

/// Top-level configuration for one analysis run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub graph: GraphConfig,
    pub metrics: MetricsConfig,
    pub community: CommunityConfig,
    pub prediction: PredictionConfig,
    pub clustering: ClusteringConfig,
    pub report: ReportConfig,
}

impl Config {
    /// Load a configuration from a JSON file; missing fields take their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// Graph construction settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Fail the run with `EmptyGraph` instead of producing empty tables
    pub require_edges: bool,
}

/// Iteration caps and tolerances for the structural metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub eigenvector_max_iterations: usize,
    pub eigenvector_tolerance: f64,
    pub pagerank_damping: f64,
    pub pagerank_max_iterations: usize,
    pub pagerank_tolerance: f64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            eigenvector_max_iterations: 1000,
            eigenvector_tolerance: 1e-6,
            pagerank_damping: 0.85,
            pagerank_max_iterations: 100,
            pagerank_tolerance: 1e-6,
        }
    }
}

/// Community detection algorithm selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum CommunityAlgorithm {
    Louvain,
    GirvanNewman,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommunityConfig {
    pub algorithm: CommunityAlgorithm,
    pub seed: u64,
    pub resolution: f64,
    /// Upper bound on local-move sweeps per Louvain level
    pub max_sweeps: usize,
}

impl Default for CommunityConfig {
    fn default() -> Self {
        Self {
            algorithm: CommunityAlgorithm::Louvain,
            seed: 42,
            resolution: 1.0,
            max_sweeps: 100,
        }
    }
}

/// Regressor kinds trained by the prediction ensemble
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    RandomForest,
    GradientBoosting,
    DecisionTree,
    SupportVector,
}

impl ModelKind {
    pub const ALL: [ModelKind; 4] = [
        ModelKind::RandomForest,
        ModelKind::GradientBoosting,
        ModelKind::DecisionTree,
        ModelKind::SupportVector,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ModelKind::RandomForest => "random_forest",
            ModelKind::GradientBoosting => "gradient_boosting",
            ModelKind::DecisionTree => "decision_tree",
            ModelKind::SupportVector => "support_vector",
        }
    }
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Settings for the citation prediction ensemble
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionConfig {
    pub test_fraction: f64,
    pub seed: u64,
    pub models: Vec<ModelKind>,
    pub forest_trees: usize,
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub boosting_rounds: usize,
    pub learning_rate: f64,
    pub svr_c: f64,
    pub svr_epsilon: f64,
    /// RBF kernel width; `None` uses 1 / (n_features * variance of the training matrix)
    pub svr_gamma: Option<f64>,
    pub svr_max_iterations: usize,
    pub svr_tolerance: f64,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            test_fraction: 0.2,
            seed: 42,
            models: ModelKind::ALL.to_vec(),
            forest_trees: 100,
            max_depth: 10,
            min_samples_split: 2,
            boosting_rounds: 100,
            learning_rate: 0.1,
            svr_c: 1.0,
            svr_epsilon: 0.1,
            svr_gamma: None,
            svr_max_iterations: 1000,
            svr_tolerance: 1e-4,
        }
    }
}

/// Author clustering algorithm selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ClusteringAlgorithm {
    KMeans,
    Dbscan,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusteringConfig {
    pub algorithm: ClusteringAlgorithm,
    pub n_clusters: usize,
    pub seed: u64,
    pub n_runs: usize,
    pub max_iterations: u64,
    pub tolerance: f64,
    pub dbscan_epsilon: f64,
    pub dbscan_min_points: usize,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            algorithm: ClusteringAlgorithm::KMeans,
            n_clusters: 5,
            seed: 42,
            n_runs: 10,
            max_iterations: 300,
            tolerance: 1e-4,
            dbscan_epsilon: 0.5,
            dbscan_min_points: 3,
        }
    }
}

/// Sizes of the ranked lists included in reports
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub top_connectors: usize,
    pub top_influential: usize,
    pub top_authors: usize,
    /// Bibliometric column for the top-authors list
    pub author_ranking: AuthorRanking,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_connectors: 10,
            top_influential: 10,
            top_authors: 10,
            author_ranking: AuthorRanking::TotalCitations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"clustering": {"n_clusters": 3}}"#).unwrap();
        assert_eq!(config.clustering.n_clusters, 3);
        assert_eq!(config.clustering.seed, 42);
        assert_eq!(config.prediction.test_fraction, 0.2);
        assert_eq!(config.metrics.eigenvector_max_iterations, 1000);
    }

    #[test]
    fn model_kinds_parse_from_snake_case() {
        let config: PredictionConfig =
            serde_json::from_str(r#"{"models": ["decision_tree", "support_vector"]}"#).unwrap();
        assert_eq!(
            config.models,
            vec![ModelKind::DecisionTree, ModelKind::SupportVector]
        );
    }
}
