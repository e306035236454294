//! End-to-end analysis run.
//!
//! Stages run in dependency order on fully materialized inputs: graph,
//! then metrics and communities, then fusion, then scoring, prediction and
//! clustering. Prediction and clustering failures are recorded in the
//! report; they do not discard the tables already computed.

use serde::Serialize;

use crate::centrality::{NetworkMetric, NetworkMetrics, NetworkMetricsEngine, NetworkMetricsTable};
use crate::cluster::{ClusterReport, ClusteringEngine};
use crate::community::{CommunityDetector, CommunityResult};
use crate::config::Config;
use crate::data::{calculate_author_stats, top_authors, AuthorStats, Publication};
use crate::error::{AnalysisError, Result};
use crate::features::{AuthorFeatureVector, FeatureFusionEngine};
use crate::graph::{build_coauthorship_graph, CoauthorGraph, GraphSummary};
use crate::impact::{ImpactRecord, ImpactScorer, ImpactTable};
use crate::model::{PredictionReport, PredictiveModelEnsemble};

/// Every table produced by one run
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    #[serde(skip)]
    pub graph: CoauthorGraph,
    pub summary: GraphSummary,
    pub metrics: NetworkMetricsTable,
    pub communities: CommunityResult,
    pub author_stats: Vec<AuthorStats>,
    pub features: Vec<AuthorFeatureVector>,
    pub impact: ImpactTable,
    pub prediction: Option<PredictionReport>,
    pub prediction_error: Option<String>,
    pub clusters: Option<ClusterReport>,
    pub clustering_error: Option<String>,
    pub top_connectors: Vec<NetworkMetrics>,
    pub top_influential: Vec<ImpactRecord>,
    pub top_authors: Vec<AuthorStats>,
}

/// Run the full analysis. Without `stats`, bibliometric statistics are
/// derived from the publications themselves.
pub fn run(publications: &[Publication], stats: Option<Vec<AuthorStats>>, config: &Config) -> Result<AnalysisReport> {
    log::info!("Analysing {} publications", publications.len());

    let graph = build_coauthorship_graph(publications);
    if graph.edge_count() == 0 {
        if config.graph.require_edges {
            return Err(AnalysisError::EmptyGraph);
        }
        log::warn!("{}; downstream tables will be empty", AnalysisError::EmptyGraph);
    }
    let summary = graph.summary();

    let metrics = NetworkMetricsEngine::new(config.metrics.clone()).compute(&graph);
    let communities = CommunityDetector::new(&config.community).detect(&graph);

    let author_stats = stats.unwrap_or_else(|| calculate_author_stats(publications));
    let features = FeatureFusionEngine::new().fuse(&author_stats, &metrics);

    let impact = ImpactScorer::new().score(&features);

    let (prediction, prediction_error) =
        match PredictiveModelEnsemble::new(config.prediction.clone()).predict_citations(&features) {
            Ok(report) => (Some(report), None),
            Err(err) => {
                log::warn!("Citation prediction skipped: {}", err);
                (None, Some(err.to_string()))
            }
        };

    let (clusters, clustering_error) =
        match ClusteringEngine::new(config.clustering.clone()).cluster_authors(&features) {
            Ok(report) => (Some(report), None),
            Err(err) => {
                log::warn!("Author clustering skipped: {}", err);
                (None, Some(err.to_string()))
            }
        };

    let top_connectors = metrics
        .top_by(NetworkMetric::Degree, config.report.top_connectors)
        .into_iter()
        .cloned()
        .collect();
    let top_influential = impact
        .top(config.report.top_influential)
        .into_iter()
        .cloned()
        .collect();
    let ranked_authors = top_authors(&author_stats, config.report.top_authors, config.report.author_ranking)
        .into_iter()
        .cloned()
        .collect();

    log::info!(
        "Analysis finished: {} authors, {} co-authorships, {} communities, {} scored authors",
        summary.node_count,
        summary.edge_count,
        communities.community_count(),
        impact.len()
    );

    Ok(AnalysisReport {
        graph,
        summary,
        metrics,
        communities,
        author_stats,
        features,
        impact,
        prediction,
        prediction_error,
        clusters,
        clustering_error,
        top_connectors,
        top_influential,
        top_authors: ranked_authors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_author_corpus_yields_empty_tables() {
        let publications = vec![
            Publication::new("Solo", vec!["A"], 5),
            Publication::new("Also solo", vec!["B"], 1),
        ];
        let report = run(&publications, None, &Config::default()).unwrap();

        assert!(report.metrics.is_empty());
        assert!(report.features.is_empty());
        assert!(report.impact.is_empty());
        assert!(report.prediction.is_none());
        assert!(report.prediction_error.is_some());
        assert_eq!(report.author_stats.len(), 2);
    }

    #[test]
    fn top_connectors_rank_by_degree() {
        // Two five-author cliques joined through a single go-between
        let mut publications = Vec::new();
        for group in ["a", "b"] {
            let members: Vec<String> = (0..5).map(|i| format!("{}{}", group, i)).collect();
            publications.push(Publication::new(format!("{} clique", group), members, 4));
        }
        publications.push(Publication::new("Left", vec!["a0", "x"], 1));
        publications.push(Publication::new("Right", vec!["x", "b0"], 1));

        let mut config = Config::default();
        config.report.top_connectors = 3;
        let report = run(&publications, None, &config).unwrap();

        let broker = report.metrics.top_by(NetworkMetric::Betweenness, 1)[0];
        assert_eq!(broker.author_id, "x");
        assert_eq!(broker.degree, 2);

        let connectors: Vec<(&str, usize)> = report
            .top_connectors
            .iter()
            .map(|m| (m.author_id.as_str(), m.degree))
            .collect();
        assert_eq!(connectors, vec![("a0", 5), ("b0", 5), ("a1", 4)]);
    }

    #[test]
    fn required_edges_turn_empty_graph_into_an_error() {
        let mut config = Config::default();
        config.graph.require_edges = true;
        let result = run(&[Publication::new("Solo", vec!["A"], 5)], None, &config);
        assert!(matches!(result, Err(AnalysisError::EmptyGraph)));
    }
}
