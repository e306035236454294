//! Research community detection

pub mod girvan_newman;
#[cfg(feature = "louvain")]
pub mod louvain;
pub mod metrics;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::{CommunityAlgorithm, CommunityConfig};
use crate::graph::CoauthorGraph;

pub use girvan_newman::GirvanNewman;
#[cfg(feature = "louvain")]
pub use louvain::Louvain;

/// A partitioning algorithm over the co-authorship graph.
///
/// `partition` returns one community id per node (indexed like the graph);
/// every node gets exactly one id, isolated nodes get their own.
pub trait CommunityStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn partition(&self, graph: &CoauthorGraph) -> Vec<usize>;
}

/// One detected research community
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Community {
    pub id: usize,
    /// Member author ids
    pub members: Vec<String>,
    pub size: usize,
    /// Internal edges / possible internal edges
    pub density: f64,
    /// Up to five members with the most co-authors inside the community
    pub central_members: Vec<String>,
}

/// Total partition of the graph's authors
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommunityResult {
    pub algorithm: String,
    /// Author id -> community id
    pub assignments: BTreeMap<String, usize>,
    /// Communities, largest first
    pub communities: Vec<Community>,
    pub modularity: f64,
}

impl CommunityResult {
    pub fn community_count(&self) -> usize {
        self.communities.len()
    }

    pub fn community_of(&self, author: &str) -> Option<usize> {
        self.assignments.get(author).copied()
    }
}

/// Detects communities with the strategy chosen once at construction
pub struct CommunityDetector {
    strategy: Box<dyn CommunityStrategy>,
    resolution: f64,
}

impl CommunityDetector {
    /// Select the configured algorithm, falling back to the divisive
    /// edge-betweenness partition when modularity optimisation is not built in
    pub fn new(config: &CommunityConfig) -> Self {
        Self {
            strategy: select_strategy(config),
            resolution: config.resolution,
        }
    }

    pub fn with_strategy(strategy: Box<dyn CommunityStrategy>) -> Self {
        Self {
            strategy,
            resolution: 1.0,
        }
    }

    pub fn algorithm(&self) -> &'static str {
        self.strategy.name()
    }

    pub fn detect(&self, graph: &CoauthorGraph) -> CommunityResult {
        if graph.is_empty() {
            log::warn!("Co-authorship graph is empty; no communities to detect");
            return CommunityResult {
                algorithm: self.strategy.name().to_string(),
                ..Default::default()
            };
        }

        log::info!(
            "Detecting communities in {} authors using {}",
            graph.node_count(),
            self.strategy.name()
        );

        let labels = self.strategy.partition(graph);
        let labels = metrics::relabel(&labels);
        let modularity = metrics::modularity(graph, &labels, self.resolution);

        let assignments: BTreeMap<String, usize> = graph
            .node_ids()
            .iter()
            .cloned()
            .zip(labels.iter().copied())
            .collect();

        let communities = metrics::profile_communities(graph, &labels);

        log::info!(
            "Found {} communities (modularity {:.4})",
            communities.len(),
            modularity
        );

        CommunityResult {
            algorithm: self.strategy.name().to_string(),
            assignments,
            communities,
            modularity,
        }
    }
}

fn select_strategy(config: &CommunityConfig) -> Box<dyn CommunityStrategy> {
    match config.algorithm {
        CommunityAlgorithm::Louvain => or_fallback(louvain(config)),
        CommunityAlgorithm::GirvanNewman => Box::new(GirvanNewman),
    }
}

#[cfg(feature = "louvain")]
fn louvain(config: &CommunityConfig) -> Option<Box<dyn CommunityStrategy>> {
    Some(Box::new(Louvain::new(config.seed, config.resolution, config.max_sweeps)))
}

#[cfg(not(feature = "louvain"))]
fn louvain(_config: &CommunityConfig) -> Option<Box<dyn CommunityStrategy>> {
    None
}

/// The primary strategy when built in, Girvan-Newman otherwise
fn or_fallback(primary: Option<Box<dyn CommunityStrategy>>) -> Box<dyn CommunityStrategy> {
    primary.unwrap_or_else(|| {
        log::warn!(
            "{}; using Girvan-Newman partitioning",
            crate::error::AnalysisError::LibraryUnavailable("Louvain community detection")
        );
        Box::new(GirvanNewman)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Publication;
    use crate::graph::build_coauthorship_graph;

    fn two_groups() -> CoauthorGraph {
        build_coauthorship_graph(&[
            Publication::new("P1", vec!["A", "B", "C"], 0),
            Publication::new("P2", vec!["A", "B", "C"], 0),
            Publication::new("P3", vec!["D", "E", "F"], 0),
            Publication::new("P4", vec!["D", "E", "F"], 0),
            Publication::new("P5", vec!["C", "D"], 0),
        ])
    }

    #[test]
    fn every_author_gets_exactly_one_community() {
        for algorithm in [CommunityAlgorithm::Louvain, CommunityAlgorithm::GirvanNewman] {
            let config = CommunityConfig {
                algorithm,
                ..Default::default()
            };
            let graph = two_groups();
            let result = CommunityDetector::new(&config).detect(&graph);

            assert_eq!(result.assignments.len(), graph.node_count());
            let members: usize = result.communities.iter().map(|c| c.size).sum();
            assert_eq!(members, graph.node_count());
            assert_eq!(result.community_count(), 2, "{}", result.algorithm);
            assert_eq!(result.community_of("a"), result.community_of("c"));
            assert_ne!(result.community_of("c"), result.community_of("d"));
        }
    }

    #[test]
    fn missing_primary_falls_back_to_girvan_newman() {
        let detector = CommunityDetector::with_strategy(or_fallback(None));
        assert_eq!(detector.algorithm(), "girvan_newman");

        let graph = two_groups();
        let result = detector.detect(&graph);
        assert_eq!(result.algorithm, "girvan_newman");
        assert_eq!(result.community_count(), 2);
        assert_eq!(result.assignments.len(), graph.node_count());
    }

    #[test]
    fn louvain_request_matches_the_build() {
        let detector = CommunityDetector::new(&CommunityConfig::default());
        let expected = if cfg!(feature = "louvain") { "louvain" } else { "girvan_newman" };
        assert_eq!(detector.algorithm(), expected);

        let explicit = CommunityDetector::new(&CommunityConfig {
            algorithm: CommunityAlgorithm::GirvanNewman,
            ..Default::default()
        });
        assert_eq!(explicit.algorithm(), "girvan_newman");
    }

    #[test]
    fn empty_graph_has_no_communities() {
        let result = CommunityDetector::new(&CommunityConfig::default())
            .detect(&CoauthorGraph::default());
        assert!(result.assignments.is_empty());
        assert_eq!(result.community_count(), 0);
    }
}
