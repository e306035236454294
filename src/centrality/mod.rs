//! Per-author structural importance metrics

pub mod eigenvector;
pub mod pagerank;
pub mod paths;

use serde::{Deserialize, Serialize};

use crate::config::MetricsConfig;
use crate::graph::{CoauthorGraph, Neighbors};

pub use eigenvector::{eigenvector_centrality, EigenvectorResult};
pub use pagerank::{pagerank, PageRankResult};
pub use paths::{betweenness_centrality, closeness_centrality};

/// Structural metrics for one graph node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkMetrics {
    pub author_id: String,
    pub degree: usize,
    pub degree_centrality: f64,
    pub betweenness_centrality: f64,
    pub closeness_centrality: f64,
    pub eigenvector_centrality: f64,
    pub pagerank: f64,
}

/// Metric selector for rankings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkMetric {
    Degree,
    DegreeCentrality,
    Betweenness,
    Closeness,
    Eigenvector,
    PageRank,
}

impl NetworkMetrics {
    pub fn value(&self, metric: NetworkMetric) -> f64 {
        match metric {
            NetworkMetric::Degree => self.degree as f64,
            NetworkMetric::DegreeCentrality => self.degree_centrality,
            NetworkMetric::Betweenness => self.betweenness_centrality,
            NetworkMetric::Closeness => self.closeness_centrality,
            NetworkMetric::Eigenvector => self.eigenvector_centrality,
            NetworkMetric::PageRank => self.pagerank,
        }
    }
}

/// One row per graph node, in node order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkMetricsTable {
    pub rows: Vec<NetworkMetrics>,
    /// Connected components whose eigenvector iteration hit the cap
    pub eigenvector_failures: usize,
    pub pagerank_converged: bool,
}

impl NetworkMetricsTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, author: &str) -> Option<&NetworkMetrics> {
        self.rows.iter().find(|row| row.author_id == author)
    }

    /// Highest `n` rows by a metric, ties broken by author id
    pub fn top_by(&self, metric: NetworkMetric, n: usize) -> Vec<&NetworkMetrics> {
        let mut ranked: Vec<&NetworkMetrics> = self.rows.iter().collect();
        ranked.sort_by(|a, b| {
            b.value(metric)
                .total_cmp(&a.value(metric))
                .then_with(|| a.author_id.cmp(&b.author_id))
        });
        ranked.truncate(n);
        ranked
    }
}

/// Degree normalized by the largest possible degree, n - 1
pub fn degree_centrality(graph: &CoauthorGraph) -> Vec<f64> {
    let n = graph.node_count();
    if n <= 1 {
        return vec![1.0; n];
    }
    let scale = 1.0 / (n as f64 - 1.0);
    (0..n).map(|node| graph.degree(node) as f64 * scale).collect()
}

/// Computes the structural metrics table for a fully built graph
pub struct NetworkMetricsEngine {
    config: MetricsConfig,
}

impl NetworkMetricsEngine {
    pub fn new(config: MetricsConfig) -> Self {
        Self { config }
    }

    /// Compute every metric for every node.
    ///
    /// Eigenvector non-convergence is isolated per connected component: the
    /// affected authors get 0 and the remaining metrics are unaffected.
    pub fn compute(&self, graph: &CoauthorGraph) -> NetworkMetricsTable {
        let n = graph.node_count();
        if n == 0 {
            log::warn!("Co-authorship graph is empty; network metrics table is empty");
            return NetworkMetricsTable {
                rows: Vec::new(),
                eigenvector_failures: 0,
                pagerank_converged: true,
            };
        }

        log::info!("Computing network metrics for {} authors", n);

        let adjacency = graph.adjacency();
        let degree = degree_centrality(graph);
        let betweenness = betweenness_centrality(adjacency);
        let closeness = closeness_centrality(adjacency);

        let eigen = eigenvector_centrality(
            adjacency,
            self.config.eigenvector_max_iterations,
            self.config.eigenvector_tolerance,
        );
        if eigen.failed_components > 0 {
            log::warn!(
                "Eigenvector centrality did not converge for {} component(s); their authors score 0",
                eigen.failed_components
            );
        }

        let ranks = pagerank(
            graph,
            self.config.pagerank_damping,
            self.config.pagerank_max_iterations,
            self.config.pagerank_tolerance,
        );
        if !ranks.converged {
            log::warn!(
                "PageRank did not converge within {} iterations; using the last iterate",
                ranks.iterations
            );
        }

        let rows = (0..n)
            .map(|node| NetworkMetrics {
                author_id: graph.node_id(node).to_string(),
                degree: adjacency.degree(node),
                degree_centrality: degree[node],
                betweenness_centrality: betweenness[node],
                closeness_centrality: closeness[node],
                eigenvector_centrality: eigen.scores[node],
                pagerank: ranks.scores[node],
            })
            .collect();

        log::info!("Network metrics computed");

        NetworkMetricsTable {
            rows,
            eigenvector_failures: eigen.failed_components,
            pagerank_converged: ranks.converged,
        }
    }
}
