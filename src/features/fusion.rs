//! Joins bibliometric statistics with network metrics.
//!
//! The join is inner: an author needs both a statistics row and a graph
//! node. Researchers who only ever publish alone have statistics but no
//! node, so they drop out of scoring, prediction and clustering.

use std::collections::HashMap;

use crate::centrality::NetworkMetricsTable;
use crate::data::AuthorStats;
use crate::features::AuthorFeatureVector;

#[derive(Debug, Default, Clone, Copy)]
pub struct FeatureFusionEngine;

impl FeatureFusionEngine {
    pub fn new() -> Self {
        Self
    }

    /// One row per author present on both sides, in metrics (node) order.
    /// Duplicate statistics rows keep the first occurrence.
    pub fn fuse(&self, stats: &[AuthorStats], metrics: &NetworkMetricsTable) -> Vec<AuthorFeatureVector> {
        let mut by_author: HashMap<&str, &AuthorStats> = HashMap::with_capacity(stats.len());
        for row in stats {
            by_author.entry(row.author_id.as_str()).or_insert(row);
        }

        let duplicates = stats.len() - by_author.len();
        if duplicates > 0 {
            log::warn!("Ignoring {} duplicate author statistics rows", duplicates);
        }

        let fused: Vec<AuthorFeatureVector> = metrics
            .rows
            .iter()
            .filter_map(|network| {
                by_author.get(network.author_id.as_str()).map(|bib| AuthorFeatureVector {
                    author_id: network.author_id.clone(),
                    publication_count: bib.publication_count,
                    total_citations: bib.total_citations,
                    avg_citations_per_paper: finite_or_zero(bib.avg_citations_per_paper),
                    h_index_approx: bib.h_index_approx,
                    degree: network.degree,
                    degree_centrality: finite_or_zero(network.degree_centrality),
                    betweenness_centrality: finite_or_zero(network.betweenness_centrality),
                    closeness_centrality: finite_or_zero(network.closeness_centrality),
                    eigenvector_centrality: finite_or_zero(network.eigenvector_centrality),
                    pagerank: finite_or_zero(network.pagerank),
                })
            })
            .collect();

        log::info!(
            "Fused features for {} authors ({} with statistics, {} in the graph)",
            fused.len(),
            by_author.len(),
            metrics.len()
        );

        fused
    }
}

/// Missing or undefined values become 0
fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::centrality::NetworkMetrics;

    fn stats(id: &str, citations: u64) -> AuthorStats {
        AuthorStats {
            author_id: id.to_string(),
            publication_count: 1,
            total_citations: citations,
            avg_citations_per_paper: citations as f64,
            h_index_approx: 1,
        }
    }

    fn metrics(ids: &[&str]) -> NetworkMetricsTable {
        NetworkMetricsTable {
            rows: ids
                .iter()
                .map(|id| NetworkMetrics {
                    author_id: id.to_string(),
                    degree: 1,
                    degree_centrality: 0.5,
                    betweenness_centrality: f64::NAN,
                    closeness_centrality: 0.5,
                    eigenvector_centrality: 0.5,
                    pagerank: 0.25,
                })
                .collect(),
            eigenvector_failures: 0,
            pagerank_converged: true,
        }
    }

    #[test]
    fn keeps_only_authors_on_both_sides() {
        let fused = FeatureFusionEngine::new().fuse(
            &[stats("a", 3), stats("b", 1), stats("d", 9)],
            &metrics(&["a", "b", "c"]),
        );

        let ids: Vec<&str> = fused.iter().map(|r| r.author_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(fused[0].total_citations, 3);
        assert_eq!(fused[0].betweenness_centrality, 0.0);
    }

    #[test]
    fn duplicate_statistics_keep_first_row() {
        let fused = FeatureFusionEngine::new().fuse(&[stats("a", 3), stats("a", 7)], &metrics(&["a"]));
        assert_eq!(fused.len(), 1);
        assert_eq!(fused[0].total_citations, 3);
    }
}
