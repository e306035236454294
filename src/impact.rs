//! Composite author impact score.
//!
//! Every fused column is standardized over the current population, the
//! weighted columns are summed, and the raw sums are min-max rescaled to
//! [0, 100]. Scores are therefore relative to the authors analysed together.

use serde::{Deserialize, Serialize};

use crate::features::{feature_matrix, AuthorFeatureVector, Feature, ScalerParams};

/// Weight per standardized feature; the weights sum to 1
pub const IMPACT_WEIGHTS: [(Feature, f64); 8] = [
    (Feature::TotalCitations, 0.25),
    (Feature::HIndexApprox, 0.20),
    (Feature::PageRank, 0.15),
    (Feature::PublicationCount, 0.10),
    (Feature::BetweennessCentrality, 0.10),
    (Feature::EigenvectorCentrality, 0.10),
    (Feature::DegreeCentrality, 0.05),
    (Feature::ClosenessCentrality, 0.05),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactRecord {
    #[serde(flatten)]
    pub features: AuthorFeatureVector,
    pub impact_score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImpactTable {
    pub rows: Vec<ImpactRecord>,
    /// Standardization fitted on this population
    pub scaler: Option<ScalerParams>,
}

impl ImpactTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, author: &str) -> Option<&ImpactRecord> {
        self.rows.iter().find(|row| row.features.author_id == author)
    }

    /// Most influential authors, ties broken by author id
    pub fn top(&self, n: usize) -> Vec<&ImpactRecord> {
        let mut ranked: Vec<&ImpactRecord> = self.rows.iter().collect();
        ranked.sort_by(|a, b| {
            b.impact_score
                .total_cmp(&a.impact_score)
                .then_with(|| a.features.author_id.cmp(&b.features.author_id))
        });
        ranked.truncate(n);
        ranked
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ImpactScorer;

impl ImpactScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn score(&self, rows: &[AuthorFeatureVector]) -> ImpactTable {
        if rows.is_empty() {
            log::warn!("No fused authors to score");
            return ImpactTable::default();
        }

        let matrix = feature_matrix(rows, &Feature::ALL);
        let (scaler, standardized) = ScalerParams::fit_transform(&matrix);

        let raw: Vec<f64> = standardized
            .rows()
            .into_iter()
            .map(|row| {
                IMPACT_WEIGHTS
                    .iter()
                    .map(|(feature, weight)| row[feature.column()] * weight)
                    .sum::<f64>()
            })
            .collect();

        let scores = rescale(&raw);

        log::info!("Scored impact for {} authors", rows.len());

        ImpactTable {
            rows: rows
                .iter()
                .cloned()
                .zip(scores)
                .map(|(features, impact_score)| ImpactRecord {
                    features,
                    impact_score,
                })
                .collect(),
            scaler: Some(scaler),
        }
    }
}

/// Min-max to [0, 100]; a constant input maps to all zeros
fn rescale(raw: &[f64]) -> Vec<f64> {
    let min = raw.iter().copied().fold(f64::INFINITY, f64::min);
    let max = raw.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    if range <= 0.0 || !range.is_finite() {
        return vec![0.0; raw.len()];
    }

    raw.iter()
        .map(|&x| (100.0 * (x - min) / range).clamp(0.0, 100.0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author(id: &str, citations: u64, h_index: u64) -> AuthorFeatureVector {
        AuthorFeatureVector {
            author_id: id.to_string(),
            publication_count: 2,
            total_citations: citations,
            avg_citations_per_paper: citations as f64 / 2.0,
            h_index_approx: h_index,
            degree: 1,
            degree_centrality: 1.0,
            betweenness_centrality: 0.0,
            closeness_centrality: 1.0,
            eigenvector_centrality: 0.7,
            pagerank: 0.5,
        }
    }

    #[test]
    fn weights_sum_to_one() {
        let total: f64 = IMPACT_WEIGHTS.iter().map(|(_, w)| w).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn identical_authors_score_zero() {
        let table = ImpactScorer::new().score(&[author("a", 5, 1), author("b", 5, 1)]);
        assert!(table.rows.iter().all(|r| r.impact_score == 0.0));
    }

    #[test]
    fn scores_span_zero_to_hundred() {
        let table = ImpactScorer::new().score(&[
            author("a", 50, 4),
            author("b", 10, 2),
            author("c", 0, 0),
        ]);

        assert_eq!(table.get("a").unwrap().impact_score, 100.0);
        assert_eq!(table.get("c").unwrap().impact_score, 0.0);
        let b = table.get("b").unwrap().impact_score;
        assert!(b > 0.0 && b < 100.0);
        assert_eq!(table.top(1)[0].features.author_id, "a");
    }
}
