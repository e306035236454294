//! Fused per-author feature vectors

pub mod fusion;
pub mod scaler;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use fusion::FeatureFusionEngine;
pub use scaler::{fit_scaler, ScalerParams};

/// Numeric columns of a fused author row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    PublicationCount,
    TotalCitations,
    AvgCitationsPerPaper,
    HIndexApprox,
    Degree,
    DegreeCentrality,
    BetweennessCentrality,
    ClosenessCentrality,
    EigenvectorCentrality,
    PageRank,
}

impl Feature {
    pub const ALL: [Feature; 10] = [
        Feature::PublicationCount,
        Feature::TotalCitations,
        Feature::AvgCitationsPerPaper,
        Feature::HIndexApprox,
        Feature::Degree,
        Feature::DegreeCentrality,
        Feature::BetweennessCentrality,
        Feature::ClosenessCentrality,
        Feature::EigenvectorCentrality,
        Feature::PageRank,
    ];

    /// Columns used for prediction and clustering: everything but the
    /// citation target
    pub const PREDICTORS: [Feature; 9] = [
        Feature::PublicationCount,
        Feature::AvgCitationsPerPaper,
        Feature::HIndexApprox,
        Feature::Degree,
        Feature::DegreeCentrality,
        Feature::BetweennessCentrality,
        Feature::ClosenessCentrality,
        Feature::EigenvectorCentrality,
        Feature::PageRank,
    ];

    /// Position in `Feature::ALL`
    pub fn column(self) -> usize {
        self as usize
    }

    pub fn name(&self) -> &'static str {
        match self {
            Feature::PublicationCount => "publication_count",
            Feature::TotalCitations => "total_citations",
            Feature::AvgCitationsPerPaper => "avg_citations_per_paper",
            Feature::HIndexApprox => "h_index_approx",
            Feature::Degree => "degree",
            Feature::DegreeCentrality => "degree_centrality",
            Feature::BetweennessCentrality => "betweenness_centrality",
            Feature::ClosenessCentrality => "closeness_centrality",
            Feature::EigenvectorCentrality => "eigenvector_centrality",
            Feature::PageRank => "pagerank",
        }
    }
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Bibliometric and structural features for one author, fully populated
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthorFeatureVector {
    pub author_id: String,
    pub publication_count: u64,
    pub total_citations: u64,
    pub avg_citations_per_paper: f64,
    pub h_index_approx: u64,
    pub degree: usize,
    pub degree_centrality: f64,
    pub betweenness_centrality: f64,
    pub closeness_centrality: f64,
    pub eigenvector_centrality: f64,
    pub pagerank: f64,
}

impl AuthorFeatureVector {
    pub fn value(&self, feature: Feature) -> f64 {
        match feature {
            Feature::PublicationCount => self.publication_count as f64,
            Feature::TotalCitations => self.total_citations as f64,
            Feature::AvgCitationsPerPaper => self.avg_citations_per_paper,
            Feature::HIndexApprox => self.h_index_approx as f64,
            Feature::Degree => self.degree as f64,
            Feature::DegreeCentrality => self.degree_centrality,
            Feature::BetweennessCentrality => self.betweenness_centrality,
            Feature::ClosenessCentrality => self.closeness_centrality,
            Feature::EigenvectorCentrality => self.eigenvector_centrality,
            Feature::PageRank => self.pagerank,
        }
    }
}

/// Row-per-author matrix of the selected columns
pub fn feature_matrix(rows: &[AuthorFeatureVector], columns: &[Feature]) -> Array2<f64> {
    Array2::from_shape_fn((rows.len(), columns.len()), |(i, j)| {
        rows[i].value(columns[j])
    })
}

/// Citation totals, the prediction target
pub fn citation_targets(rows: &[AuthorFeatureVector]) -> Vec<f64> {
    rows.iter().map(|row| row.total_citations as f64).collect()
}
