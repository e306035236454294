//! Input records consumed by the analysis core

pub mod loader;
pub mod normalize;
pub mod stats;

use serde::{Deserialize, Serialize};

pub use normalize::normalize_author_name;
pub use stats::{calculate_author_stats, top_authors, AuthorRanking};

/// A cleaned publication record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Publication {
    pub title: String,
    #[serde(default, rename = "abstract")]
    pub abstract_text: String,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub citation_count: u64,
}

impl Publication {
    pub fn new<S: Into<String>>(title: impl Into<String>, authors: Vec<S>, citation_count: u64) -> Self {
        Self {
            title: title.into(),
            abstract_text: String::new(),
            authors: authors.into_iter().map(Into::into).collect(),
            citation_count,
        }
    }

    /// Distinct normalized author ids, in first-seen order
    pub fn normalized_authors(&self) -> Vec<String> {
        let mut seen = Vec::with_capacity(self.authors.len());
        for author in &self.authors {
            let id = normalize_author_name(author);
            if !id.is_empty() && !seen.contains(&id) {
                seen.push(id);
            }
        }
        seen
    }
}

/// Bibliometric statistics for one author
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorStats {
    pub author_id: String,
    #[serde(default)]
    pub publication_count: u64,
    #[serde(default)]
    pub total_citations: u64,
    #[serde(default)]
    pub avg_citations_per_paper: f64,
    #[serde(default)]
    pub h_index_approx: u64,
}
