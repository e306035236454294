//! Per-author bibliometric statistics derived from publications

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::data::{AuthorStats, Publication};

/// Bibliometric column used to rank authors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum AuthorRanking {
    TotalCitations,
    PublicationCount,
    HIndex,
}

/// Largest h such that h of the given citation counts are each at least h
pub fn h_index(citations: &[u64]) -> u64 {
    let mut sorted = citations.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));

    sorted
        .iter()
        .enumerate()
        .take_while(|&(rank, &count)| count >= rank as u64 + 1)
        .count() as u64
}

/// Aggregate publication, citation and h-index figures per normalized author.
///
/// Single-author publications count here even though they never reach the
/// co-authorship graph. Rows are ordered by total citations, highest first.
pub fn calculate_author_stats(publications: &[Publication]) -> Vec<AuthorStats> {
    let mut citations_by_author: HashMap<String, Vec<u64>> = HashMap::new();

    for publication in publications {
        for author in publication.normalized_authors() {
            citations_by_author
                .entry(author)
                .or_default()
                .push(publication.citation_count);
        }
    }

    let mut stats: Vec<AuthorStats> = citations_by_author
        .into_iter()
        .map(|(author_id, citations)| {
            let publication_count = citations.len() as u64;
            let total_citations: u64 = citations.iter().sum();
            AuthorStats {
                author_id,
                publication_count,
                total_citations,
                avg_citations_per_paper: total_citations as f64 / publication_count as f64,
                h_index_approx: h_index(&citations),
            }
        })
        .collect();

    stats.sort_by(|a, b| {
        b.total_citations
            .cmp(&a.total_citations)
            .then_with(|| a.author_id.cmp(&b.author_id))
    });

    log::info!("Computed bibliometric statistics for {} authors", stats.len());

    stats
}

/// Highest `n` authors by the chosen column, ties broken by author id
pub fn top_authors(stats: &[AuthorStats], n: usize, by: AuthorRanking) -> Vec<&AuthorStats> {
    let key = |s: &AuthorStats| match by {
        AuthorRanking::TotalCitations => s.total_citations,
        AuthorRanking::PublicationCount => s.publication_count,
        AuthorRanking::HIndex => s.h_index_approx,
    };

    let mut ranked: Vec<&AuthorStats> = stats.iter().collect();
    ranked.sort_by(|a, b| key(b).cmp(&key(a)).then_with(|| a.author_id.cmp(&b.author_id)));
    ranked.truncate(n);
    ranked
}
