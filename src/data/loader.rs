//! JSON input handling for publication and author-statistics records

use std::path::Path;

use anyhow::{Context, Result};

use crate::data::{normalize_author_name, AuthorStats, Publication};

/// Load publications from a JSON array, dropping records with a blank title
pub fn load_publications(path: impl AsRef<Path>) -> Result<Vec<Publication>> {
    let path = path.as_ref();
    log::info!("Reading publications: {}", path.display());

    if !path.exists() {
        return Err(anyhow::anyhow!("File not found: {}", path.display()));
    }

    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let publications: Vec<Publication> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing publications in {}", path.display()))?;

    let total = publications.len();
    let publications: Vec<Publication> = publications
        .into_iter()
        .filter(|p| !p.title.trim().is_empty())
        .collect();

    log::info!(
        "Loaded {} publications ({} skipped with empty titles)",
        publications.len(),
        total - publications.len()
    );

    Ok(publications)
}

/// Load externally computed author statistics from a JSON array
pub fn load_author_stats(path: impl AsRef<Path>) -> Result<Vec<AuthorStats>> {
    let path = path.as_ref();
    log::info!("Reading author statistics: {}", path.display());

    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let mut stats: Vec<AuthorStats> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing author statistics in {}", path.display()))?;

    // Match the graph's node ids
    for row in &mut stats {
        row.author_id = normalize_author_name(&row.author_id);
    }
    let total = stats.len();
    stats.retain(|row| !row.author_id.is_empty());
    if stats.len() < total {
        log::warn!("Dropped {} author statistics rows with blank ids", total - stats.len());
    }

    log::info!("Loaded statistics for {} authors", stats.len());

    Ok(stats)
}
