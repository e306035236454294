//! Results persistence

use anyhow::Result;
use petgraph::dot::Dot;
use serde::Serialize;
use serde_json::{json, to_string_pretty};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use crate::pipeline::AnalysisReport;

/// Save every analysis table to the specified directory
pub fn save_results(report: &AnalysisReport, output_dir: impl AsRef<Path>) -> Result<()> {
    let output_dir = output_dir.as_ref();
    log::info!("Saving analysis results to {}", output_dir.display());

    fs::create_dir_all(output_dir)?;

    save_summary(report, output_dir)?;
    write_json(output_dir, "network_metrics.json", &report.metrics)?;
    write_json(output_dir, "communities.json", &report.communities)?;
    write_json(output_dir, "impact_scores.json", &report.impact.rows)?;

    if let Some(prediction) = &report.prediction {
        write_json(output_dir, "prediction_report.json", prediction)?;
    }
    if let Some(clusters) = &report.clusters {
        write_json(output_dir, "clusters.json", clusters)?;
    }

    save_dot(report, output_dir)?;

    log::info!("Results saved successfully");

    Ok(())
}

fn write_json<T: Serialize + ?Sized>(output_dir: &Path, name: &str, value: &T) -> Result<()> {
    let path = output_dir.join(name);
    log::debug!("Writing {}", path.display());
    let mut file = File::create(path)?;
    file.write_all(to_string_pretty(value)?.as_bytes())?;
    Ok(())
}

/// Save summary information
fn save_summary(report: &AnalysisReport, output_dir: &Path) -> Result<()> {
    log::info!("Saving summary information");

    // Degree distribution, 0-100+ buckets
    let mut degree_dist = vec![0usize; 101];
    for row in &report.metrics.rows {
        degree_dist[row.degree.min(100)] += 1;
    }

    let summary = json!({
        "graph_stats": {
            "node_count": report.summary.node_count,
            "edge_count": report.summary.edge_count,
            "total_weight": report.summary.total_weight,
            "density": report.summary.density,
            "avg_degree": report.summary.average_degree,
            "component_count": report.summary.component_count,
            "largest_component": report.summary.largest_component,
            "degree_distribution": degree_dist,
        },
        "metrics": {
            "eigenvector_failed_components": report.metrics.eigenvector_failures,
            "pagerank_converged": report.metrics.pagerank_converged,
        },
        "community_stats": {
            "algorithm": report.communities.algorithm,
            "community_count": report.communities.community_count(),
            "modularity": report.communities.modularity,
            "largest_community_size": report.communities.communities.first().map_or(0, |c| c.size),
        },
        "fused_authors": report.features.len(),
        "authors_with_statistics": report.author_stats.len(),
        "top_connectors": report.top_connectors,
        "top_influential": report.top_influential,
        "top_authors": report.top_authors,
        "prediction": report.prediction.as_ref().map(|p| json!({
            "best_model": p.best_model,
            "r2_score": p.best().map(|r| r.r2_score),
            "rmse": p.best().map(|r| r.rmse),
            "failed_models": p.failures.len(),
        })),
        "prediction_error": report.prediction_error,
        "clustering": report.clusters.as_ref().map(|c| json!({
            "algorithm": c.algorithm,
            "effective_clusters": c.effective_clusters,
            "noise_points": c.noise_points,
            "explained_variance_ratio": c.explained_variance_ratio,
        })),
        "clustering_error": report.clustering_error,
    });

    write_json(output_dir, "summary.json", &summary)
}

/// Graphviz rendering of the co-authorship graph, edges labelled by weight
fn save_dot(report: &AnalysisReport, output_dir: &Path) -> Result<()> {
    let view = report.graph.to_petgraph();
    let path = output_dir.join("coauthorship.dot");
    let mut file = File::create(path)?;
    write!(file, "{}", Dot::new(&view))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::data::Publication;
    use crate::pipeline;

    #[test]
    fn writes_every_table() {
        let publications: Vec<Publication> = (0..12)
            .map(|i| {
                Publication::new(
                    format!("Paper {}", i),
                    vec![format!("Author {}", i % 5), format!("Author {}", (i + 1) % 5), "Lead".to_string()],
                    (i * 3) as u64,
                )
            })
            .collect();
        let report = pipeline::run(&publications, None, &Config::default()).unwrap();

        let dir = tempfile::tempdir().unwrap();
        save_results(&report, dir.path()).unwrap();

        for name in [
            "summary.json",
            "network_metrics.json",
            "communities.json",
            "impact_scores.json",
            "prediction_report.json",
            "clusters.json",
            "coauthorship.dot",
        ] {
            assert!(dir.path().join(name).exists(), "missing {}", name);
        }

        let summary: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join("summary.json")).unwrap()).unwrap();
        assert_eq!(summary["graph_stats"]["node_count"], 6);
        assert!(fs::read_to_string(dir.path().join("coauthorship.dot")).unwrap().contains("graph {"));
    }
}
