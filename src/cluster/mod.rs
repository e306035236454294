//! Author clustering in standardized feature space

pub mod projection;

use std::collections::BTreeMap;

use linfa::dataset::AsTargets;
use linfa::traits::{Fit, Predict, Transformer};
use linfa::DatasetBase;
use linfa_clustering::{Dbscan, KMeans, KMeansInit};
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::config::{ClusteringAlgorithm, ClusteringConfig};
use crate::error::{AnalysisError, Result};
use crate::features::{feature_matrix, AuthorFeatureVector, Feature, ScalerParams};

pub use projection::{project_2d, Projection};

/// Cluster membership and plot position for one author
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterAssignment {
    pub author_id: String,
    /// `None` marks density-based noise
    pub cluster_id: Option<usize>,
    pub x: f64,
    pub y: f64,
}

/// Size and mean raw feature values of one cluster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterProfile {
    pub cluster_id: usize,
    pub size: usize,
    pub feature_means: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterReport {
    pub algorithm: String,
    pub requested_clusters: usize,
    /// Clusters actually formed: the clamped k for k-means, the number of
    /// dense groups for DBSCAN
    pub effective_clusters: usize,
    pub assignments: Vec<ClusterAssignment>,
    pub profiles: Vec<ClusterProfile>,
    pub noise_points: usize,
    pub explained_variance_ratio: [f64; 2],
}

impl ClusterReport {
    pub fn cluster_of(&self, author: &str) -> Option<usize> {
        self.assignments
            .iter()
            .find(|a| a.author_id == author)
            .and_then(|a| a.cluster_id)
    }
}

pub struct ClusteringEngine {
    config: ClusteringConfig,
}

impl ClusteringEngine {
    pub fn new(config: ClusteringConfig) -> Self {
        Self { config }
    }

    pub fn cluster_authors(&self, rows: &[AuthorFeatureVector]) -> Result<ClusterReport> {
        let algorithm = match self.config.algorithm {
            ClusteringAlgorithm::KMeans => "kmeans",
            ClusteringAlgorithm::Dbscan => "dbscan",
        };

        if rows.is_empty() {
            log::warn!("No fused authors to cluster");
            return Ok(ClusterReport {
                algorithm: algorithm.to_string(),
                requested_clusters: self.config.n_clusters,
                ..Default::default()
            });
        }

        let raw = feature_matrix(rows, &Feature::PREDICTORS);
        let (_, standardized) = ScalerParams::fit_transform(&raw);

        let (labels, effective_clusters) = match self.config.algorithm {
            ClusteringAlgorithm::KMeans => {
                let k = self.clamped_cluster_count(rows.len())?;
                (self.kmeans(&standardized, k)?, k)
            }
            ClusteringAlgorithm::Dbscan => {
                let labels = self.dbscan(&standardized)?;
                let count = labels.iter().flatten().max().map_or(0, |&max| max + 1);
                (labels, count)
            }
        };

        let projection = project_2d(&standardized);
        let noise_points = labels.iter().filter(|l| l.is_none()).count();

        let assignments: Vec<ClusterAssignment> = rows
            .iter()
            .zip(&labels)
            .zip(&projection.coordinates)
            .map(|((row, &cluster_id), &(x, y))| ClusterAssignment {
                author_id: row.author_id.clone(),
                cluster_id,
                x,
                y,
            })
            .collect();

        let profiles = profile_clusters(rows, &labels);

        log::info!(
            "Clustered {} authors into {} groups with {} ({} noise points)",
            rows.len(),
            profiles.len(),
            algorithm,
            noise_points
        );

        Ok(ClusterReport {
            algorithm: algorithm.to_string(),
            requested_clusters: self.config.n_clusters,
            effective_clusters,
            assignments,
            profiles,
            noise_points,
            explained_variance_ratio: projection.explained_variance_ratio,
        })
    }

    fn clamped_cluster_count(&self, samples: usize) -> Result<usize> {
        let requested = self.config.n_clusters;
        if requested == 0 {
            return Err(AnalysisError::Clustering("cluster count must be at least 1".into()));
        }
        if requested > samples {
            log::warn!(
                "Requested {} clusters but only {} authors are available; using {}",
                requested,
                samples,
                samples
            );
            return Ok(samples);
        }
        Ok(requested)
    }

    fn kmeans(&self, data: &Array2<f64>, k: usize) -> Result<Vec<Option<usize>>> {
        let dataset = DatasetBase::from(data.clone());
        let rng = StdRng::seed_from_u64(self.config.seed);

        let model = KMeans::params_with_rng(k, rng)
            .init_method(KMeansInit::Random)
            .n_runs(self.config.n_runs.max(1))
            .max_n_iterations(self.config.max_iterations)
            .tolerance(self.config.tolerance)
            .fit(&dataset)
            .map_err(|e| AnalysisError::Clustering(format!("K-Means fit failed: {:?}", e)))?;

        let predictions = model.predict(&dataset);
        Ok(predictions.as_targets().iter().map(|&label| Some(label)).collect())
    }

    fn dbscan(&self, data: &Array2<f64>) -> Result<Vec<Option<usize>>> {
        let dataset = DatasetBase::from(data.clone());

        let clusters = Dbscan::params(self.config.dbscan_min_points)
            .tolerance(self.config.dbscan_epsilon)
            .transform(dataset)
            .map_err(|e| AnalysisError::Clustering(format!("DBSCAN failed: {:?}", e)))?;

        Ok(clusters.targets().iter().copied().collect())
    }
}

/// Mean unstandardized predictor values per cluster, ordered by cluster id
fn profile_clusters(rows: &[AuthorFeatureVector], labels: &[Option<usize>]) -> Vec<ClusterProfile> {
    let mut members: BTreeMap<usize, Vec<&AuthorFeatureVector>> = BTreeMap::new();
    for (row, label) in rows.iter().zip(labels) {
        if let Some(id) = label {
            members.entry(*id).or_default().push(row);
        }
    }

    members
        .into_iter()
        .map(|(cluster_id, rows)| {
            let size = rows.len();
            let feature_means = Feature::PREDICTORS
                .iter()
                .map(|&feature| {
                    let mean = rows.iter().map(|row| row.value(feature)).sum::<f64>() / size as f64;
                    (feature.name().to_string(), mean)
                })
                .collect();
            ClusterProfile {
                cluster_id,
                size,
                feature_means,
            }
        })
        .collect()
}
