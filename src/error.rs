//! Error types for the analysis pipeline

use thiserror::Error;

/// Failures raised by the analysis stages
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Malformed or insufficient records for the requested operation
    #[error("Data shape error: {0}")]
    DataShape(String),

    /// An iterative algorithm hit its iteration cap
    #[error("{algorithm} failed to converge within {iterations} iterations")]
    Convergence { algorithm: &'static str, iterations: usize },

    /// An optional capability was not compiled in
    #[error("{0} is not available in this build")]
    LibraryUnavailable(&'static str),

    /// The co-authorship graph has no edges
    #[error("Co-authorship graph is empty: no publication has two or more authors")]
    EmptyGraph,

    /// Model training failed for a reason other than shape
    #[error("Training {model} failed: {message}")]
    Training { model: String, message: String },

    #[error("Clustering error: {0}")]
    Clustering(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
