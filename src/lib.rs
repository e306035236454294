//! Co-authorship network analysis and author impact modelling

pub mod centrality;
pub mod cluster;
pub mod community;
pub mod config;
pub mod data;
pub mod error;
pub mod features;
pub mod graph;
pub mod impact;
pub mod model;
pub mod pipeline;
pub mod storage;

pub use config::Config;
pub use error::{AnalysisError, Result};
pub use pipeline::{run, AnalysisReport};
