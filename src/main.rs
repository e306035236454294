use anyhow::Result;
use clap::Parser;

use coauthor_impact::config::{ClusteringAlgorithm, CommunityAlgorithm, Config};
use coauthor_impact::data::{loader, AuthorRanking};
use coauthor_impact::{pipeline, storage};

#[derive(Parser, Debug)]
#[clap(
    name = "coauthor-impact",
    about = "Co-authorship network analysis and author impact modelling"
)]
struct Cli {
    /// Path to a JSON array of publications
    #[clap(long)]
    input: String,

    /// Optional JSON array of precomputed author statistics
    #[clap(long)]
    stats: Option<String>,

    /// Optional JSON configuration file; flags below override it
    #[clap(long)]
    config: Option<String>,

    /// Output directory for results
    #[clap(long, default_value = "impact_results")]
    output_dir: String,

    /// Community detection algorithm
    #[clap(long, value_enum)]
    community: Option<CommunityAlgorithm>,

    /// Author clustering algorithm
    #[clap(long, value_enum)]
    clustering: Option<ClusteringAlgorithm>,

    /// Number of author clusters for k-means
    #[clap(long)]
    clusters: Option<usize>,

    /// Held-out fraction for citation prediction (0.0-1.0)
    #[clap(long)]
    test_fraction: Option<f64>,

    /// Seed shared by every stochastic stage
    #[clap(long)]
    seed: Option<u64>,

    /// Bibliometric column used for the top-authors list
    #[clap(long, value_enum)]
    rank_authors_by: Option<AuthorRanking>,

    /// Fail instead of writing empty tables when no co-authorships exist
    #[clap(long)]
    require_edges: bool,

    /// Number of worker threads (0 = use all available cores)
    #[clap(long, default_value = "0")]
    threads: usize,

    /// Verbose logging
    #[clap(long, short)]
    verbose: bool,
}

impl Cli {
    fn resolve_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_json_file(path)?,
            None => Config::default(),
        };

        if let Some(algorithm) = self.community {
            config.community.algorithm = algorithm;
        }
        if let Some(algorithm) = self.clustering {
            config.clustering.algorithm = algorithm;
        }
        if let Some(k) = self.clusters {
            config.clustering.n_clusters = k;
        }
        if let Some(fraction) = self.test_fraction {
            config.prediction.test_fraction = fraction;
        }
        if let Some(seed) = self.seed {
            config.community.seed = seed;
            config.prediction.seed = seed;
            config.clustering.seed = seed;
        }
        if let Some(ranking) = self.rank_authors_by {
            config.report.author_ranking = ranking;
        }
        if self.require_edges {
            config.graph.require_edges = true;
        }

        Ok(config)
    }
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Cli::parse();

    // Configure logging
    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    // Set number of threads
    let num_threads = if args.threads > 0 {
        args.threads
    } else {
        num_cpus::get()
    };

    log::info!("Using {} worker threads", num_threads);
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()?;

    let config = args.resolve_config()?;

    log::info!("Starting co-authorship impact analysis");
    log::info!("Input: {}", args.input);
    log::info!("Output: {}", args.output_dir);

    // 1. Load data
    let publications = loader::load_publications(&args.input)?;
    let stats = match &args.stats {
        Some(path) => Some(loader::load_author_stats(path)?),
        None => None,
    };

    // 2. Analyse
    let report = pipeline::run(&publications, stats, &config)?;

    // 3. Save results
    storage::save_results(&report, &args.output_dir)?;

    if let Some(prediction) = &report.prediction {
        log::info!("Best citation model: {}", prediction.best_model);
    }
    for record in &report.top_influential {
        log::info!(
            "  {:30} impact {:6.2}",
            record.features.author_id,
            record.impact_score
        );
    }

    log::info!("Analysis complete. Results saved to {}", args.output_dir);

    Ok(())
}
