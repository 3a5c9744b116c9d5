use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tracing::info;

use jobcluster::clustering::kmeans::KMeansSettings;
use jobcluster::clustering::metrics::ScorePolicy;
use jobcluster::config::{ClusteringMethod, Config};
use jobcluster::output::terminal;
use jobcluster::pipeline;
use jobcluster::pipeline::cluster::ClusterOptions;

/// Jobcluster: discover job categories in scraped postings.
///
/// Cleans the raw scrape into token lists, vectorizes the descriptions and
/// groups them with K-Means or DBSCAN.
#[derive(Parser)]
#[command(name = "jobcluster", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean the raw CSV into the processed dataset
    Preprocess,

    /// Vectorize the processed dataset and write cluster CSVs
    Cluster(ClusterArgs),

    /// Preprocess, then cluster
    Run(ClusterArgs),

    /// Show which inputs and outputs exist
    Status,
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    /// Higher is better
    Silhouette,
    /// Lower is better
    DaviesBouldin,
}

impl From<PolicyArg> for ScorePolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Silhouette => ScorePolicy::Silhouette,
            PolicyArg::DaviesBouldin => ScorePolicy::DaviesBouldin,
        }
    }
}

#[derive(Args)]
struct ClusterArgs {
    /// Smallest k tried by the sweep
    #[arg(long, default_value = "2")]
    k_min: usize,

    /// Largest k tried by the sweep (inclusive)
    #[arg(long, default_value = "20")]
    k_max: usize,

    /// Fit exactly this many clusters instead of sweeping
    #[arg(long)]
    k: Option<usize>,

    /// Score used to compare values of k
    #[arg(long, value_enum, default_value = "davies-bouldin")]
    policy: PolicyArg,

    /// Seed for K-Means initialization
    #[arg(long, default_value = "0")]
    seed: u64,

    /// K-Means restarts; the lowest-inertia run is kept
    #[arg(long, default_value = "10")]
    n_runs: usize,

    /// K-Means iteration cap per run
    #[arg(long, default_value = "300")]
    max_iterations: u64,

    /// K-Means convergence tolerance
    #[arg(long, default_value = "1e-4")]
    tolerance: f64,

    /// DBSCAN neighborhood radius
    #[arg(long, default_value = "0.5")]
    eps: f64,

    /// DBSCAN minimum neighbors for a core point
    #[arg(long, default_value = "2")]
    min_samples: usize,

    /// Values per line in the word-vector file
    #[arg(long, default_value = "100")]
    embedding_dim: usize,
}

impl ClusterArgs {
    fn options(&self) -> Result<ClusterOptions> {
        if self.k_min > self.k_max {
            anyhow::bail!("--k-min ({}) is larger than --k-max ({})", self.k_min, self.k_max);
        }
        if self.embedding_dim == 0 {
            anyhow::bail!("--embedding-dim must be positive");
        }
        Ok(ClusterOptions {
            k_min: self.k_min,
            k_max: self.k_max,
            fixed_k: self.k,
            policy: self.policy.into(),
            kmeans: KMeansSettings {
                seed: self.seed,
                n_runs: self.n_runs,
                max_iterations: self.max_iterations,
                tolerance: self.tolerance,
            },
            eps: self.eps,
            min_samples: self.min_samples,
        })
    }
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("jobcluster=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Preprocess => {
            let config = Config::load()?;
            preprocess(&config)?;
        }

        Commands::Cluster(args) => {
            let mut config = Config::load()?;
            config.embedding_dim = args.embedding_dim;
            let options = args.options()?;
            if !config.processed_path.exists() {
                anyhow::bail!(
                    "Processed dataset not found at {}\nRun `jobcluster preprocess` first.",
                    config.processed_path.display()
                );
            }
            cluster(&config, &options)?;
        }

        Commands::Run(args) => {
            let mut config = Config::load()?;
            config.embedding_dim = args.embedding_dim;
            let options = args.options()?;
            // Fail on a missing word-vector file before spending time on preprocessing
            config.require_embeddings()?;
            preprocess(&config)?;
            cluster(&config, &options)?;
        }

        Commands::Status => {
            let config = Config::load()?;
            jobcluster::status::show(&config)?;
        }
    }

    Ok(())
}

fn preprocess(config: &Config) -> Result<()> {
    config.require_raw()?;
    info!(path = %config.raw_path.display(), "Preprocessing raw postings");
    println!("Cleaning {}...", config.raw_path.display());

    let stats = pipeline::preprocess::run(&config.raw_path, &config.processed_path)?;
    terminal::display_preprocess_stats(&stats);

    println!(
        "\n{} {}",
        "Processed dataset written to".bold(),
        config.processed_path.display()
    );
    Ok(())
}

fn cluster(config: &Config, options: &ClusterOptions) -> Result<()> {
    let run = pipeline::cluster::run(config, options)?;

    if let Some(selection) = &run.selection {
        terminal::display_selection(selection);
        println!(
            "\n{} k={} ({} score {:.4})",
            "Best".bold(),
            selection.best_k,
            selection.policy.as_str(),
            selection.best_score
        );
    }
    terminal::display_cluster_summary(&run);

    if run.method == ClusteringMethod::Dbscan && run.assignments.iter().all(|a| a.is_noise()) {
        println!(
            "{}",
            "Every posting was labeled noise. Try a larger --eps or smaller --min-samples."
                .yellow()
        );
    }
    Ok(())
}
