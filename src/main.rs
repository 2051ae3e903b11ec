//! facies-engine - well-log facies classification from the command line
//!
//! Loads a CSV log table, runs one analysis and prints the result as JSON.
//!
//! # Usage
//!
//! ```bash
//! # Four k-means facies from gamma ray and bulk density
//! facies-engine classify --csv well.csv --features GR,RHOB -k 4
//!
//! # SSE curve for k = 2..10
//! facies-engine optimal-k --csv well.csv --features GR,RHOB,NPHI
//!
//! # 1-NN against a cored reference well
//! facies-engine supervised --csv well.csv --features GR,RHOB \
//!     --training-csv core.csv --training-label LITH
//! ```
//!
//! # Environment Variables
//!
//! - `FACIES_CONFIG`: Path to a facies_config.toml (default: ./facies_config.toml)
//! - `RUST_LOG`: Logging level (default: info). Logs go to stderr.

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

use facies_engine::acquisition::{load_csv, CsvOptions};
use facies_engine::config::{self, Algorithm, FaciesConfig, NormalizationMode};
use facies_engine::types::{DepthRange, LogTable};
use facies_engine::{run_facies_analysis, run_optimal_k_analysis, run_supervised_facies_analysis};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "facies-engine")]
#[command(about = "Well-log facies classification")]
#[command(version)]
struct CliArgs {
    #[command(subcommand)]
    command: SubCommand,
}

#[derive(clap::Subcommand, Debug)]
enum SubCommand {
    /// Unsupervised classification (k-means, hierarchical or SOM)
    Classify {
        #[command(flatten)]
        input: InputArgs,
    },
    /// SSE for each k in the configured sweep
    OptimalK {
        #[command(flatten)]
        input: InputArgs,
    },
    /// 1-NN classification against a labelled reference table
    Supervised {
        #[command(flatten)]
        input: InputArgs,

        /// CSV with reference labels
        #[arg(long, value_name = "PATH")]
        training_csv: PathBuf,

        /// Depth column in the reference table
        #[arg(long, default_value = "DEPTH")]
        training_depth: String,

        /// Label column in the reference table
        #[arg(long, default_value = "FACIES")]
        training_label: String,
    },
}

#[derive(clap::Args, Debug)]
struct InputArgs {
    /// Log table to classify
    #[arg(long, value_name = "PATH")]
    csv: PathBuf,

    /// Feature curves, comma separated (e.g. GR,RHOB,NPHI)
    #[arg(long, value_delimiter = ',', required = true)]
    features: Vec<String>,

    /// Depth curve name
    #[arg(long, default_value = "DEPTH")]
    depth_curve: String,

    /// Shallowest depth to include
    #[arg(long)]
    min_depth: Option<f64>,

    /// Deepest depth to include
    #[arg(long)]
    max_depth: Option<f64>,

    /// Config file (overrides FACIES_CONFIG and ./facies_config.toml)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Clustering backend: kmeans, hierarchical, som
    #[arg(long)]
    algorithm: Option<Algorithm>,

    /// Number of facies
    #[arg(short)]
    k: Option<usize>,

    /// Feature scaling: min-max, z-score, none
    #[arg(long)]
    normalization: Option<NormalizationMode>,

    /// Random seed for k-means reseeding and SOM initialisation
    #[arg(long)]
    seed: Option<u64>,

    /// Numeric null sentinel in the CSV
    #[arg(long, default_value_t = config::defaults::LAS_NULL_VALUE, allow_negative_numbers = true)]
    null_value: f64,
}

impl InputArgs {
    fn depth_range(&self) -> DepthRange {
        let full = DepthRange::unbounded();
        DepthRange::new(
            self.min_depth.unwrap_or(full.min),
            self.max_depth.unwrap_or(full.max),
        )
    }

    fn csv_options(&self) -> CsvOptions {
        CsvOptions {
            null_value: Some(self.null_value),
            ..CsvOptions::default()
        }
    }

    /// File config (or the standard search) with command-line overrides applied.
    fn resolve_config(&self) -> Result<FaciesConfig> {
        let mut cfg = match &self.config {
            Some(path) => FaciesConfig::load_from_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => FaciesConfig::load(),
        };
        if let Some(algorithm) = self.algorithm {
            cfg.analysis.algorithm = algorithm;
        }
        if let Some(k) = self.k {
            cfg.analysis.k = k;
        }
        if let Some(normalization) = self.normalization {
            cfg.analysis.normalization = normalization;
        }
        if let Some(seed) = self.seed {
            cfg.analysis.seed = seed;
        }
        cfg.validate().context("invalid analysis parameters")?;
        Ok(cfg)
    }
}

fn main() -> Result<()> {
    // Logs on stderr so stdout stays valid JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();

    match args.command {
        SubCommand::Classify { input } => {
            let (table, cfg) = prepare(&input)?;
            let result = run_facies_analysis(
                &table,
                &input.features,
                &input.depth_curve,
                input.depth_range(),
                cfg,
            )?;
            print_json(&result)
        }
        SubCommand::OptimalK { input } => {
            let (table, cfg) = prepare(&input)?;
            let result = run_optimal_k_analysis(
                &table,
                &input.features,
                &input.depth_curve,
                input.depth_range(),
                cfg,
            )?;
            print_json(&result)
        }
        SubCommand::Supervised {
            input,
            training_csv,
            training_depth,
            training_label,
        } => {
            let (table, cfg) = prepare(&input)?;
            let training = read_table(&training_csv, &input.csv_options())?;
            let result = run_supervised_facies_analysis(
                &table,
                &input.features,
                &input.depth_curve,
                input.depth_range(),
                &training,
                &training_depth,
                &training_label,
                cfg,
            )?;
            print_json(&result)
        }
    }
}

/// Resolve and install the global config, then load the table to classify.
fn prepare(input: &InputArgs) -> Result<(LogTable, &'static FaciesConfig)> {
    config::init(input.resolve_config()?);
    let cfg = config::get();
    info!(
        algorithm = %cfg.analysis.algorithm,
        k = cfg.analysis.k,
        normalization = %cfg.analysis.normalization,
        seed = cfg.analysis.seed,
        "Analysis parameters"
    );
    let table = read_table(&input.csv, &input.csv_options())?;
    Ok((table, cfg))
}

fn read_table(path: &Path, options: &CsvOptions) -> Result<LogTable> {
    load_csv(path, options).with_context(|| format!("reading log table {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serializing result")?;
    println!("{json}");
    Ok(())
}
