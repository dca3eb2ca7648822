//! almeria CLI binary.
//!
//! Downloads price histories, builds the tidy feature table and trains the
//! baseline forward-return models.

mod cmd;
mod config;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "almeria")]
#[command(about = "Feature engineering and baseline return models for equities", long_about = None)]
#[command(version)]
struct Cli {
    /// TOML file with `[download]`, `[features]` and `[train]` sections
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download adjusted prices and volume
    Download {
        /// Ticker symbols
        #[arg(short, long, value_delimiter = ',')]
        tickers: Vec<String>,

        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,

        /// End date (YYYY-MM-DD, exclusive)
        #[arg(long)]
        end: Option<NaiveDate>,

        /// Bar interval (1d, 1wk or 1mo)
        #[arg(short, long, value_parser = config::parse_interval)]
        interval: Option<almeria_data::Interval>,

        /// Output directory for prices.csv and volume.csv
        #[arg(short, long, default_value = "data")]
        out: PathBuf,
    },

    /// Build the tidy feature table
    Features {
        /// Price panel CSV
        #[arg(short, long)]
        prices: PathBuf,

        /// Volume panel CSV
        #[arg(long)]
        volume: Option<PathBuf>,

        /// ESG score CSV
        #[arg(long)]
        esg: Option<PathBuf>,

        /// Output CSV
        #[arg(short, long, default_value = "data/features.csv")]
        out: PathBuf,
    },

    /// Train and score the baseline models
    Train {
        /// Feature table CSV
        #[arg(short, long, default_value = "data/features.csv")]
        features: PathBuf,

        /// Forward-return horizon in rows
        #[arg(short = 'H', long)]
        horizon: Option<usize>,

        /// Seed for the split and the models
        #[arg(short, long)]
        seed: Option<u64>,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Write sample ESG scores for a set of tickers
    SampleEsg {
        /// Ticker symbols
        #[arg(short, long, value_delimiter = ',', required = true)]
        tickers: Vec<String>,

        /// Random seed
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Output CSV
        #[arg(short, long, default_value = "data/esg_scores.csv")]
        out: PathBuf,
    },

    /// List the features produced by the current configuration
    List {
        /// Filter by category
        #[arg(long)]
        category: Option<String>,

        /// Show descriptions and warm-up lengths
        #[arg(long)]
        detailed: bool,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

/// Install the tracing subscriber; `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init()
        .ok();
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let settings = config::Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Download {
            tickers,
            start,
            end,
            interval,
            out,
        } => {
            let mut download = settings.download;
            if !tickers.is_empty() {
                download.tickers = tickers;
            }
            download.start = start.unwrap_or(download.start);
            download.end = end.unwrap_or(download.end);
            download.interval = interval.unwrap_or(download.interval);
            cmd::download::run(download, &out).await?;
        }
        Commands::Features {
            prices,
            volume,
            esg,
            out,
        } => {
            cmd::features::run(
                settings.features,
                &prices,
                volume.as_deref(),
                esg.as_deref(),
                &out,
            )?;
        }
        Commands::Train {
            features,
            horizon,
            seed,
            format,
        } => {
            let mut train = settings.train;
            train.horizon = horizon.unwrap_or(train.horizon);
            train.seed = seed.unwrap_or(train.seed);
            cmd::train::run(&train, &features, &format)?;
        }
        Commands::SampleEsg { tickers, seed, out } => {
            cmd::sample_esg::run(&tickers, seed, &out)?;
        }
        Commands::List { category, detailed } => {
            cmd::list::run(&settings.features, category.as_deref(), detailed)?;
        }
    }

    Ok(())
}
