//! Cabarete CLI binary.
//!
//! Drives the research toolkit end to end: synthetic or fetched data
//! snapshots, walk-forward backtests, single weekly steps, factor IC
//! telemetry, and adaptive factor weighting.

mod cmd;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "cabarete")]
#[command(about = "Factor-investing research toolkit", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a synthetic demo snapshot
    Demo {
        /// Number of simulated rebalance weeks (after warmup)
        #[arg(short, long, default_value = "12")]
        weeks: usize,

        /// Snapshot id (defaults to a timestamped id)
        #[arg(long)]
        id: Option<String>,

        /// Snapshot base directory
        #[arg(long, default_value = "data/snapshots")]
        out: PathBuf,
    },

    /// Fetch a snapshot from the market-data API
    Fetch {
        /// Ticker symbols
        #[arg(short, long, value_delimiter = ',', required = true)]
        symbols: Vec<String>,

        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: String,

        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: String,

        /// Snapshot id (defaults to a timestamped id)
        #[arg(long)]
        id: Option<String>,

        /// Snapshot base directory
        #[arg(long, default_value = "data/snapshots")]
        out: PathBuf,
    },

    /// Run a walk-forward backtest on a snapshot
    Backtest {
        /// Snapshot directory
        #[arg(short, long)]
        snapshot: PathBuf,

        /// Engine implementation (scalar or vectorized)
        #[arg(short, long, default_value = "scalar")]
        engine: String,

        /// Portfolio size
        #[arg(long)]
        top_k: Option<usize>,

        /// Per-name weight cap
        #[arg(long)]
        name_cap: Option<f64>,

        /// Per-sector weight cap
        #[arg(long)]
        sector_cap: Option<f64>,

        /// Flat weekly cost assumption in basis points
        #[arg(long)]
        cost_bps: Option<f64>,

        /// Warmup periods before the first rebalance
        #[arg(long, default_value = "13")]
        warmup: usize,

        /// Run registry directory
        #[arg(long, default_value = "runs")]
        runs_dir: PathBuf,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Run a single weekly rebalance step on a snapshot's latest date
    Weekly {
        /// Snapshot directory
        #[arg(short, long)]
        snapshot: PathBuf,

        /// Portfolio size
        #[arg(long)]
        top_k: Option<usize>,

        /// Warmup periods before the step
        #[arg(long, default_value = "13")]
        warmup: usize,
    },

    /// Compute factor IC telemetry artifacts from a snapshot
    Telemetry {
        /// Snapshot directory
        #[arg(short, long)]
        snapshot: PathBuf,

        /// Factors to evaluate (defaults to the whole library)
        #[arg(short, long, value_delimiter = ',')]
        factors: Vec<String>,

        /// Run registry directory
        #[arg(long, default_value = "runs")]
        runs_dir: PathBuf,
    },

    /// Derive adaptive factor weights from the latest IC telemetry
    Weights {
        /// Run registry directory holding telemetry artifacts
        #[arg(long, default_value = "runs")]
        runs_dir: PathBuf,

        /// Snapshot directory used for the benchmark regime series
        #[arg(short, long)]
        snapshot: Option<PathBuf>,

        /// EMA smoothing factor on the IC series
        #[arg(long, default_value = "0.2")]
        alpha: f64,

        /// Factors to weight (defaults to everything found)
        #[arg(short, long, value_delimiter = ',')]
        factors: Vec<String>,
    },

    /// List stored snapshots
    Snapshots {
        /// Snapshot base directory
        #[arg(long, default_value = "data/snapshots")]
        dir: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Demo { weeks, id, out } => cmd::demo::run(weeks, id, &out),
        Commands::Fetch {
            symbols,
            from,
            to,
            id,
            out,
        } => cmd::fetch::run(&symbols, &from, &to, id, &out).await,
        Commands::Backtest {
            snapshot,
            engine,
            top_k,
            name_cap,
            sector_cap,
            cost_bps,
            warmup,
            runs_dir,
            format,
        } => cmd::backtest::run(
            &snapshot,
            &engine,
            cmd::backtest::ParamOverrides {
                top_k,
                name_cap,
                sector_cap,
                cost_bps,
            },
            warmup,
            &runs_dir,
            &format,
        ),
        Commands::Weekly {
            snapshot,
            top_k,
            warmup,
        } => cmd::weekly::run(&snapshot, top_k, warmup),
        Commands::Telemetry {
            snapshot,
            factors,
            runs_dir,
        } => cmd::telemetry::run(&snapshot, &factors, &runs_dir),
        Commands::Weights {
            runs_dir,
            snapshot,
            alpha,
            factors,
        } => cmd::weights::run(&runs_dir, snapshot.as_deref(), alpha, &factors),
        Commands::Snapshots { dir } => cmd::snapshots::run(&dir),
    }
}
