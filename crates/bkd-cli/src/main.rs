//! bkd-cli entry point.
//!
//! Intentionally thin: parse arguments, set up tracing, delegate to
//! [`run::run`]. All orchestration lives in `run.rs`.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

mod run;

#[derive(Debug, Parser)]
#[command(name = "bkd")]
#[command(about = "Thematic basket generator", long_about = None)]
struct Cli {
    /// Income used to size the per-basket budget (must be > 0).
    income: f64,

    /// Risk appetite: low | medium | high (case-insensitive). Unknown
    /// labels proceed with the medium multiplier.
    risk: String,

    /// Directory containing the theme CSV files.
    #[arg(long, default_value = ".")]
    data_dir: PathBuf,

    /// Output artifact path.
    #[arg(long, default_value = "baskets.json")]
    out: PathBuf,

    /// Theme CSV file name, relative to --data-dir (repeatable;
    /// defaults to the built-in theme set).
    #[arg(long = "theme")]
    themes: Vec<String>,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    run::run(
        cli.income,
        &cli.risk,
        &cli.data_dir,
        &cli.out,
        &cli.themes,
    )
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}
