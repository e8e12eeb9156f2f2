//! CLI interface for marketpipe
//!
//! Provides subcommands for:
//! - `run`: Start the ingestion pipeline
//! - `bench`: Run the partition-pruning benchmark
//! - `status`: Show the latest value and recent history for the symbol
//! - `config`: Show the effective configuration

mod bench;
mod run;
mod status;

pub use bench::BenchArgs;
pub use run::RunArgs;
pub use status::status;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "marketpipe")]
#[command(about = "Simulated market-data feed fanned out to a latest-value store and an analytical store")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the ingestion pipeline
    Run(RunArgs),
    /// Run the partition-pruning benchmark
    Bench(BenchArgs),
    /// Show the latest value and recent history
    Status,
    /// Show the effective configuration
    Config,
}
