//! Bench command implementation

use crate::bench::PartitionBench;
use crate::config::Config;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct BenchArgs {
    /// Doubling rounds for dataset amplification (default from config)
    #[arg(long)]
    pub rounds: Option<usize>,

    /// Output directory for the partitioned layout (default from config)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

impl BenchArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let bench = PartitionBench::new(
            &config.history.path,
            config.simulation.symbol.as_str(),
            self.rounds.unwrap_or(config.bench.doubling_rounds),
            self.output
                .clone()
                .unwrap_or_else(|| config.bench.output_dir.clone()),
        );

        let report = bench.run()?;

        tracing::info!(
            rows = report.full_scan_rows,
            duration_ms = report.full_scan.as_secs_f64() * 1000.0,
            "unpartitioned query"
        );
        tracing::info!(
            rows = report.pruned_scan_rows,
            duration_ms = report.pruned_scan.as_secs_f64() * 1000.0,
            "partition-pruned query"
        );

        if report.counts_match() {
            tracing::info!(speedup = report.speedup(), "benchmark complete");
        } else {
            tracing::warn!(
                full_scan_rows = report.full_scan_rows,
                pruned_scan_rows = report.pruned_scan_rows,
                "partitioned layout disagrees with source table"
            );
        }

        Ok(())
    }
}
