//! Partition-pruning benchmark
//!
//! One-shot measurement tool over the historical store: amplifies the
//! ticks table into a scratch table, times a filter-and-count query as a
//! full scan, re-materializes the data as hive-partitioned Parquet, and
//! times the same query with partition pruning. Any step failure aborts
//! the run; stale partition output is discarded before each attempt so a
//! failed run's leftovers are never mistaken for a complete layout.

use crate::telemetry::{self, CounterMetric, GaugeMetric, LatencyMetric};
use anyhow::{bail, Context};
use duckdb::{params, Connection};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Scratch table the source rows are amplified into.
const SCRATCH_TABLE: &str = "bench_ticks";

/// Offline benchmark over a historical store database file.
pub struct PartitionBench {
    db_path: PathBuf,
    symbol: String,
    rounds: usize,
    output_dir: PathBuf,
}

/// Timings and row counts from one benchmark run
#[derive(Debug, Clone)]
pub struct BenchReport {
    /// Rows in the amplified scratch table
    pub amplified_rows: i64,
    /// Wall-clock duration of the unpartitioned filter-and-count
    pub full_scan: Duration,
    /// Rows matched by the unpartitioned query
    pub full_scan_rows: i64,
    /// Wall-clock duration of the partition-pruned filter-and-count
    pub pruned_scan: Duration,
    /// Rows matched by the pruned query
    pub pruned_scan_rows: i64,
}

impl BenchReport {
    /// Both layouts must agree on the filtered row count.
    pub fn counts_match(&self) -> bool {
        self.full_scan_rows == self.pruned_scan_rows
    }

    /// Full-scan duration as a multiple of the pruned duration.
    pub fn speedup(&self) -> f64 {
        let pruned = self.pruned_scan.as_secs_f64();
        if pruned == 0.0 {
            return f64::INFINITY;
        }
        self.full_scan.as_secs_f64() / pruned
    }
}

impl PartitionBench {
    /// Create a benchmark over `db_path`, filtering on `symbol`,
    /// amplifying for `rounds` doubling rounds, writing partitions to
    /// `output_dir`.
    pub fn new(
        db_path: impl Into<PathBuf>,
        symbol: impl Into<String>,
        rounds: usize,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            db_path: db_path.into(),
            symbol: symbol.into(),
            rounds,
            output_dir: output_dir.into(),
        }
    }

    /// Directory the partitioned layout is written to.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Run all steps in order and return the report.
    pub fn run(&self) -> anyhow::Result<BenchReport> {
        let conn = Connection::open(&self.db_path)
            .with_context(|| format!("opening {}", self.db_path.display()))?;

        let amplified_rows = self.amplify(&conn)?;
        let (full_scan_rows, full_scan) = self.time_full_scan(&conn)?;
        self.materialize_partitions(&conn)?;
        let (pruned_scan_rows, pruned_scan) = self.time_pruned_scan(&conn)?;

        telemetry::increment(CounterMetric::BenchRuns);

        Ok(BenchReport {
            amplified_rows,
            full_scan,
            full_scan_rows,
            pruned_scan,
            pruned_scan_rows,
        })
    }

    /// Copy the ticks table into the scratch table, then double it by
    /// self-union for the configured number of rounds.
    fn amplify(&self, conn: &Connection) -> anyhow::Result<i64> {
        tracing::info!(rounds = self.rounds, "amplifying historical data into scratch table");

        conn.execute_batch(&format!(
            "CREATE OR REPLACE TABLE {SCRATCH_TABLE} AS SELECT * FROM ticks"
        ))
        .context("creating scratch table from ticks")?;

        for _ in 0..self.rounds {
            conn.execute(
                &format!("INSERT INTO {SCRATCH_TABLE} SELECT * FROM {SCRATCH_TABLE}"),
                [],
            )
            .context("doubling scratch table")?;
        }

        let rows: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {SCRATCH_TABLE}"), [], |r| {
            r.get(0)
        })?;

        if rows == 0 {
            bail!("historical table is empty; run the ingestion pipeline first");
        }

        telemetry::set_gauge(GaugeMetric::AmplifiedRows, rows as f64);
        tracing::info!(rows, "scratch table ready");
        Ok(rows)
    }

    /// Filter-and-count against the scratch table. With no physical
    /// pruning structure this necessarily scans every row.
    fn time_full_scan(&self, conn: &Connection) -> anyhow::Result<(i64, Duration)> {
        tracing::info!("running unpartitioned query");
        let started = Instant::now();
        let rows: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM {SCRATCH_TABLE} WHERE symbol = ?"),
            params![self.symbol],
            |r| r.get(0),
        )?;
        let elapsed = started.elapsed();
        telemetry::record_latency(LatencyMetric::FullScan, elapsed);
        Ok((rows, elapsed))
    }

    /// Re-encode the scratch table as one Parquet file group per symbol,
    /// hive-style. Discards any previous output first, so reruns never
    /// merge with stale partitions.
    fn materialize_partitions(&self, conn: &Connection) -> anyhow::Result<()> {
        self.clear_output()?;

        tracing::info!(dir = %self.output_dir.display(), "writing partitioned parquet files");
        conn.execute_batch(&format!(
            "COPY (SELECT * FROM {SCRATCH_TABLE})
             TO '{}'
             (FORMAT PARQUET, PARTITION_BY (symbol), OVERWRITE_OR_IGNORE 1)",
            sql_path(&self.output_dir),
        ))
        .context("writing partitioned output")?;
        Ok(())
    }

    /// The same filter-and-count, but over the partitioned files. The
    /// symbol value lives in the directory name, so the engine skips
    /// partitions that cannot match without reading them.
    fn time_pruned_scan(&self, conn: &Connection) -> anyhow::Result<(i64, Duration)> {
        tracing::info!("running partition-pruned query");
        let started = Instant::now();
        let rows: i64 = conn.query_row(
            &format!(
                "SELECT COUNT(*)
                 FROM read_parquet('{}/*/*.parquet', hive_partitioning = true)
                 WHERE symbol = ?",
                sql_path(&self.output_dir),
            ),
            params![self.symbol],
            |r| r.get(0),
        )?;
        let elapsed = started.elapsed();
        telemetry::record_latency(LatencyMetric::PrunedScan, elapsed);
        Ok((rows, elapsed))
    }

    fn clear_output(&self) -> anyhow::Result<()> {
        match std::fs::remove_dir_all(&self.output_dir) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                Err(e).with_context(|| format!("clearing {}", self.output_dir.display()))
            }
        }
    }
}

/// Escape a path for embedding in a single-quoted SQL literal.
fn sql_path(path: &Path) -> String {
    path.display().to_string().replace('\'', "''")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sql_path_escapes_quotes() {
        let path = PathBuf::from("/tmp/it's here");
        assert_eq!(sql_path(&path), "/tmp/it''s here");
    }

    #[test]
    fn test_report_counts_match() {
        let report = BenchReport {
            amplified_rows: 3200,
            full_scan: Duration::from_millis(40),
            full_scan_rows: 1920,
            pruned_scan: Duration::from_millis(10),
            pruned_scan_rows: 1920,
        };
        assert!(report.counts_match());
        assert!((report.speedup() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_report_speedup_zero_pruned() {
        let report = BenchReport {
            amplified_rows: 0,
            full_scan: Duration::from_millis(5),
            full_scan_rows: 0,
            pruned_scan: Duration::ZERO,
            pruned_scan_rows: 0,
        };
        assert!(report.speedup().is_infinite());
    }
}
