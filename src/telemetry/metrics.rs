//! Pipeline metrics

use std::time::Duration;

/// Counter metric types
#[derive(Debug, Clone, Copy)]
pub enum CounterMetric {
    /// Ticks written to both sinks
    TicksIngested,
    /// Cycles dropped because a sink write failed
    WriteFailures,
    /// Completed benchmark runs
    BenchRuns,
}

/// Gauge metric types
#[derive(Debug, Clone, Copy)]
pub enum GaugeMetric {
    /// Most recent successfully written price
    LastPrice,
    /// Rows in the benchmark scratch table
    AmplifiedRows,
}

/// Latency metric types
#[derive(Debug, Clone, Copy)]
pub enum LatencyMetric {
    /// Latest-value store overwrite
    LatestWrite,
    /// Historical store append
    HistoryAppend,
    /// Unpartitioned benchmark query
    FullScan,
    /// Partition-pruned benchmark query
    PrunedScan,
}

/// Increment a counter
pub fn increment(metric: CounterMetric) {
    let name = match metric {
        CounterMetric::TicksIngested => "marketpipe_ticks_ingested_total",
        CounterMetric::WriteFailures => "marketpipe_write_failures_total",
        CounterMetric::BenchRuns => "marketpipe_bench_runs_total",
    };
    metrics::counter!(name).increment(1);
}

/// Set a gauge value
pub fn set_gauge(metric: GaugeMetric, value: f64) {
    let name = match metric {
        GaugeMetric::LastPrice => "marketpipe_last_price",
        GaugeMetric::AmplifiedRows => "marketpipe_bench_amplified_rows",
    };
    metrics::gauge!(name).set(value);
}

/// Record a latency measurement
pub fn record_latency(metric: LatencyMetric, duration: Duration) {
    let name = match metric {
        LatencyMetric::LatestWrite => "marketpipe_latest_write_latency_ms",
        LatencyMetric::HistoryAppend => "marketpipe_history_append_latency_ms",
        LatencyMetric::FullScan => "marketpipe_bench_full_scan_ms",
        LatencyMetric::PrunedScan => "marketpipe_bench_pruned_scan_ms",
    };
    metrics::histogram!(name).record(duration.as_secs_f64() * 1000.0);
}
