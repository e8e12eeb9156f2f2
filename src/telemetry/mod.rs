//! Telemetry module
//!
//! Structured logging and Prometheus metrics

mod logging;
mod metrics;

pub use logging::{init_logging, LogFormat};
pub use metrics::{
    increment, record_latency, set_gauge, CounterMetric, GaugeMetric, LatencyMetric,
};

use crate::config::TelemetryConfig;

/// Guard that cleans up telemetry on drop
pub struct TelemetryGuard {
    _priv: (),
}

/// Initialize logging from the telemetry configuration.
///
/// The metrics exporter is installed separately by the long-running
/// command (see [`install_metrics_exporter`]) so one-shot commands don't
/// contend for the listen port.
pub fn init_telemetry(config: &TelemetryConfig) -> anyhow::Result<TelemetryGuard> {
    let format = if config.log_json {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    init_logging(&config.log_level, format)?;

    Ok(TelemetryGuard { _priv: () })
}

/// Serve Prometheus metrics on the given port. Must be called from
/// within a tokio runtime.
pub fn install_metrics_exporter(port: u16) -> anyhow::Result<()> {
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("failed to start metrics exporter on {}: {}", addr, e))?;
    tracing::info!(%addr, "metrics exporter listening");
    Ok(())
}
