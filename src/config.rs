//! Configuration types for marketpipe

use serde::Deserialize;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub latest: LatestConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub bench: BenchConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Latest-value store (Redis) connection
#[derive(Debug, Clone, Deserialize)]
pub struct LatestConfig {
    #[serde(default = "default_redis_host")]
    pub host: String,
    #[serde(default = "default_redis_port")]
    pub port: u16,
}

fn default_redis_host() -> String {
    "localhost".to_string()
}
fn default_redis_port() -> u16 {
    6379
}

impl Default for LatestConfig {
    fn default() -> Self {
        Self {
            host: default_redis_host(),
            port: default_redis_port(),
        }
    }
}

/// Historical store (DuckDB) location
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("market_data.duckdb")
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Simulated feed settings
#[derive(Debug, Clone, Deserialize)]
pub struct SimulationConfig {
    /// Ticker symbol the walk is generated for
    #[serde(default = "default_symbol")]
    pub symbol: String,
    /// Starting price of the walk
    #[serde(default = "default_base_price")]
    pub base_price: f64,
    /// Symmetric bound on the per-tick price delta
    #[serde(default = "default_max_fluctuation")]
    pub max_fluctuation: f64,
    /// Seconds between ticks
    #[serde(default = "default_update_interval")]
    pub update_interval_secs: f64,
}

fn default_symbol() -> String {
    "BTC/USD".to_string()
}
fn default_base_price() -> f64 {
    50000.0
}
fn default_max_fluctuation() -> f64 {
    50.0
}
fn default_update_interval() -> f64 {
    0.5
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            symbol: default_symbol(),
            base_price: default_base_price(),
            max_fluctuation: default_max_fluctuation(),
            update_interval_secs: default_update_interval(),
        }
    }
}

/// Partition benchmark settings
#[derive(Debug, Clone, Deserialize)]
pub struct BenchConfig {
    /// Self-union rounds when amplifying the scratch table (each doubles it)
    #[serde(default = "default_doubling_rounds")]
    pub doubling_rounds: usize,
    /// Directory the partitioned layout is written to
    #[serde(default = "default_bench_output")]
    pub output_dir: PathBuf,
}

fn default_doubling_rounds() -> usize {
    5
}
fn default_bench_output() -> PathBuf {
    PathBuf::from("partitioned_data")
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            doubling_rounds: default_doubling_rounds(),
            output_dir: default_bench_output(),
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_metrics_port")]
    pub metrics_port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Emit JSON log lines instead of the human-readable format
    #[serde(default)]
    pub log_json: bool,
}

fn default_metrics_port() -> u16 {
    9090
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            metrics_port: default_metrics_port(),
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Apply the environment overrides for the deployment surface:
    /// `REDIS_HOST`, `REDIS_PORT`, `DUCKDB_PATH`, `TICKER_SYMBOL`,
    /// `BASE_PRICE`, `UPDATE_INTERVAL_SECS`. Unparsable values are
    /// logged and ignored.
    pub fn apply_env_overrides(&mut self) {
        env_override("REDIS_HOST", &mut self.latest.host);
        env_override("REDIS_PORT", &mut self.latest.port);
        env_override("DUCKDB_PATH", &mut self.history.path);
        env_override("TICKER_SYMBOL", &mut self.simulation.symbol);
        env_override("BASE_PRICE", &mut self.simulation.base_price);
        env_override("UPDATE_INTERVAL_SECS", &mut self.simulation.update_interval_secs);
    }
}

fn env_override<T>(var: &str, slot: &mut T)
where
    T: FromStr,
    T::Err: Display,
{
    if let Ok(raw) = std::env::var(var) {
        match raw.parse() {
            Ok(value) => *slot = value,
            Err(e) => {
                tracing::warn!(var, value = %raw, error = %e, "ignoring unparsable environment override");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.latest.host, "localhost");
        assert_eq!(config.latest.port, 6379);
        assert_eq!(config.history.path, PathBuf::from("market_data.duckdb"));
        assert_eq!(config.simulation.symbol, "BTC/USD");
        assert_eq!(config.simulation.base_price, 50000.0);
        assert_eq!(config.simulation.max_fluctuation, 50.0);
        assert_eq!(config.simulation.update_interval_secs, 0.5);
        assert_eq!(config.bench.doubling_rounds, 5);
        assert_eq!(config.telemetry.metrics_port, 9090);
        assert!(!config.telemetry.log_json);
    }

    #[test]
    fn test_partial_toml_overrides() {
        let toml = r#"
            [simulation]
            symbol = "ETH/USD"
            base_price = 3000.0

            [bench]
            doubling_rounds = 3
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.simulation.symbol, "ETH/USD");
        assert_eq!(config.simulation.base_price, 3000.0);
        // Untouched fields keep their defaults
        assert_eq!(config.simulation.max_fluctuation, 50.0);
        assert_eq!(config.bench.doubling_rounds, 3);
        assert_eq!(config.latest.port, 6379);
    }

    #[test]
    fn test_example_config_parses() {
        let config: Config = toml::from_str(include_str!("../config.toml.example")).unwrap();
        assert_eq!(config.simulation.symbol, "BTC/USD");
        assert_eq!(config.bench.output_dir, PathBuf::from("partitioned_data"));
    }

    #[test]
    fn test_config_load_nonexistent() {
        let result = Config::load("/nonexistent/path/config.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_env_overrides() {
        // One test for all overrides: env vars are process-global and
        // cargo runs tests in parallel threads.
        std::env::set_var("REDIS_HOST", "cache.internal");
        std::env::set_var("REDIS_PORT", "6380");
        std::env::set_var("BASE_PRICE", "not-a-number");

        let mut config = Config::default();
        config.apply_env_overrides();

        assert_eq!(config.latest.host, "cache.internal");
        assert_eq!(config.latest.port, 6380);
        // Unparsable override is ignored
        assert_eq!(config.simulation.base_price, 50000.0);

        std::env::remove_var("REDIS_HOST");
        std::env::remove_var("REDIS_PORT");
        std::env::remove_var("BASE_PRICE");
    }
}
