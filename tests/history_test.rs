//! Integration tests for the historical store

use chrono::{Duration, TimeZone, Utc};
use marketpipe::feed::Tick;
use marketpipe::store::{HistorySink, HistoryStore};
use tempfile::TempDir;

fn tick(symbol: &str, price: f64, offset_secs: i64) -> Tick {
    let base = Utc.with_ymd_and_hms(2026, 8, 6, 12, 0, 0).unwrap();
    Tick::new(symbol.to_string(), price, base + Duration::seconds(offset_secs))
}

#[test]
fn test_init_schema_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let store = HistoryStore::new(dir.path().join("ticks.duckdb"));

    store.init_schema().unwrap();
    store.init_schema().unwrap();

    assert!(store.recent("BTC/USD", 10).unwrap().is_empty());
}

#[test]
fn test_append_then_recent_ascending() {
    let dir = TempDir::new().unwrap();
    let store = HistoryStore::new(dir.path().join("ticks.duckdb"));
    store.init_schema().unwrap();

    for (i, price) in [50010.0, 50005.0, 50025.0].iter().enumerate() {
        store.append(&tick("BTC/USD", *price, i as i64)).unwrap();
    }

    let rows = store.recent("BTC/USD", 10).unwrap();
    assert_eq!(rows.len(), 3);
    let prices: Vec<f64> = rows.iter().map(|t| t.price).collect();
    assert_eq!(prices, vec![50010.0, 50005.0, 50025.0]);
    assert!(rows.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
}

#[test]
fn test_recent_honors_limit_keeping_newest() {
    let dir = TempDir::new().unwrap();
    let store = HistoryStore::new(dir.path().join("ticks.duckdb"));
    store.init_schema().unwrap();

    for i in 0..5 {
        store.append(&tick("BTC/USD", 50000.0 + i as f64, i)).unwrap();
    }

    let rows = store.recent("BTC/USD", 2).unwrap();
    let prices: Vec<f64> = rows.iter().map(|t| t.price).collect();
    // The two most recent rows, still ascending for charting
    assert_eq!(prices, vec![50003.0, 50004.0]);
}

#[test]
fn test_recent_filters_by_symbol() {
    let dir = TempDir::new().unwrap();
    let store = HistoryStore::new(dir.path().join("ticks.duckdb"));
    store.init_schema().unwrap();

    store.append(&tick("BTC/USD", 50000.0, 0)).unwrap();
    store.append(&tick("ETH/USD", 3000.0, 1)).unwrap();

    let rows = store.recent("ETH/USD", 10).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].symbol, "ETH/USD");
    assert!(store.recent("SOL/USD", 10).unwrap().is_empty());
}

#[test]
fn test_recent_on_missing_database_is_an_error() {
    let dir = TempDir::new().unwrap();
    let store = HistoryStore::new(dir.path().join("never_created.duckdb"));
    assert!(store.recent("BTC/USD", 10).is_err());
}

#[test]
fn test_writer_and_reader_interleave() {
    // Both sides acquire scoped connections per operation, so a reader
    // handle over the same file never starves the writer.
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ticks.duckdb");
    let writer = HistoryStore::new(&path);
    let reader = HistoryStore::new(&path);
    writer.init_schema().unwrap();

    writer.append(&tick("BTC/USD", 50010.0, 0)).unwrap();
    assert_eq!(reader.recent("BTC/USD", 10).unwrap().len(), 1);

    writer.append(&tick("BTC/USD", 50020.0, 1)).unwrap();
    let rows = reader.recent("BTC/USD", 10).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows.last().unwrap().price, 50020.0);
}

#[test]
fn test_timestamps_survive_round_trip() {
    let dir = TempDir::new().unwrap();
    let store = HistoryStore::new(dir.path().join("ticks.duckdb"));
    store.init_schema().unwrap();

    let original = tick("BTC/USD", 50010.55, 42);
    store.append(&original).unwrap();

    let rows = store.recent("BTC/USD", 1).unwrap();
    assert_eq!(rows[0], original);
}
