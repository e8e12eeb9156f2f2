//! DuckDB-backed historical store
//!
//! Append-only table of every tick, the source of truth for analytics.
//! Writes open a read-write connection per operation and drop it before
//! returning; queries use a read-only connection so that dashboard-style
//! reader processes and the writer never block each other.

use super::{HistorySink, StoreError};
use crate::feed::{Tick, TIMESTAMP_FORMAT};
use chrono::NaiveDateTime;
use duckdb::{params, AccessMode, Connection};
use std::path::{Path, PathBuf};

/// Historical tick store backed by a DuckDB database file.
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    /// Create a handle for the database at `path`. No connection is
    /// opened until an operation runs.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Database file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the ticks table if it does not exist. Safe to call on every
    /// startup; failure here is fatal to the pipeline.
    pub fn init_schema(&self) -> Result<(), StoreError> {
        let conn = self.writer()?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS ticks (
                symbol VARCHAR,
                price DOUBLE,
                timestamp TIMESTAMP
            )",
        )?;
        tracing::info!(path = %self.path.display(), "historical store initialized");
        Ok(())
    }

    fn writer(&self) -> Result<Connection, StoreError> {
        Ok(Connection::open(&self.path)?)
    }

    fn reader(&self) -> Result<Connection, StoreError> {
        let config = duckdb::Config::default().access_mode(AccessMode::ReadOnly)?;
        Ok(Connection::open_with_flags(&self.path, config)?)
    }
}

impl HistorySink for HistoryStore {
    fn append(&self, tick: &Tick) -> Result<(), StoreError> {
        let conn = self.writer()?;
        conn.execute(
            "INSERT INTO ticks VALUES (?, ?, CAST(? AS TIMESTAMP))",
            params![tick.symbol, tick.price, tick.timestamp_str()],
        )?;
        Ok(())
    }

    fn recent(&self, symbol: &str, limit: usize) -> Result<Vec<Tick>, StoreError> {
        let conn = self.reader()?;
        let mut stmt = conn.prepare(
            "SELECT symbol, price, strftime(timestamp, '%Y-%m-%d %H:%M:%S')
             FROM ticks
             WHERE symbol = ?
             ORDER BY timestamp DESC
             LIMIT ?",
        )?;
        let rows = stmt.query_map(params![symbol, limit as i64], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, f64>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut ticks = Vec::new();
        for row in rows {
            let (symbol, price, ts) = row?;
            let naive = NaiveDateTime::parse_from_str(&ts, TIMESTAMP_FORMAT)
                .map_err(|e| duckdb::Error::FromSqlConversionFailure(2, duckdb::types::Type::Text, Box::new(e)))?;
            ticks.push(Tick {
                symbol,
                price,
                timestamp: naive.and_utc(),
            });
        }

        // Newest-first from the engine, ascending for consumers
        ticks.reverse();
        Ok(ticks)
    }
}
