//! Storage sinks for the ingestion pipeline
//!
//! Two sinks with different access patterns: a Redis-backed latest-value
//! store for point lookups and a DuckDB-backed append-only table for
//! analytical queries.

mod error;
mod history;
mod latest;

pub use error::StoreError;
pub use history::HistoryStore;
pub use latest::LatestStore;

use crate::feed::Tick;
use async_trait::async_trait;

/// Trait for the latest-value sink: one live record per symbol.
#[async_trait]
pub trait LatestSink: Send + Sync {
    /// Atomically overwrite the record for the tick's symbol.
    async fn set(&self, tick: &Tick) -> Result<(), StoreError>;

    /// Fetch the most recent record for a symbol, or `None` if never
    /// written (or unreadable).
    async fn get(&self, symbol: &str) -> Result<Option<Tick>, StoreError>;
}

/// Trait for the append-only historical sink.
pub trait HistorySink: Send + Sync {
    /// Durably append one row.
    fn append(&self, tick: &Tick) -> Result<(), StoreError>;

    /// The `limit` most recent rows for a symbol, ordered ascending by
    /// timestamp for charting.
    fn recent(&self, symbol: &str, limit: usize) -> Result<Vec<Tick>, StoreError>;
}
