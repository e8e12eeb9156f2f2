//! Storage error taxonomy

use thiserror::Error;

/// Errors surfaced by the storage sinks
#[derive(Debug, Error)]
pub enum StoreError {
    /// Latest-value store unreachable or refused the operation
    #[error("latest-value store error: {0}")]
    Connectivity(#[from] redis::RedisError),
    /// Historical store rejected a statement or query
    #[error("historical store error: {0}")]
    Query(#[from] duckdb::Error),
    /// Payload could not be encoded
    #[error("payload serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// Filesystem failure around partitioned output
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
