//! Redis-backed latest-value store
//!
//! Holds exactly one record per symbol, overwritten on every tick. The
//! payload is self-describing JSON so readers need no external schema.

use super::{LatestSink, StoreError};
use crate::feed::Tick;
use async_trait::async_trait;
use redis::AsyncCommands;

/// Latest-value store client.
///
/// A connection is acquired per operation and released on every exit
/// path; `SET` is a single-key atomic overwrite, so a concurrent reader
/// observes either the previous payload or the new one, never a torn mix.
pub struct LatestStore {
    client: redis::Client,
}

impl LatestStore {
    /// Create a client for the store at `host:port`.
    ///
    /// Connections are established lazily, so this only fails on a
    /// malformed address.
    pub fn connect(host: &str, port: u16) -> Result<Self, StoreError> {
        let url = format!("redis://{}:{}/", host, port);
        let client = redis::Client::open(url.as_str())?;
        Ok(Self { client })
    }

    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection, StoreError> {
        Ok(self.client.get_multiplexed_async_connection().await?)
    }

    /// Decode a stored payload, treating anything malformed as absent.
    fn decode_payload(raw: &str, symbol: &str) -> Option<Tick> {
        match serde_json::from_str(raw) {
            Ok(tick) => Some(tick),
            Err(e) => {
                tracing::warn!(symbol, error = %e, "discarding malformed latest-value payload");
                None
            }
        }
    }
}

#[async_trait]
impl LatestSink for LatestStore {
    async fn set(&self, tick: &Tick) -> Result<(), StoreError> {
        let payload = serde_json::to_string(tick)?;
        let mut conn = self.connection().await?;
        let _: () = conn.set(&tick.symbol, payload).await?;
        Ok(())
    }

    async fn get(&self, symbol: &str) -> Result<Option<Tick>, StoreError> {
        let mut conn = self.connection().await?;
        let raw: Option<String> = conn.get(symbol).await?;
        Ok(raw.and_then(|p| Self::decode_payload(&p, symbol)))
    }
}
