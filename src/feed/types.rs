//! Simulated feed types

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// Wall-clock text format used in payloads and in the historical store.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single simulated price observation for a symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    /// Ticker symbol (e.g., "BTC/USD")
    pub symbol: String,
    /// Simulated price, rounded to 2 decimal places
    pub price: f64,
    /// Wall-clock time of the observation, second precision
    #[serde(with = "ts_format")]
    pub timestamp: DateTime<Utc>,
}

impl Tick {
    /// Create a tick, truncating the timestamp to whole seconds.
    pub fn new(symbol: String, price: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            symbol,
            price,
            timestamp: timestamp.trunc_subsecs(0),
        }
    }

    /// Timestamp in the shared text format.
    pub fn timestamp_str(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}

/// Second-precision timestamp (de)serialization for payloads
mod ts_format {
    use super::TIMESTAMP_FORMAT;
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&ts.format(TIMESTAMP_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        let naive = NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT)
            .map_err(serde::de::Error::custom)?;
        Ok(naive.and_utc())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_new_truncates_to_seconds() {
        let with_millis = Utc.with_ymd_and_hms(2026, 8, 6, 12, 0, 5).unwrap()
            + chrono::Duration::milliseconds(750);
        let tick = Tick::new("BTC/USD".to_string(), 50000.0, with_millis);
        assert_eq!(
            tick.timestamp,
            Utc.with_ymd_and_hms(2026, 8, 6, 12, 0, 5).unwrap()
        );
    }

    #[test]
    fn test_payload_is_self_describing() {
        let tick = Tick::new(
            "BTC/USD".to_string(),
            50010.0,
            Utc.with_ymd_and_hms(2026, 8, 6, 12, 0, 0).unwrap(),
        );
        let payload = serde_json::to_value(&tick).unwrap();
        assert_eq!(payload["symbol"], "BTC/USD");
        assert_eq!(payload["price"], 50010.0);
        assert_eq!(payload["timestamp"], "2026-08-06 12:00:00");
    }

    #[test]
    fn test_payload_round_trip() {
        let tick = Tick::new(
            "ETH/USD".to_string(),
            3125.75,
            Utc.with_ymd_and_hms(2026, 8, 6, 23, 59, 59).unwrap(),
        );
        let encoded = serde_json::to_string(&tick).unwrap();
        let decoded: Tick = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, tick);
    }

    #[test]
    fn test_timestamp_str_format() {
        let tick = Tick::new(
            "BTC/USD".to_string(),
            50000.0,
            Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap(),
        );
        assert_eq!(tick.timestamp_str(), "2026-01-02 03:04:05");
    }
}
