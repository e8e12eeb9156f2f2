//! Status command implementation
//!
//! Exercises the same read paths the dashboard consumer uses: a point
//! lookup on the latest-value store and a recent-history query on the
//! historical store. Store failures degrade to "no data" rather than
//! aborting.

use crate::config::Config;
use crate::store::{HistorySink, HistoryStore, LatestSink, LatestStore};

/// Number of recent rows shown.
const HISTORY_ROWS: usize = 5;

pub async fn status(config: &Config) -> anyhow::Result<()> {
    let symbol = &config.simulation.symbol;
    println!("marketpipe status for {}", symbol);

    match LatestStore::connect(&config.latest.host, config.latest.port) {
        Ok(latest) => match latest.get(symbol).await {
            Ok(Some(tick)) => {
                println!("  Latest: {:.2} at {}", tick.price, tick.timestamp_str());
            }
            Ok(None) => println!("  Latest: no data"),
            Err(e) => {
                tracing::warn!(error = %e, "latest-value store unavailable");
                println!("  Latest: unavailable");
            }
        },
        Err(e) => {
            tracing::warn!(error = %e, "latest-value store unavailable");
            println!("  Latest: unavailable");
        }
    }

    let history = HistoryStore::new(&config.history.path);
    match history.recent(symbol, HISTORY_ROWS) {
        Ok(rows) if rows.is_empty() => println!("  History: no rows"),
        Ok(rows) => {
            println!("  History (last {}):", rows.len());
            for tick in rows {
                println!("    {}  {:.2}", tick.timestamp_str(), tick.price);
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "historical store unavailable");
            println!("  History: unavailable");
        }
    }

    Ok(())
}
