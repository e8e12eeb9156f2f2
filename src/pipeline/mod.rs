//! Ingestion loop
//!
//! Generates one tick per interval and fans it out to both sinks. The
//! loop has two states: RUNNING (generate, dual-write, sleep) and
//! BACKOFF (a failed cycle was dropped; sleep longer, then resume). The
//! current price is threaded through each cycle explicitly and only
//! advances when both writes succeed, so a dropped tick never breaks the
//! continuity of the walk.

use crate::config::SimulationConfig;
use crate::feed::{Tick, Walk};
use crate::store::{HistorySink, LatestSink, StoreError};
use crate::telemetry::{self, CounterMetric, GaugeMetric, LatencyMetric};
use chrono::Utc;
use std::time::{Duration, Instant};
use tokio::sync::watch;

/// Backoff sleep is this multiple of the normal update interval.
const BACKOFF_MULTIPLIER: u32 = 5;

/// Loop scheduling state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopState {
    /// Normal operation, one cycle per interval
    Running,
    /// Last cycle failed; sleeping out the longer backoff interval
    Backoff,
}

/// The single writer to both stores.
pub struct Ingestor<W, L, H> {
    symbol: String,
    base_price: f64,
    interval: Duration,
    walk: W,
    latest: L,
    history: H,
}

impl<W: Walk, L: LatestSink, H: HistorySink> Ingestor<W, L, H> {
    /// Create an ingestor over the given walk and sinks.
    pub fn new(config: &SimulationConfig, walk: W, latest: L, history: H) -> Self {
        Self {
            symbol: config.symbol.clone(),
            base_price: config.base_price,
            interval: Duration::from_secs_f64(config.update_interval_secs),
            walk,
            latest,
            history,
        }
    }

    /// Run one cycle: generate the next tick from `price` and write it to
    /// both sinks. Returns the new price on success. On failure the
    /// caller keeps `price`; the generated tick is dropped, not retried,
    /// since replaying a stale delta would corrupt the series.
    pub async fn run_cycle(&mut self, price: f64) -> Result<f64, StoreError> {
        let next = self.walk.next_price(price);
        let tick = Tick::new(self.symbol.clone(), next, Utc::now());

        let started = Instant::now();
        self.latest.set(&tick).await?;
        telemetry::record_latency(LatencyMetric::LatestWrite, started.elapsed());

        let started = Instant::now();
        self.history.append(&tick)?;
        telemetry::record_latency(LatencyMetric::HistoryAppend, started.elapsed());

        telemetry::increment(CounterMetric::TicksIngested);
        telemetry::set_gauge(GaugeMetric::LastPrice, tick.price);
        tracing::info!(symbol = %tick.symbol, price = tick.price, "processed tick");

        Ok(tick.price)
    }

    /// Run the loop until the stop signal fires, or until `max_cycles`
    /// successful cycles have completed. Failed cycles are logged and
    /// absorbed; only the caller's startup (schema init, config) is
    /// allowed to be fatal.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>, max_cycles: Option<u64>) {
        let mut price = self.base_price;
        let mut state = LoopState::Running;
        let mut completed: u64 = 0;

        tracing::info!(
            symbol = %self.symbol,
            base_price = price,
            interval_ms = self.interval.as_millis() as u64,
            "starting ingestion pipeline"
        );

        loop {
            if *shutdown.borrow() {
                break;
            }

            match self.run_cycle(price).await {
                Ok(next) => {
                    price = next;
                    completed += 1;
                    state = LoopState::Running;
                }
                Err(e) => {
                    tracing::error!(
                        symbol = %self.symbol,
                        error = %e,
                        "cycle failed, dropping tick and backing off"
                    );
                    telemetry::increment(CounterMetric::WriteFailures);
                    state = LoopState::Backoff;
                }
            }

            if let Some(limit) = max_cycles {
                if completed >= limit {
                    break;
                }
            }

            let pause = match state {
                LoopState::Running => self.interval,
                LoopState::Backoff => self.interval * BACKOFF_MULTIPLIER,
            };

            tokio::select! {
                _ = tokio::time::sleep(pause) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        tracing::info!(symbol = %self.symbol, cycles = completed, "ingestion pipeline stopped");
    }
}
