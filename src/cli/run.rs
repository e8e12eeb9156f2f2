//! Run command implementation

use crate::config::Config;
use crate::feed::RandomWalk;
use crate::pipeline::Ingestor;
use crate::store::{HistoryStore, LatestStore};
use crate::telemetry;
use anyhow::Context;
use clap::Args;
use tokio::sync::watch;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Stop after this many successful cycles (default: run until interrupted)
    #[arg(long)]
    pub cycles: Option<u64>,

    /// Seed the price walk for a reproducible run
    #[arg(long)]
    pub seed: Option<u64>,
}

impl RunArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        telemetry::install_metrics_exporter(config.telemetry.metrics_port)?;

        let latest = LatestStore::connect(&config.latest.host, config.latest.port)
            .context("creating latest-value store client")?;

        let history = HistoryStore::new(&config.history.path);
        // The only fatal failure in the pipeline: without a schema there
        // is nothing to append to.
        history
            .init_schema()
            .context("initializing historical store schema")?;

        let walk = match self.seed {
            Some(seed) => RandomWalk::with_seed(config.simulation.max_fluctuation, seed),
            None => RandomWalk::new(config.simulation.max_fluctuation),
        };

        let mut ingestor = Ingestor::new(&config.simulation, walk, latest, history);

        let (stop_tx, stop_rx) = watch::channel(false);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("shutdown signal received");
                let _ = stop_tx.send(true);
            }
        });

        ingestor.run(stop_rx, self.cycles).await;
        Ok(())
    }
}
