use clap::Parser;
use marketpipe::cli::{Cli, Commands};
use marketpipe::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::load(&cli.config).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
        eprintln!("Using default configuration");
        toml::from_str(include_str!("../config.toml.example")).expect("Invalid default config")
    });

    // Initialize telemetry
    let _guard = marketpipe::telemetry::init_telemetry(&config.telemetry)?;

    // Deployment environment wins over the config file
    config.apply_env_overrides();

    match cli.command {
        Commands::Run(args) => {
            tracing::info!("Starting ingestion pipeline");
            args.execute(&config).await?;
        }
        Commands::Bench(args) => {
            tracing::info!("Starting partition benchmark");
            args.execute(&config).await?;
        }
        Commands::Status => {
            marketpipe::cli::status(&config).await?;
        }
        Commands::Config => {
            println!("Current configuration:");
            println!(
                "  Latest-value store: {}:{}",
                config.latest.host, config.latest.port
            );
            println!("  Historical store: {}", config.history.path.display());
            println!(
                "  Simulation: {} from {:.2}, +/-{:.2} every {}s",
                config.simulation.symbol,
                config.simulation.base_price,
                config.simulation.max_fluctuation,
                config.simulation.update_interval_secs
            );
            println!(
                "  Bench: {} doubling rounds -> {}",
                config.bench.doubling_rounds,
                config.bench.output_dir.display()
            );
        }
    }

    Ok(())
}
