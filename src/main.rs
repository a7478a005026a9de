//! Command-line entry point for cdc-datagen.
//!
//! ```bash
//! DB_HOST=localhost DB_NAME=sourcedb cdc-datagen
//! ```
//!
//! Exits 0 after Ctrl+C/SIGTERM (or `--max-iterations`), 1 when PostgreSQL
//! cannot be reached or a write fails.

use cdc_datagen::{run_generation, setup_shutdown_handler, Cli, PostgresConnector};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stdout)
        .init();

    let cli = Cli::parse();

    info!("Starting data generator...");
    info!("Configuration:");
    info!("  DB_HOST: {}", cli.connection.db_host);
    info!("  DB_PORT: {}", cli.connection.db_port);
    info!("  DB_NAME: {}", cli.connection.db_name);
    info!("  DB_USER: {}", cli.connection.db_user);

    let rng = match cli.generation.rng_seed {
        Some(seed) => {
            info!("  RNG_SEED: {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_os_rng(),
    };

    let shutdown = setup_shutdown_handler();
    let connector = PostgresConnector::new(cli.connection);
    run_generation(&connector, cli.generation.settings(), rng, shutdown).await?;
    Ok(())
}
