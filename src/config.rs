//! Command-line and environment configuration.

pub mod duration;

use crate::connect::RetryPolicy;
use crate::generate::GenerationSettings;
use cdc_datagen_postgresql::ConnectionArgs;
use clap::{Args, Parser};
use std::time::Duration;

pub use duration::parse_duration;

#[derive(Parser, Debug)]
#[command(name = "cdc-datagen")]
#[command(about = "Continuously insert fake products and sales into PostgreSQL for CDC demos")]
#[command(long_about = None)]
pub struct Cli {
    /// PostgreSQL connection options
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Generation loop options
    #[command(flatten)]
    pub generation: GenerationArgs,
}

/// Knobs for the generation loop. Defaults reproduce the 1-2 rows/sec demo rate.
#[derive(Args, Clone, Debug)]
pub struct GenerationArgs {
    /// Number of products inserted before continuous generation starts
    #[arg(long, env = "SEED_COUNT", default_value = "20")]
    pub seed_count: usize,

    /// Maximum number of product ids kept in memory as sale references
    #[arg(
        long,
        env = "ID_POOL_CAP",
        default_value = "100",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub pool_cap: u64,

    /// Pause between iterations (e.g. "1s", "500ms")
    #[arg(
        long,
        env = "GENERATE_INTERVAL",
        default_value = "1s",
        value_parser = parse_duration
    )]
    pub interval: Duration,

    /// Stop cleanly after this many iterations (default: run until interrupted)
    #[arg(long, env = "MAX_ITERATIONS")]
    pub max_iterations: Option<u64>,

    /// Seed for the random number generator (same seed = same records)
    #[arg(long, env = "RNG_SEED")]
    pub rng_seed: Option<u64>,

    /// Connection attempts before giving up
    #[arg(
        long,
        env = "CONNECT_ATTEMPTS",
        default_value = "5",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub connect_attempts: u32,

    /// Pause between connection attempts (e.g. "2s")
    #[arg(
        long,
        env = "CONNECT_RETRY_DELAY",
        default_value = "2s",
        value_parser = parse_duration
    )]
    pub connect_retry_delay: Duration,
}

impl GenerationArgs {
    pub fn settings(&self) -> GenerationSettings {
        GenerationSettings {
            seed_count: self.seed_count,
            pool_cap: usize::try_from(self.pool_cap).unwrap_or(usize::MAX),
            interval: self.interval,
            max_iterations: self.max_iterations,
            retry: RetryPolicy {
                max_attempts: self.connect_attempts,
                delay: self.connect_retry_delay,
            },
        }
    }
}
