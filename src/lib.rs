//! Continuous fake-data generator for change-data-capture demos.
//!
//! Seeds a `products` table, then keeps appending 1-2 products and 1-2 sales
//! per second until interrupted, so a CDC pipeline (e.g. Debezium reading the
//! PostgreSQL WAL) always has a steady trickle of inserts to deliver.
//!
//! # Crates
//!
//! - `cdc_datagen_records` - record factory and fake text
//! - `cdc_datagen_postgresql` - session, schema provisioning, batch writes
//!
//! # CLI Usage
//!
//! ```bash
//! # Defaults match the docker-compose demo (postgres-source:5432/sourcedb)
//! cdc-datagen
//!
//! # Local database, faster pace, reproducible records, bounded run
//! DB_HOST=localhost cdc-datagen --interval 200ms --rng-seed 42 --max-iterations 100
//! ```

pub mod config;
pub mod connect;
pub mod generate;
pub mod pool;
pub mod postgresql;
pub mod shutdown;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{Cli, GenerationArgs};
pub use connect::{connect_with_retries, Connected, Connector, RetryPolicy};
pub use generate::{
    run_generation, GenerationLoop, GenerationPhase, GenerationSettings, GenerationStats,
};
pub use pool::IdPool;
pub use postgresql::PostgresConnector;
pub use shutdown::{setup_shutdown_handler, ShutdownSignal, ShutdownTrigger};
pub use store::Store;
