//! The generation loop.
//!
//! ```text
//! Connecting ──► Provisioning ──► Seeding ──► Running ──► Draining ──► Closed
//!     │               │              │           │
//!     └── fatal ──────┴──────────────┴── error ──┘
//! ```
//!
//! Connecting failures go straight to `Closed`. Everything after a session is
//! open passes through `Draining`, which always closes the session, before
//! `Closed` logs the final totals. Interrupts and `max_iterations` end the
//! loop with `Ok`; database errors are returned after cleanup.

use crate::connect::{connect_with_retries, Connector, RetryPolicy};
use crate::pool::{IdPool, DEFAULT_POOL_CAP};
use crate::shutdown::ShutdownSignal;
use crate::store::Store;
use anyhow::Context;
use cdc_datagen_records::{EnFaker, FakeText, RecordFactory};
use rand::Rng;
use std::fmt;
use std::time::Duration;
use tracing::{debug, error, info};

/// Products inserted before the loop starts.
pub const DEFAULT_SEED_COUNT: usize = 20;
/// Smallest batch drawn per table per iteration.
pub const MIN_BATCH: usize = 1;
/// Largest batch drawn per table per iteration.
pub const MAX_BATCH: usize = 2;
/// Progress is logged every this many iterations.
pub const PROGRESS_EVERY: u64 = 10;
/// Pause between iterations.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct GenerationSettings {
    pub seed_count: usize,
    pub pool_cap: usize,
    pub interval: Duration,
    /// `None` runs until interrupted.
    pub max_iterations: Option<u64>,
    pub retry: RetryPolicy,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            seed_count: DEFAULT_SEED_COUNT,
            pool_cap: DEFAULT_POOL_CAP,
            interval: DEFAULT_INTERVAL,
            max_iterations: None,
            retry: RetryPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationPhase {
    Connecting,
    Provisioning,
    Seeding,
    Running,
    Draining,
    Closed,
}

impl fmt::Display for GenerationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GenerationPhase::Connecting => "connecting",
            GenerationPhase::Provisioning => "provisioning",
            GenerationPhase::Seeding => "seeding",
            GenerationPhase::Running => "running",
            GenerationPhase::Draining => "draining",
            GenerationPhase::Closed => "closed",
        };
        f.write_str(name)
    }
}

fn enter(phase: GenerationPhase) {
    info!(%phase, "Entering phase {}", phase);
}

/// Cumulative counters reported on progress and at exit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationStats {
    /// Products inserted, seed batch included.
    pub catalog_items: u64,
    pub transactions: u64,
    /// Completed or attempted loop iterations.
    pub iterations: u64,
}

/// Owns the session, RNG and id pool for the seeding and running phases.
pub struct GenerationLoop<S, R, F = EnFaker> {
    store: S,
    rng: R,
    factory: RecordFactory<F>,
    pool: IdPool,
    stats: GenerationStats,
    settings: GenerationSettings,
}

impl<S, R, F> GenerationLoop<S, R, F>
where
    S: Store,
    R: Rng + Send,
    F: FakeText + Send + Sync,
{
    pub fn new(store: S, rng: R, factory: RecordFactory<F>, settings: GenerationSettings) -> Self {
        Self {
            store,
            rng,
            factory,
            pool: IdPool::new(settings.pool_cap),
            stats: GenerationStats::default(),
            settings,
        }
    }

    pub fn stats(&self) -> GenerationStats {
        self.stats
    }

    pub fn pool(&self) -> &IdPool {
        &self.pool
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Insert the initial product batch and fill the pool with its ids.
    pub async fn seed(&mut self) -> anyhow::Result<()> {
        info!("Seeding initial products...");
        let items = self
            .factory
            .catalog_items(&mut self.rng, self.settings.seed_count);
        let ids = self
            .store
            .insert_catalog_items(&items)
            .await
            .context("Failed to seed initial products")?;

        self.stats.catalog_items += ids.len() as u64;
        self.pool.extend(&ids);
        info!("Seeded {} initial products", ids.len());
        Ok(())
    }

    /// One iteration: products, pool maintenance, sales, progress report.
    /// Does not sleep.
    pub async fn step(&mut self) -> anyhow::Result<()> {
        self.stats.iterations += 1;

        let product_count = self.rng.random_range(MIN_BATCH..=MAX_BATCH);
        let items = self.factory.catalog_items(&mut self.rng, product_count);
        let product_ids = self
            .store
            .insert_catalog_items(&items)
            .await
            .context("Failed to insert products")?;
        self.stats.catalog_items += product_ids.len() as u64;
        self.pool.extend(&product_ids);

        if self.pool.needs_refresh() {
            let sample = self
                .store
                .sample_catalog_ids(self.pool.cap())
                .await
                .context("Failed to sample product ids")?;
            debug!(
                "Refreshed product id pool: {} -> {} ids",
                self.pool.len(),
                sample.len()
            );
            self.pool.replace(sample);
        }

        let sale_count = self.rng.random_range(MIN_BATCH..=MAX_BATCH);
        let sales = self
            .factory
            .transactions(&mut self.rng, self.pool.as_slice(), sale_count);
        let sale_ids = self
            .store
            .insert_transactions(&sales)
            .await
            .context("Failed to insert sales")?;
        self.stats.transactions += sale_ids.len() as u64;

        if self.stats.iterations % PROGRESS_EVERY == 0 {
            info!(
                "Progress: {} products, {} sales (iteration {})",
                self.stats.catalog_items, self.stats.transactions, self.stats.iterations
            );
        }
        Ok(())
    }

    /// Seed, then step until interrupted, `max_iterations` is reached, or a
    /// step fails.
    pub async fn run(&mut self, shutdown: &mut ShutdownSignal) -> anyhow::Result<()> {
        enter(GenerationPhase::Seeding);
        self.seed().await?;

        enter(GenerationPhase::Running);
        info!(
            "Starting continuous data generation ({}-{} records per table every {:?})...",
            MIN_BATCH, MAX_BATCH, self.settings.interval
        );
        info!("Press Ctrl+C to stop");

        loop {
            if shutdown.is_triggered() {
                info!("Stopping data generator...");
                return Ok(());
            }
            if let Some(max) = self.settings.max_iterations {
                if self.stats.iterations >= max {
                    info!("Reached {} iterations, stopping data generator...", max);
                    return Ok(());
                }
            }

            self.step().await?;

            tokio::select! {
                _ = tokio::time::sleep(self.settings.interval) => {}
                _ = shutdown.triggered() => {}
            }
        }
    }
}

/// Drive every phase end to end against `connector`.
///
/// Returns the final totals on interrupt or when `max_iterations` is reached.
/// Any connection, schema or write failure is returned as an error after the
/// session (if one was opened) has been closed.
pub async fn run_generation<C, R>(
    connector: &C,
    settings: GenerationSettings,
    rng: R,
    mut shutdown: ShutdownSignal,
) -> anyhow::Result<GenerationStats>
where
    C: Connector,
    R: Rng + Send,
{
    enter(GenerationPhase::Connecting);
    let mut session = match connect_with_retries(connector, settings.retry).await {
        Ok(connected) => connected.session,
        Err(e) => {
            enter(GenerationPhase::Closed);
            return Err(e);
        }
    };

    enter(GenerationPhase::Provisioning);
    if let Err(e) = session.ensure_schema().await {
        error!("Schema provisioning failed: {:#}", e);
        enter(GenerationPhase::Draining);
        session.close().await;
        info!("Database connection closed");
        enter(GenerationPhase::Closed);
        return Err(e.context("Failed to create/verify tables"));
    }

    let mut generation = GenerationLoop::new(session, rng, RecordFactory::new(EnFaker), settings);
    let result = generation.run(&mut shutdown).await;
    if let Err(e) = &result {
        error!("Fatal error, stopping data generator: {:#}", e);
    }

    enter(GenerationPhase::Draining);
    let stats = generation.stats();
    generation.into_store().close().await;
    info!("Database connection closed");

    enter(GenerationPhase::Closed);
    info!(
        "Final stats: {} products, {} sales ({} iterations)",
        stats.catalog_items, stats.transactions, stats.iterations
    );

    result.map(|()| stats)
}
