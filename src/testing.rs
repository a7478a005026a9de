//! In-memory [`Connector`] and [`Store`] with failure injection.

use crate::connect::Connector;
use crate::store::Store;
use async_trait::async_trait;
use cdc_datagen_records::{CatalogId, CatalogItem, Transaction, TransactionId};
use rand::seq::IteratorRandom;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

/// A failure to inject into the next matching call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    Schema,
    /// The next catalog batch fails at this row index.
    CatalogRow(usize),
    /// The next transaction batch fails at this row index.
    TransactionRow(usize),
}

/// Shared table contents, inspectable after the store has been closed.
#[derive(Debug, Default)]
pub struct MemoryDb {
    pub products: Vec<(CatalogId, CatalogItem)>,
    pub sales: Vec<Transaction>,
    pub schema_calls: u32,
    pub sample_calls: u32,
    /// Sales whose product id did not exist when they were inserted.
    pub dangling_references: u32,
    /// Rows staged by a failed batch and discarded on rollback.
    pub rolled_back_rows: usize,
    pub closed: bool,
    pending_failure: Option<Failure>,
}

impl MemoryDb {
    pub fn shared() -> Arc<Mutex<MemoryDb>> {
        Arc::new(Mutex::new(MemoryDb::default()))
    }

    pub fn fail_next(&mut self, failure: Failure) {
        self.pending_failure = Some(failure);
    }

    /// Stage `rows` one by one and commit them only if no row fails.
    /// A failure at row `k` discards rows `0..k`.
    fn stage<T: Clone>(
        &mut self,
        rows: &[T],
        failing_row: Option<usize>,
        table: &str,
    ) -> anyhow::Result<Vec<T>> {
        let mut staged = Vec::with_capacity(rows.len());
        for (index, row) in rows.iter().enumerate() {
            if failing_row == Some(index) {
                self.rolled_back_rows += staged.len();
                anyhow::bail!("insert into {table} failed at row {index}");
            }
            staged.push(row.clone());
        }
        Ok(staged)
    }

    fn take_failure(&mut self, matches: impl Fn(Failure) -> bool) -> Option<Failure> {
        match self.pending_failure {
            Some(failure) if matches(failure) => self.pending_failure.take(),
            _ => None,
        }
    }
}

pub struct MemoryConnector {
    db: Arc<Mutex<MemoryDb>>,
    refuse_first: u32,
    attempts: AtomicU32,
    failures: AtomicU32,
}

impl MemoryConnector {
    pub fn new(db: Arc<Mutex<MemoryDb>>) -> Self {
        Self {
            db,
            refuse_first: 0,
            attempts: AtomicU32::new(0),
            failures: AtomicU32::new(0),
        }
    }

    pub fn refusing_first(mut self, count: u32) -> Self {
        self.refuse_first = count;
        self
    }

    pub fn refusing_always(self) -> Self {
        self.refusing_first(u32::MAX)
    }

    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn failures(&self) -> u32 {
        self.failures.load(Ordering::SeqCst)
    }

    /// A store over the same tables, bypassing connection accounting.
    pub fn open(&self) -> MemoryStore {
        MemoryStore {
            db: Arc::clone(&self.db),
        }
    }
}

#[async_trait]
impl Connector for MemoryConnector {
    type Session = MemoryStore;

    fn target(&self) -> String {
        "memory:5432/testdb".to_string()
    }

    async fn connect(&self) -> anyhow::Result<MemoryStore> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        if attempt <= self.refuse_first {
            self.failures.fetch_add(1, Ordering::SeqCst);
            anyhow::bail!("connection refused (attempt {attempt})");
        }
        Ok(self.open())
    }
}

pub struct MemoryStore {
    db: Arc<Mutex<MemoryDb>>,
}

#[async_trait]
impl Store for MemoryStore {
    async fn ensure_schema(&mut self) -> anyhow::Result<()> {
        let mut db = self.db.lock().unwrap();
        if db.take_failure(|f| f == Failure::Schema).is_some() {
            anyhow::bail!("permission denied for schema public");
        }
        db.schema_calls += 1;
        Ok(())
    }

    async fn insert_catalog_items(
        &mut self,
        items: &[CatalogItem],
    ) -> anyhow::Result<Vec<CatalogId>> {
        let mut db = self.db.lock().unwrap();
        let failing_row = match db.take_failure(|f| matches!(f, Failure::CatalogRow(_))) {
            Some(Failure::CatalogRow(row)) => Some(row),
            _ => None,
        };
        let staged = db.stage(items, failing_row, "products")?;

        let first = db.products.len() as CatalogId + 1;
        let ids: Vec<CatalogId> = (first..first + staged.len() as CatalogId).collect();
        db.products.extend(ids.iter().copied().zip(staged));
        Ok(ids)
    }

    async fn insert_transactions(
        &mut self,
        transactions: &[Transaction],
    ) -> anyhow::Result<Vec<TransactionId>> {
        let mut db = self.db.lock().unwrap();
        let failing_row = match db.take_failure(|f| matches!(f, Failure::TransactionRow(_))) {
            Some(Failure::TransactionRow(row)) => Some(row),
            _ => None,
        };
        let staged = db.stage(transactions, failing_row, "sales")?;

        let dangling = staged
            .iter()
            .filter_map(|sale| sale.product_id)
            .filter(|id| !db.products.iter().any(|(stored, _)| stored == id))
            .count() as u32;
        db.dangling_references += dangling;

        let first = db.sales.len() as TransactionId + 1;
        let count = staged.len() as TransactionId;
        db.sales.extend(staged);
        Ok((first..first + count).collect())
    }

    async fn sample_catalog_ids(&mut self, limit: usize) -> anyhow::Result<Vec<CatalogId>> {
        let mut db = self.db.lock().unwrap();
        db.sample_calls += 1;
        let mut rng = rand::rng();
        Ok(db
            .products
            .iter()
            .map(|(id, _)| *id)
            .choose_multiple(&mut rng, limit))
    }

    async fn close(self) {
        self.db.lock().unwrap().closed = true;
    }
}
