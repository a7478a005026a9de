//! The write/read surface the generation loop needs from a session.

use async_trait::async_trait;
use cdc_datagen_records::{CatalogId, CatalogItem, Transaction, TransactionId};

/// One live session against the target database.
///
/// Batch inserts are atomic: either every row of the batch is committed and
/// its ids are returned in insertion order, or an error is returned and no
/// row of the batch is visible.
#[async_trait]
pub trait Store: Send + Sized {
    /// Create both tables if absent and enable full row-image capture.
    async fn ensure_schema(&mut self) -> anyhow::Result<()>;

    async fn insert_catalog_items(&mut self, items: &[CatalogItem])
        -> anyhow::Result<Vec<CatalogId>>;

    async fn insert_transactions(
        &mut self,
        transactions: &[Transaction],
    ) -> anyhow::Result<Vec<TransactionId>>;

    /// Up to `limit` existing catalog ids, sampled uniformly at random.
    async fn sample_catalog_ids(&mut self, limit: usize) -> anyhow::Result<Vec<CatalogId>>;

    /// Release the session.
    async fn close(self);
}
