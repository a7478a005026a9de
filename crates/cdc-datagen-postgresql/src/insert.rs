//! Batched `INSERT ... RETURNING id` writes and id sampling.

use crate::error::DatagenPostgresError;
use crate::schema::{PRODUCTS_TABLE, SALES_TABLE};
use crate::session::PostgresSession;
use cdc_datagen_records::{CatalogId, CatalogItem, Transaction, TransactionId};
use tokio_postgres::types::ToSql;
use tracing::debug;

pub const PRODUCT_COLUMNS: [&str; 4] = ["name", "category", "price", "stock_quantity"];

pub const SALE_COLUMNS: [&str; 5] = [
    "product_id",
    "customer_name",
    "customer_email",
    "quantity",
    "total_amount",
];

/// Build a multi-row `INSERT` with numbered placeholders, returning `id`.
pub fn build_insert_sql(table: &str, columns: &[&str], row_count: usize) -> String {
    let col_count = columns.len();
    let mut placeholders: Vec<String> = Vec::with_capacity(row_count);
    let mut param_idx = 1;

    for _ in 0..row_count {
        let row_placeholders: Vec<String> = (0..col_count)
            .map(|_| {
                let p = format!("${param_idx}");
                param_idx += 1;
                p
            })
            .collect();
        placeholders.push(format!("({})", row_placeholders.join(", ")));
    }

    format!(
        "INSERT INTO {} ({}) VALUES {} RETURNING id",
        table,
        columns.join(", "),
        placeholders.join(", ")
    )
}

impl PostgresSession {
    /// Insert all `items` in one statement and commit. Returns the assigned
    /// ids in insertion order. On error nothing from the batch is committed.
    pub async fn insert_catalog_items(
        &mut self,
        items: &[CatalogItem],
    ) -> Result<Vec<CatalogId>, DatagenPostgresError> {
        let mut params: Vec<&(dyn ToSql + Sync)> =
            Vec::with_capacity(items.len() * PRODUCT_COLUMNS.len());
        for item in items {
            params.push(&item.name);
            params.push(&item.category);
            params.push(&item.price);
            params.push(&item.stock_quantity);
        }

        let ids = self
            .insert_returning_ids(PRODUCTS_TABLE, &PRODUCT_COLUMNS, &params, items.len())
            .await?;
        debug!("Inserted {} products (IDs: {:?})", ids.len(), ids);
        Ok(ids)
    }

    /// Insert all `transactions` in one statement and commit. Same atomicity
    /// as [`PostgresSession::insert_catalog_items`].
    pub async fn insert_transactions(
        &mut self,
        transactions: &[Transaction],
    ) -> Result<Vec<TransactionId>, DatagenPostgresError> {
        let mut params: Vec<&(dyn ToSql + Sync)> =
            Vec::with_capacity(transactions.len() * SALE_COLUMNS.len());
        for sale in transactions {
            params.push(&sale.product_id);
            params.push(&sale.customer_name);
            params.push(&sale.customer_email);
            params.push(&sale.quantity);
            params.push(&sale.total_amount);
        }

        let ids = self
            .insert_returning_ids(SALES_TABLE, &SALE_COLUMNS, &params, transactions.len())
            .await?;
        debug!("Inserted {} sales (IDs: {:?})", ids.len(), ids);
        Ok(ids)
    }

    /// Up to `limit` catalog ids chosen uniformly at random from storage.
    pub async fn sample_catalog_ids(
        &self,
        limit: usize,
    ) -> Result<Vec<CatalogId>, DatagenPostgresError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = self
            .client
            .query(
                "SELECT id FROM products ORDER BY RANDOM() LIMIT $1",
                &[&limit],
            )
            .await?;
        rows.iter()
            .map(|row| row.try_get(0).map_err(DatagenPostgresError::from))
            .collect()
    }

    async fn insert_returning_ids(
        &mut self,
        table: &str,
        columns: &[&str],
        params: &[&(dyn ToSql + Sync)],
        row_count: usize,
    ) -> Result<Vec<i32>, DatagenPostgresError> {
        if row_count == 0 {
            return Ok(Vec::new());
        }

        let sql = build_insert_sql(table, columns, row_count);
        let transaction = self.client.transaction().await?;
        let rows = transaction.query(&sql, params).await?;
        let ids = rows
            .iter()
            .map(|row| row.try_get::<_, i32>(0))
            .collect::<Result<Vec<_>, _>>()?;

        // Dropping the transaction without commit rolls it back.
        if ids.len() != row_count {
            return Err(DatagenPostgresError::RowCountMismatch {
                expected: row_count,
                actual: ids.len(),
            });
        }

        transaction.commit().await?;
        Ok(ids)
    }
}
