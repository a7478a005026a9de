//! [`Connector`] and [`Store`] for PostgreSQL.

use crate::connect::Connector;
use crate::store::Store;
use async_trait::async_trait;
use cdc_datagen_postgresql::{ConnectionArgs, PostgresSession};
use cdc_datagen_records::{CatalogId, CatalogItem, Transaction, TransactionId};

/// Connects with the configured `DB_*` parameters.
pub struct PostgresConnector {
    args: ConnectionArgs,
}

impl PostgresConnector {
    pub fn new(args: ConnectionArgs) -> Self {
        Self { args }
    }
}

#[async_trait]
impl Connector for PostgresConnector {
    type Session = PostgresSession;

    fn target(&self) -> String {
        self.args.target()
    }

    async fn connect(&self) -> anyhow::Result<PostgresSession> {
        Ok(PostgresSession::connect(&self.args).await?)
    }
}

#[async_trait]
impl Store for PostgresSession {
    async fn ensure_schema(&mut self) -> anyhow::Result<()> {
        Ok(PostgresSession::ensure_schema(self).await?)
    }

    async fn insert_catalog_items(
        &mut self,
        items: &[CatalogItem],
    ) -> anyhow::Result<Vec<CatalogId>> {
        Ok(PostgresSession::insert_catalog_items(self, items).await?)
    }

    async fn insert_transactions(
        &mut self,
        transactions: &[Transaction],
    ) -> anyhow::Result<Vec<TransactionId>> {
        Ok(PostgresSession::insert_transactions(self, transactions).await?)
    }

    async fn sample_catalog_ids(&mut self, limit: usize) -> anyhow::Result<Vec<CatalogId>> {
        Ok(PostgresSession::sample_catalog_ids(self, limit).await?)
    }

    async fn close(self) {
        PostgresSession::close(self).await
    }
}
