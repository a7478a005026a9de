//! A single PostgreSQL session.

use crate::args::ConnectionArgs;
use crate::error::DatagenPostgresError;
use tokio::task::JoinHandle;
use tokio_postgres::{Client, NoTls};

/// One open connection. All generator writes go through it.
pub struct PostgresSession {
    pub(crate) client: Client,
    connection: JoinHandle<()>,
}

impl PostgresSession {
    /// Open a session. Makes exactly one attempt; retrying is the caller's job.
    pub async fn connect(args: &ConnectionArgs) -> Result<Self, DatagenPostgresError> {
        Self::connect_str(&args.connection_string()).await
    }

    /// Open a session from a libpq key/value string or a `postgres://` URL.
    pub async fn connect_str(connection_string: &str) -> Result<Self, DatagenPostgresError> {
        let (client, connection) = tokio_postgres::connect(connection_string, NoTls).await?;

        // Spawn the connection task
        let connection = tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!("PostgreSQL connection error: {}", e);
            }
        });

        // Test connection
        client.simple_query("SELECT 1").await?;

        Ok(Self { client, connection })
    }

    /// Borrow the underlying client, e.g. for ad-hoc verification queries.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Row count of `table`. `table` must be a trusted identifier.
    pub async fn row_count(&self, table: &str) -> Result<u64, DatagenPostgresError> {
        let row = self
            .client
            .query_one(&format!("SELECT COUNT(*) FROM \"{table}\""), &[])
            .await?;
        let count: i64 = row.get(0);
        Ok(count as u64)
    }

    /// Close the session and wait for the connection task to finish.
    pub async fn close(self) {
        drop(self.client);
        if let Err(e) = self.connection.await {
            tracing::warn!("PostgreSQL connection task ended abnormally: {}", e);
        }
    }
}
