//! Idempotent DDL for the two generated tables.

use crate::error::DatagenPostgresError;
use crate::session::PostgresSession;
use tracing::info;

pub const PRODUCTS_TABLE: &str = "products";
pub const SALES_TABLE: &str = "sales";

pub const CREATE_PRODUCTS: &str = r#"
    CREATE TABLE IF NOT EXISTS products (
        id SERIAL PRIMARY KEY,
        name VARCHAR(255) NOT NULL,
        category VARCHAR(100),
        price NUMERIC(10, 2),
        stock_quantity INTEGER,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    )
"#;

pub const CREATE_SALES: &str = r#"
    CREATE TABLE IF NOT EXISTS sales (
        id SERIAL PRIMARY KEY,
        product_id INTEGER,
        customer_name VARCHAR(255),
        customer_email VARCHAR(255),
        quantity INTEGER,
        total_amount NUMERIC(10, 2),
        sale_date TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    )
"#;

pub const PRODUCTS_REPLICA_IDENTITY: &str = "ALTER TABLE products REPLICA IDENTITY FULL";
pub const SALES_REPLICA_IDENTITY: &str = "ALTER TABLE sales REPLICA IDENTITY FULL";

/// Statements run by [`PostgresSession::ensure_schema`], in order, with the
/// label logged once each succeeds.
pub const SCHEMA_STATEMENTS: [(&str, &str); 4] = [
    ("products table ready", CREATE_PRODUCTS),
    ("sales table ready", CREATE_SALES),
    ("products replica identity set to FULL", PRODUCTS_REPLICA_IDENTITY),
    ("sales replica identity set to FULL", SALES_REPLICA_IDENTITY),
];

impl PostgresSession {
    /// Create `products` and `sales` if absent and make both publish full row
    /// images. Safe to call repeatedly. All statements commit together; a
    /// failure rolls back every one of them.
    pub async fn ensure_schema(&mut self) -> Result<(), DatagenPostgresError> {
        info!("Creating/verifying tables...");

        let transaction = self.client.transaction().await?;
        for (label, statement) in SCHEMA_STATEMENTS {
            transaction
                .batch_execute(statement)
                .await
                .map_err(|source| DatagenPostgresError::Schema { step: label, source })?;
            info!("  {}", label);
        }
        transaction.commit().await?;

        info!("Tables created/verified successfully");
        Ok(())
    }

    /// Whether `table` is configured with `REPLICA IDENTITY FULL`.
    pub async fn has_full_replica_identity(
        &self,
        table: &str,
    ) -> Result<bool, DatagenPostgresError> {
        let row = self
            .client
            .query_opt(
                "SELECT c.relreplident::text FROM pg_class c \
                 JOIN pg_namespace n ON n.oid = c.relnamespace \
                 WHERE c.relname = $1 AND n.nspname = current_schema()",
                &[&table],
            )
            .await?;
        Ok(matches!(row.map(|r| r.get::<_, String>(0)), Some(ident) if ident == "f"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_statements_are_idempotent() {
        assert!(CREATE_PRODUCTS.contains("CREATE TABLE IF NOT EXISTS products"));
        assert!(CREATE_SALES.contains("CREATE TABLE IF NOT EXISTS sales"));
    }

    #[test]
    fn test_ids_and_timestamps_are_server_assigned() {
        assert!(CREATE_PRODUCTS.contains("id SERIAL PRIMARY KEY"));
        assert!(CREATE_SALES.contains("id SERIAL PRIMARY KEY"));
        assert!(CREATE_PRODUCTS.contains("created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP"));
        assert!(CREATE_SALES.contains("sale_date TIMESTAMP DEFAULT CURRENT_TIMESTAMP"));
    }

    #[test]
    fn test_money_columns_have_two_fractional_digits() {
        assert!(CREATE_PRODUCTS.contains("price NUMERIC(10, 2)"));
        assert!(CREATE_SALES.contains("total_amount NUMERIC(10, 2)"));
    }

    #[test]
    fn test_both_tables_get_full_replica_identity() {
        let statements: Vec<&str> = SCHEMA_STATEMENTS.iter().map(|(_, s)| *s).collect();
        assert!(statements.contains(&"ALTER TABLE products REPLICA IDENTITY FULL"));
        assert!(statements.contains(&"ALTER TABLE sales REPLICA IDENTITY FULL"));
        // Tables must exist before their replica identity is altered.
        let position = |needle: &str| statements.iter().position(|s| s.contains(needle));
        assert!(position("CREATE TABLE IF NOT EXISTS products") < position("products REPLICA"));
        assert!(position("CREATE TABLE IF NOT EXISTS sales") < position("sales REPLICA"));
    }
}
