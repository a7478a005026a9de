//! Error types for the PostgreSQL layer.

use thiserror::Error;

/// Errors that can occur while talking to PostgreSQL.
#[derive(Error, Debug)]
pub enum DatagenPostgresError {
    /// PostgreSQL connection or query error.
    #[error("PostgreSQL error: {0}")]
    PostgreSQL(#[from] tokio_postgres::Error),

    /// A schema statement failed; nothing from the provisioning transaction is kept.
    #[error("Schema step '{step}' failed: {source}")]
    Schema {
        step: &'static str,
        #[source]
        source: tokio_postgres::Error,
    },

    /// `INSERT ... RETURNING` produced a different number of ids than rows sent.
    #[error("Expected {expected} returned ids, got {actual}")]
    RowCountMismatch { expected: usize, actual: usize },
}
