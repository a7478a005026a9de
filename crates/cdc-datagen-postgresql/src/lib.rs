//! PostgreSQL plumbing for the CDC data generator.
//!
//! - [`PostgresSession`] wraps one `tokio_postgres::Client` and its
//!   connection task.
//! - [`PostgresSession::ensure_schema`] creates `products` and `sales` if
//!   absent and sets `REPLICA IDENTITY FULL` on both, so logical decoding
//!   emits complete before/after row images.
//! - [`PostgresSession::insert_catalog_items`] and
//!   [`PostgresSession::insert_transactions`] write a whole batch in one
//!   multi-row `INSERT ... RETURNING id` inside a transaction.

pub mod args;
pub mod error;
pub mod insert;
pub mod schema;
pub mod session;

pub use args::ConnectionArgs;
pub use error::DatagenPostgresError;
pub use schema::{PRODUCTS_TABLE, SALES_TABLE};
pub use session::PostgresSession;
