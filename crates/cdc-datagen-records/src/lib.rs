//! Record factory for the CDC data generator.
//!
//! Produces the two row shapes the generator writes: catalog items
//! (`products`) and transactions (`sales`) that reference them. All values
//! are drawn from the caller's RNG so a seeded `StdRng` gives reproducible
//! output.
//!
//! # Example
//!
//! ```rust
//! use cdc_datagen_records::{EnFaker, RecordFactory};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let factory = RecordFactory::new(EnFaker);
//! let mut rng = StdRng::seed_from_u64(42);
//!
//! let item = factory.catalog_item(&mut rng);
//! let sale = factory.transaction(&mut rng, &[1, 2, 3]);
//! assert!(sale.product_id.is_some());
//! println!("{item:?} {sale:?}");
//! ```

pub mod faker;
pub mod record;

pub use faker::{EnFaker, FakeText};
pub use record::{
    CatalogId, CatalogItem, RecordFactory, Transaction, TransactionId, CATEGORIES, MAX_PRICE_CENTS,
    MAX_QUANTITY, MAX_STOCK, MIN_PRICE_CENTS, MIN_QUANTITY,
};
