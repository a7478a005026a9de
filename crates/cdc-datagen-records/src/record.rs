//! Catalog item and transaction records.

use crate::faker::{EnFaker, FakeText};
use rand::Rng;
use rust_decimal::{Decimal, RoundingStrategy};

/// Identifier assigned by the database (`SERIAL`) to a catalog item.
pub type CatalogId = i32;

/// Identifier assigned by the database to a transaction.
pub type TransactionId = i32;

/// Fixed set of catalog categories.
pub const CATEGORIES: [&str; 7] = [
    "Electronics",
    "Clothing",
    "Food",
    "Books",
    "Home",
    "Sports",
    "Toys",
];

/// Lowest price, in cents (5.99).
pub const MIN_PRICE_CENTS: i64 = 599;
/// Highest price, in cents (999.99).
pub const MAX_PRICE_CENTS: i64 = 99_999;
/// Highest stock quantity (inclusive, lowest is 0).
pub const MAX_STOCK: i32 = 500;
/// Lowest quantity per transaction.
pub const MIN_QUANTITY: i32 = 1;
/// Highest quantity per transaction.
pub const MAX_QUANTITY: i32 = 10;

/// A row destined for the `products` table.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogItem {
    pub name: String,
    pub category: &'static str,
    pub price: Decimal,
    pub stock_quantity: i32,
}

/// A row destined for the `sales` table.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// Referenced catalog item, `None` when no candidates were available.
    pub product_id: Option<CatalogId>,
    pub customer_name: String,
    pub customer_email: String,
    pub quantity: i32,
    /// Price the total was computed from. Drawn independently of the
    /// referenced item's catalog price and not persisted.
    pub unit_price: Decimal,
    pub total_amount: Decimal,
}

/// Builds randomized records from a [`FakeText`] source.
#[derive(Debug, Clone)]
pub struct RecordFactory<F = EnFaker> {
    faker: F,
}

impl Default for RecordFactory<EnFaker> {
    fn default() -> Self {
        Self::new(EnFaker)
    }
}

impl<F: FakeText> RecordFactory<F> {
    pub fn new(faker: F) -> Self {
        Self { faker }
    }

    /// Generate one catalog item.
    pub fn catalog_item<R: Rng>(&self, rng: &mut R) -> CatalogItem {
        CatalogItem {
            name: self.faker.catch_phrase(rng),
            category: CATEGORIES[rng.random_range(0..CATEGORIES.len())],
            price: random_price(rng),
            stock_quantity: rng.random_range(0..=MAX_STOCK),
        }
    }

    /// Generate one transaction referencing a uniformly chosen element of
    /// `candidates`, or nothing when `candidates` is empty.
    pub fn transaction<R: Rng>(&self, rng: &mut R, candidates: &[CatalogId]) -> Transaction {
        let quantity = rng.random_range(MIN_QUANTITY..=MAX_QUANTITY);
        let unit_price = random_price(rng);
        let product_id = if candidates.is_empty() {
            None
        } else {
            Some(candidates[rng.random_range(0..candidates.len())])
        };

        Transaction {
            product_id,
            customer_name: self.faker.name(rng),
            customer_email: self.faker.email(rng),
            quantity,
            unit_price,
            total_amount: round_money(unit_price * Decimal::from(quantity)),
        }
    }

    pub fn catalog_items<R: Rng>(&self, rng: &mut R, count: usize) -> Vec<CatalogItem> {
        (0..count).map(|_| self.catalog_item(rng)).collect()
    }

    pub fn transactions<R: Rng>(
        &self,
        rng: &mut R,
        candidates: &[CatalogId],
        count: usize,
    ) -> Vec<Transaction> {
        (0..count)
            .map(|_| self.transaction(rng, candidates))
            .collect()
    }
}

/// Round to cents, halves away from zero.
fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Uniform price in [5.99, 999.99] with two fractional digits.
fn random_price<R: Rng>(rng: &mut R) -> Decimal {
    Decimal::new(rng.random_range(MIN_PRICE_CENTS..=MAX_PRICE_CENTS), 2)
}
