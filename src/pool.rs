//! Bounded working set of catalog ids used as sale references.

use cdc_datagen_records::CatalogId;

/// Default pool cap
pub const DEFAULT_POOL_CAP: usize = 100;

/// Known catalog ids in insertion order.
///
/// The pool grows with every insert and is replaced by a fresh random sample
/// from storage once it exceeds its cap, so it never holds more than `cap`
/// ids right after a refresh check.
#[derive(Debug, Clone)]
pub struct IdPool {
    ids: Vec<CatalogId>,
    cap: usize,
}

impl IdPool {
    pub fn new(cap: usize) -> Self {
        Self {
            ids: Vec::new(),
            cap: cap.max(1),
        }
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn as_slice(&self) -> &[CatalogId] {
        &self.ids
    }

    pub fn extend(&mut self, ids: &[CatalogId]) {
        self.ids.extend_from_slice(ids);
    }

    pub fn needs_refresh(&self) -> bool {
        self.ids.len() > self.cap
    }

    /// Replace the whole pool, keeping at most `cap` ids.
    pub fn replace(&mut self, mut ids: Vec<CatalogId>) {
        ids.truncate(self.cap);
        self.ids = ids;
    }
}

impl Default for IdPool {
    fn default() -> Self {
        Self::new(DEFAULT_POOL_CAP)
    }
}
