//! Read-increment-write-display for a single counter key.

use vistally_core::{CounterKey, Result};

use crate::page::DisplaySlot;
use crate::store::StoreHandle;

/// The visit counter: one atomic increment plus an optional display update.
pub struct VisitCounter {
    store: StoreHandle,
}

impl VisitCounter {
    pub fn new(store: StoreHandle) -> Self {
        Self { store }
    }

    /// Record one visit against `raw_url` and render the fresh count into
    /// every target slot.
    ///
    /// The increment is atomic at the store, so concurrent visitors cannot
    /// lose each other's updates; a slot that was never written (or holds
    /// junk) counts from zero. Zero targets means count-only. On error the
    /// display is left untouched.
    pub async fn record_visit(&self, raw_url: &str, targets: &[DisplaySlot]) -> Result<u64> {
        let key = CounterKey::derive(raw_url);
        let count = self.store.fetch_add(&key, 1).await?;
        tracing::debug!(key = %key, count, "visit recorded");

        for slot in targets {
            slot.set_text(&count.to_string());
        }
        Ok(count)
    }
}
