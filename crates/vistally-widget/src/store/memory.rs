//! In-memory store backend (tests and headless embedding).

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;

use vistally_core::{count::coerce_count, CounterKey, Result};

use super::CounterStore;

/// DashMap-backed store. `fetch_add` performs its read-modify-write under
/// the map's entry lock, so in-process increments cannot be lost.
#[derive(Default)]
pub struct MemoryStore {
    slots: DashMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            slots: DashMap::new(),
        }
    }
}

#[async_trait]
impl CounterStore for MemoryStore {
    async fn read_once(&self, key: &CounterKey) -> Result<Option<Value>> {
        Ok(self.slots.get(key.as_str()).map(|v| v.value().clone()))
    }

    async fn write(&self, key: &CounterKey, value: Value) -> Result<()> {
        self.slots.insert(key.as_str().to_string(), value);
        Ok(())
    }

    async fn fetch_add(&self, key: &CounterKey, delta: u64) -> Result<u64> {
        let mut slot = self
            .slots
            .entry(key.as_str().to_string())
            .or_insert(Value::Null);
        let next = coerce_count(Some(slot.value())).saturating_add(delta);
        *slot.value_mut() = Value::from(next);
        Ok(next)
    }
}
