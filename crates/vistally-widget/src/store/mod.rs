//! Counter storage seam.
//!
//! The store is constructed once at startup and injected as a shared
//! handle; nothing in the widget reaches for an ambient global, so tests
//! substitute the in-memory backend.
//!
//! - `CounterStore`: async read/write/increment contract.
//! - `Reference`: a handle bound to one key.
//! - Backends: `memory` (in-process) and `rtdb` (remote REST).

pub mod memory;
pub mod rtdb;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use vistally_core::{CounterKey, Result};

pub use memory::MemoryStore;
pub use rtdb::RtdbStore;

/// Shared handle to a store backend.
pub type StoreHandle = Arc<dyn CounterStore>;

#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Fetch the current stored value once; a never-written key reads as
    /// `None`.
    async fn read_once(&self, key: &CounterKey) -> Result<Option<Value>>;

    /// Unconditionally overwrite the value at `key`.
    async fn write(&self, key: &CounterKey, value: Value) -> Result<()>;

    /// Atomically add `delta` to the count at `key` and return the new
    /// count. Absent, null, and junk stored content counts from zero.
    /// Concurrent increments must not lose updates.
    async fn fetch_add(&self, key: &CounterKey, delta: u64) -> Result<u64>;
}

/// Handle addressing one key in a store.
#[derive(Clone)]
pub struct Reference {
    store: StoreHandle,
    key: CounterKey,
}

impl Reference {
    pub fn new(store: StoreHandle, key: CounterKey) -> Self {
        Self { store, key }
    }

    pub fn key(&self) -> &CounterKey {
        &self.key
    }

    pub async fn read_once(&self) -> Result<Option<Value>> {
        self.store.read_once(&self.key).await
    }

    pub async fn set(&self, value: Value) -> Result<()> {
        self.store.write(&self.key, value).await
    }

    pub async fn fetch_add(&self, delta: u64) -> Result<u64> {
        self.store.fetch_add(&self.key, delta).await
    }
}
