use crate::routing::{Batch, Key, Value};

use dashmap::DashMap;

/// Node-local key-value store.
///
/// Every mutation runs under the write lock of the map shard owning the key,
/// so operations on one key are linearizable. The distinct-key count is the
/// map's own size; there is no second counter that could drift from it.
#[derive(Debug, Default)]
pub struct LocalStore {
    entries: DashMap<Key, Value>,
}

impl LocalStore {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.entries.get(key).map(|value| value.clone())
    }

    /// Inserts or overwrites `key`. Returns `true` when the key was not present
    /// before, i.e. when the distinct-key count grew by one.
    pub fn set(&self, key: Key, value: Value) -> bool {
        self.entries.insert(key, value).is_none()
    }

    /// Removes `key`. Returns `true` if a value was removed.
    pub fn delete(&self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Applies every pair of `batch` and returns how many pairs were processed.
    /// Overwrites count as applied.
    pub fn apply_batch(&self, batch: Batch) -> usize {
        let mut applied = 0;
        let mut inserted = 0;
        for (key, value) in batch {
            if self.set(key, value) {
                inserted += 1;
            }
            applied += 1;
        }
        tracing::debug!("Applied {} pairs ({} new keys)", applied, inserted);
        applied
    }

    /// Number of distinct keys currently held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Copies out every pair. Not a point-in-time snapshot under concurrent
    /// writes.
    pub fn dump(&self) -> Vec<(Key, Value)> {
        self.entries
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }
}
