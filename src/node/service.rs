//! Cache Node Service
//!
//! The RPC-facing operations of a single node, backed by the node's own
//! `LocalStore`. Every node instance owns its state outright, so several
//! nodes can live side by side in one process.

use super::protocol::decode_batch;
use super::types::NodeId;
use crate::error::Result;
use crate::routing::{Batch, Value};
use crate::storage::LocalStore;

use std::sync::Arc;
use tokio::sync::{AcquireError, Semaphore, SemaphorePermit};

pub struct CacheNode {
    node_id: NodeId,
    store: LocalStore,
    /// Caps the number of RPC calls executing at once.
    workers: Semaphore,
    worker_limit: usize,
}

impl CacheNode {
    /// Creates a node with an empty store that runs at most `worker_limit`
    /// calls concurrently.
    pub fn new(worker_limit: usize) -> Arc<Self> {
        let worker_limit = worker_limit.max(1);
        let node_id = NodeId::new();
        tracing::info!(
            "Cache node {} created (worker limit {})",
            node_id,
            worker_limit
        );

        Arc::new(Self {
            node_id,
            store: LocalStore::new(),
            workers: Semaphore::new(worker_limit),
            worker_limit,
        })
    }

    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    pub fn worker_limit(&self) -> usize {
        self.worker_limit
    }

    /// Waits for a free worker slot. The slot is released when the permit drops.
    pub async fn acquire_worker(&self) -> std::result::Result<SemaphorePermit<'_>, AcquireError> {
        self.workers.acquire().await
    }

    /// Update: decodes `kv_string` and applies every pair. A payload that does
    /// not decode is rejected before anything is written.
    pub fn update(&self, kv_string: &str) -> Result<usize> {
        let batch = decode_batch(kv_string)?;
        Ok(self.update_batch(batch))
    }

    pub fn update_batch(&self, batch: Batch) -> usize {
        let applied = self.store.apply_batch(batch);
        tracing::debug!(
            "Update applied {} pairs, node now holds {} keys",
            applied,
            self.store.len()
        );
        applied
    }

    pub fn search(&self, key: &str) -> Option<Value> {
        self.store.get(key)
    }

    /// Delete: `1` if the key was present, `0` otherwise.
    pub fn delete(&self, key: &str) -> usize {
        if self.store.delete(key) { 1 } else { 0 }
    }

    /// Distinct keys currently held.
    pub fn key_count(&self) -> usize {
        self.store.len()
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }
}
