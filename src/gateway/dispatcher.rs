//! Gateway Dispatcher
//!
//! Routes client operations to the owning nodes:
//! 1. **Writes** are split per shard and sent to every shard with a non-empty
//!    sub-batch at once. The call waits for all of them.
//! 2. **Reads and deletes** go to the single shard owning the key.
//!
//! A multi-shard write is not atomic. Sub-batches that reach their node stay
//! applied; those that fail are logged, left out of the applied count, and
//! reported in the `WriteOutcome`.

use super::types::{ShardFailure, WriteOutcome};
use crate::client::NodeClientPool;
use crate::config::ClusterConfig;
use crate::error::Result;
use crate::routing::{Batch, Partitioner, ShardIndex, Value};

use std::sync::Arc;

pub struct Gateway {
    partitioner: Partitioner,
    pool: NodeClientPool,
}

impl Gateway {
    pub fn new(config: &ClusterConfig) -> Result<Arc<Self>> {
        config.validate()?;
        let partitioner = Partitioner::new(config.shard_count())?;

        tracing::info!(
            "Gateway routing across {} shards (timeout {:?}, attempts {})",
            config.shard_count(),
            config.rpc_timeout,
            config.rpc_attempts
        );
        for (shard, endpoint) in config.endpoints.iter().enumerate() {
            tracing::info!("  - shard {} -> {}", shard, endpoint);
        }

        Ok(Arc::new(Self {
            partitioner,
            pool: NodeClientPool::new(config),
        }))
    }

    pub fn partitioner(&self) -> &Partitioner {
        &self.partitioner
    }

    pub fn pool(&self) -> &NodeClientPool {
        &self.pool
    }

    pub fn shard_of(&self, key: &str) -> ShardIndex {
        self.partitioner.shard_of(key)
    }

    /// Splits `batch` by shard and applies every non-empty sub-batch
    /// concurrently. Never fails as a whole.
    pub async fn write_batch(&self, batch: Batch) -> WriteOutcome {
        let per_shard = self.partitioner.partition(batch);

        let shard_futures: Vec<_> = per_shard
            .into_iter()
            .enumerate()
            .filter(|(_, sub_batch)| !sub_batch.is_empty())
            .map(|(shard, sub_batch)| async move {
                let keys = sub_batch.len();
                let result = match self.pool.get_client(shard) {
                    Ok(client) => client.update(&sub_batch).await,
                    Err(e) => Err(e),
                };
                (shard, keys, result)
            })
            .collect();

        let shards_called = shard_futures.len();
        let shard_results = futures::future::join_all(shard_futures).await;

        let mut outcome = WriteOutcome {
            shards_called,
            ..WriteOutcome::default()
        };
        for (shard, keys, result) in shard_results {
            match result {
                Ok(applied) => {
                    tracing::debug!("Shard {} applied {} pairs", shard, applied);
                    outcome.applied += applied;
                }
                Err(error) => {
                    tracing::warn!("Update of {} keys on shard {} failed: {}", keys, shard, error);
                    outcome.failures.push(ShardFailure { shard, keys, error });
                }
            }
        }

        outcome.failures.sort_by_key(|failure| failure.shard);
        outcome
    }

    /// Looks `key` up on its owning shard. `Ok(None)` is a clean miss.
    pub async fn get(&self, key: &str) -> Result<Option<Value>> {
        let shard = self.shard_of(key);
        let client = self.pool.get_client(shard)?;

        client.search(key).await.inspect_err(|e| {
            tracing::error!("Search of {} on shard {} failed: {}", key, shard, e);
        })
    }

    /// Deletes `key` on its owning shard and returns the node's count (0 or 1).
    pub async fn delete(&self, key: &str) -> Result<usize> {
        let shard = self.shard_of(key);
        let client = self.pool.get_client(shard)?;

        client.delete(key).await.inspect_err(|e| {
            tracing::error!("Delete of {} on shard {} failed: {}", key, shard, e);
        })
    }

    /// Seeds `key-1..=key-<count>` with `value <i>` through the normal write
    /// path.
    pub async fn preload(&self, count: usize) -> WriteOutcome {
        let batch: Batch = (1..=count)
            .map(|i| (format!("key-{}", i), format!("value {}", i)))
            .collect();

        let outcome = self.write_batch(batch).await;
        if outcome.is_complete() {
            tracing::info!("Preloaded {} keys", outcome.applied);
        } else {
            tracing::warn!(
                "Preload applied {} of {} keys; failed shards: {:?}",
                outcome.applied,
                count,
                outcome.failed_shards()
            );
        }
        outcome
    }

    /// Closes every cached node client.
    pub fn shutdown(&self) {
        self.pool.shutdown();
    }
}
