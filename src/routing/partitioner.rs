use super::types::{Batch, PerShardBatch, ShardIndex};
use crate::error::{CacheError, Result};
use md5::{Digest, Md5};

/// Returns the shard owning `key` in a cluster of `shard_count` nodes.
///
/// `shard_count` must be non-zero; `Partitioner` guarantees this for callers
/// that go through it.
pub fn shard_of(key: &str, shard_count: usize) -> ShardIndex {
    let digest = Md5::digest(key.as_bytes());
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&digest);
    let hash = u128::from_be_bytes(bytes);
    (hash % shard_count as u128) as ShardIndex
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partitioner {
    shard_count: usize,
}

impl Partitioner {
    pub fn new(shard_count: usize) -> Result<Self> {
        if shard_count == 0 {
            return Err(CacheError::Config(
                "partitioner needs at least one shard".to_string(),
            ));
        }
        Ok(Self { shard_count })
    }

    pub fn shard_count(&self) -> usize {
        self.shard_count
    }

    pub fn shard_of(&self, key: &str) -> ShardIndex {
        shard_of(key, self.shard_count)
    }

    /// Splits `batch` into `shard_count` sub-batches. Empty sub-batches are kept
    /// so that the index of each entry is its shard.
    pub fn partition(&self, batch: Batch) -> PerShardBatch {
        let mut per_shard: PerShardBatch = vec![Batch::new(); self.shard_count];
        for (key, value) in batch {
            let shard = self.shard_of(&key);
            per_shard[shard].insert(key, value);
        }
        per_shard
    }
}
