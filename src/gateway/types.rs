use crate::error::CacheError;
use crate::routing::ShardIndex;
use serde::{Deserialize, Serialize};

/// A shard whose sub-batch was not applied.
#[derive(Debug)]
pub struct ShardFailure {
    pub shard: ShardIndex,
    /// Size of the sub-batch that was lost.
    pub keys: usize,
    pub error: CacheError,
}

/// Aggregate result of one fanned-out write.
#[derive(Debug, Default)]
pub struct WriteOutcome {
    /// Sum of the applied counts reported by the shards that succeeded.
    pub applied: usize,
    /// Number of shards that received a sub-batch.
    pub shards_called: usize,
    /// Shards whose call failed, ordered by shard index.
    pub failures: Vec<ShardFailure>,
}

impl WriteOutcome {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failed_shards(&self) -> Vec<ShardIndex> {
        self.failures.iter().map(|failure| failure.shard).collect()
    }
}

/// Body of the gateway's write response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriteResponse {
    pub applied: usize,
    pub failed_shards: Vec<ShardIndex>,
}

impl From<&WriteOutcome> for WriteResponse {
    fn from(outcome: &WriteOutcome) -> Self {
        Self {
            applied: outcome.applied,
            failed_shards: outcome.failed_shards(),
        }
    }
}
