use std::collections::HashMap;

/// Opaque cache key; the unit of partitioning.
pub type Key = String;

/// Opaque cache value.
pub type Value = String;

/// Position of a node in the configured endpoint list, in `[0, N)`.
pub type ShardIndex = usize;

/// Key-value pairs submitted together. Keys are unique, order is irrelevant.
pub type Batch = HashMap<Key, Value>;

/// One `Batch` per shard; entry `i` holds exactly the pairs owned by shard `i`.
pub type PerShardBatch = Vec<Batch>;
