//! Partition Routing Module
//!
//! Maps every key to exactly one shard of a fixed-size cluster.
//!
//! ## Core Concepts
//! - **Digest routing**: a key's shard is its MD5 digest, read as a big-endian
//!   128-bit integer, modulo the node count. The mapping is stable across
//!   processes and restarts, and agrees with deployments that compute
//!   `int(md5(key).hexdigest(), 16) % N`.
//! - **No ring**: changing the node count remaps almost every key. There is no
//!   rebalancing.
//! - **Batch splitting**: `Partitioner::partition` turns one write batch into one
//!   sub-batch per shard, losslessly and without overlap.

pub mod partitioner;
pub mod types;

pub use partitioner::{Partitioner, shard_of};
pub use types::{Batch, Key, PerShardBatch, ShardIndex, Value};
