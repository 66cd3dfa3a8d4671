//! Node Client Pool
//!
//! Holds at most one `NodeClient` per shard. Handles are built on first use
//! and then shared by every request that targets the shard.
//!
//! Creation policy: the create-if-absent step runs under the write lock of the
//! map shard holding that index, so concurrent first calls for one shard
//! build exactly one handle. Lookups of existing handles only take a read lock.
//! A failed RPC never evicts or rebuilds a handle; `shutdown` is the only
//! teardown path.

use super::node_client::NodeClient;
use crate::config::{ClusterConfig, NodeEndpoint};
use crate::error::{CacheError, Result};
use crate::routing::ShardIndex;

use dashmap::DashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub struct NodeClientPool {
    endpoints: Vec<NodeEndpoint>,
    rpc_timeout: Duration,
    rpc_attempts: usize,
    clients: DashMap<ShardIndex, Arc<NodeClient>>,
    created: AtomicUsize,
}

impl NodeClientPool {
    pub fn new(config: &ClusterConfig) -> Self {
        Self {
            endpoints: config.endpoints.clone(),
            rpc_timeout: config.rpc_timeout,
            rpc_attempts: config.rpc_attempts,
            clients: DashMap::new(),
            created: AtomicUsize::new(0),
        }
    }

    pub fn shard_count(&self) -> usize {
        self.endpoints.len()
    }

    /// Returns the handle for `shard`, building it on first use.
    ///
    /// Only fails for an index outside the configured endpoint list.
    pub fn get_client(&self, shard: ShardIndex) -> Result<Arc<NodeClient>> {
        let Some(endpoint) = self.endpoints.get(shard) else {
            return Err(CacheError::UnknownShard {
                shard,
                shard_count: self.endpoints.len(),
            });
        };

        if let Some(client) = self.clients.get(&shard) {
            return Ok(client.value().clone());
        }

        let client = self
            .clients
            .entry(shard)
            .or_insert_with(|| {
                self.created.fetch_add(1, Ordering::SeqCst);
                tracing::info!("Opening client for shard {} at {}", shard, endpoint);
                Arc::new(NodeClient::new(
                    shard,
                    endpoint.clone(),
                    self.rpc_timeout,
                    self.rpc_attempts,
                ))
            })
            .value()
            .clone();

        Ok(client)
    }

    /// Number of handles currently cached.
    pub fn cached_clients(&self) -> usize {
        self.clients.len()
    }

    /// Number of handles built since the pool was created.
    pub fn created_clients(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    /// Drops every cached handle. Calls already holding a handle finish
    /// normally; a later `get_client` builds a fresh one.
    pub fn shutdown(&self) {
        let open = self.clients.len();
        self.clients.clear();
        tracing::info!("Client pool shut down ({} handles closed)", open);
    }
}
