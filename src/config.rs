//! Static cluster configuration.
//!
//! The node list is fixed for the lifetime of a deployment: shard `i` is
//! always served by `endpoints[i]`, on the gateway and on every node.

use crate::error::{CacheError, Result};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_RPC_TIMEOUT: Duration = Duration::from_secs(3);
pub const DEFAULT_RPC_ATTEMPTS: usize = 1;
/// Default cap on concurrent RPC calls per node.
pub const DEFAULT_NODE_WORKERS: usize = 100;

/// Largest client body the gateway accepts on `POST /`.
pub const GATEWAY_BODY_LIMIT: usize = 2 * 1024 * 1024;
/// Largest RPC body a node accepts. Re-encoding a decoded batch never makes it
/// longer than the client body, but wrapping it in `kv_string` escapes every
/// quote and backslash, so a sub-batch can reach twice the gateway limit plus
/// the envelope.
pub const NODE_BODY_LIMIT: usize = 2 * GATEWAY_BODY_LIMIT + 64 * 1024;

/// Network address of one cache node, normalised to a base URL without a
/// trailing slash (e.g. `http://node0:8000`). Node RPC is plain HTTP, so
/// `https://` endpoints are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeEndpoint(String);

impl NodeEndpoint {
    pub fn base_url(&self) -> &str {
        &self.0
    }
}

impl FromStr for NodeEndpoint {
    type Err = CacheError;

    fn from_str(raw: &str) -> Result<Self> {
        let trimmed = raw.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(CacheError::Config("empty node endpoint".to_string()));
        }
        if trimmed.starts_with("https://") {
            return Err(CacheError::Config(format!(
                "node endpoint {} uses https; node RPC only speaks plain http",
                trimmed
            )));
        }
        if trimmed.starts_with("http://") {
            Ok(Self(trimmed.to_string()))
        } else {
            Ok(Self(format!("http://{}", trimmed)))
        }
    }
}

impl fmt::Display for NodeEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone)]
pub struct ClusterConfig {
    /// Ordered node endpoints; the position is the shard index.
    pub endpoints: Vec<NodeEndpoint>,
    /// Per-call timeout applied to every node RPC.
    pub rpc_timeout: Duration,
    /// Total attempts per node RPC. `1` disables retries.
    pub rpc_attempts: usize,
}

impl ClusterConfig {
    pub fn new(endpoints: Vec<NodeEndpoint>) -> Self {
        Self {
            endpoints,
            rpc_timeout: DEFAULT_RPC_TIMEOUT,
            rpc_attempts: DEFAULT_RPC_ATTEMPTS,
        }
    }

    /// Builds a config from a comma-separated endpoint list such as
    /// `node0:8000,node1:8000,node2:8000`.
    pub fn from_endpoint_list(list: &str) -> Result<Self> {
        let endpoints = parse_endpoints(list)?;
        let config = Self::new(endpoints);
        config.validate()?;
        Ok(config)
    }

    pub fn with_rpc_timeout(mut self, timeout: Duration) -> Self {
        self.rpc_timeout = timeout;
        self
    }

    pub fn with_rpc_attempts(mut self, attempts: usize) -> Self {
        self.rpc_attempts = attempts;
        self
    }

    pub fn shard_count(&self) -> usize {
        self.endpoints.len()
    }

    pub fn validate(&self) -> Result<()> {
        if self.endpoints.is_empty() {
            return Err(CacheError::Config(
                "at least one node endpoint is required".to_string(),
            ));
        }
        if self.rpc_attempts == 0 {
            return Err(CacheError::Config("rpc_attempts must be >= 1".to_string()));
        }
        if self.rpc_timeout.is_zero() {
            return Err(CacheError::Config("rpc_timeout must be non-zero".to_string()));
        }
        Ok(())
    }
}

pub fn parse_endpoints(list: &str) -> Result<Vec<NodeEndpoint>> {
    list.split(',')
        .filter(|part| !part.trim().is_empty())
        .map(NodeEndpoint::from_str)
        .collect()
}
