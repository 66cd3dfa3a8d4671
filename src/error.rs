//! Error taxonomy shared by the node service, the client pool and the gateway.
//!
//! "Not found" is deliberately absent: a missing key is a normal result
//! (`None` from Search, `0` from Delete) and never travels as an error.

use crate::routing::ShardIndex;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    /// An Update payload could not be decoded into key-value pairs.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The transport could not reach the shard's endpoint.
    #[error("shard {shard} unreachable: {source}")]
    Connection {
        shard: ShardIndex,
        #[source]
        source: reqwest::Error,
    },

    /// The shard did not answer within the configured RPC timeout.
    #[error("shard {shard} timed out after {timeout:?}")]
    Timeout { shard: ShardIndex, timeout: Duration },

    /// The node answered with a non-success status.
    #[error("shard {shard} rejected {call} with status {status}: {message}")]
    Remote {
        shard: ShardIndex,
        call: &'static str,
        status: u16,
        message: String,
    },

    /// The node's response body could not be decoded.
    #[error("malformed {call} response from shard {shard}: {message}")]
    Decode {
        shard: ShardIndex,
        call: &'static str,
        message: String,
    },

    /// A shard index outside the configured endpoint list.
    #[error("shard {shard} is out of range for {shard_count} configured nodes")]
    UnknownShard {
        shard: ShardIndex,
        shard_count: usize,
    },

    /// Rejected cluster configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl CacheError {
    /// Maps a transport error from `reqwest` onto the taxonomy.
    pub(crate) fn from_transport(shard: ShardIndex, timeout: Duration, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CacheError::Timeout { shard, timeout }
        } else {
            CacheError::Connection { shard, source: err }
        }
    }

    /// Whether the failure happened before the node produced an answer.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            CacheError::Connection { .. } | CacheError::Timeout { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, CacheError>;
