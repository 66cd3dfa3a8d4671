//! Node Client Module
//!
//! The gateway's side of the node RPC contract: `NodeClient` speaks to one
//! node, `NodeClientPool` keeps one lazily created client per shard.
//!
//! Errors from the transport or the node are returned to the caller as they
//! are. Nothing here retries unless `rpc_attempts` is raised above one.

pub mod node_client;
pub mod pool;

pub use node_client::NodeClient;
pub use pool::NodeClientPool;
