//! Sharded In-Memory Cache Library
//!
//! Core of a key-value cache that spreads keys over a fixed set of nodes.
//! The binary (`main.rs`) wires these modules into node and gateway processes.
//!
//! ## Architecture Modules
//! - **`routing`**: Deterministic key-to-shard mapping (MD5 modulo node count)
//!   and per-shard batch splitting.
//! - **`storage`**: The node-local concurrent store whose size is the
//!   authoritative distinct-key count.
//! - **`node`**: The cache node service and its Update / Search / Delete RPC
//!   endpoints.
//! - **`client`**: Per-shard RPC clients and the lazily populated pool that
//!   holds them.
//! - **`gateway`**: Fans writes out to shards, routes reads and deletes, and
//!   serves the client-facing HTTP surface.
//! - **`config`** / **`error`**: Static cluster configuration and the shared
//!   error taxonomy.

pub mod client;
pub mod config;
pub mod error;
pub mod gateway;
pub mod node;
pub mod routing;
pub mod storage;

#[cfg(test)]
pub(crate) mod test_support;
