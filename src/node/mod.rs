//! Cache Node Module
//!
//! The per-node side of the cluster: one `CacheNode` owns one `LocalStore` and
//! exposes it through the Update / Search / Delete RPC contract.
//!
//! ## Core Concepts
//! - **Update** applies a whole batch and reports how many pairs it processed.
//!   A batch that fails to decode is rejected without touching the store.
//! - **Search** and **Delete** report absence as a normal result (`{}` / `0`).
//! - **Bounded workers**: a semaphore caps how many calls run at once.
//! - **Explicit lifecycle**: `server::serve` blocks until its shutdown future
//!   resolves.

pub mod handlers;
pub mod protocol;
pub mod server;
pub mod service;
pub mod types;

pub use service::CacheNode;
pub use types::NodeId;

#[cfg(test)]
mod tests;
