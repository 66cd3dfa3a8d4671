//! Local Storage Module
//!
//! The in-memory store owned by a single cache node.
//!
//! ## Core Concepts
//! - **Ownership**: one `LocalStore` per node instance, created at startup and
//!   mutated only by that node's Update/Delete handlers.
//! - **Striped locking**: keys live in a `DashMap`, so writers to different keys
//!   rarely contend while writes to the same key stay serialized.
//! - **Authoritative size**: the distinct-key count is the map's length.

pub mod memory;

pub use memory::LocalStore;
