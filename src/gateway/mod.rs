//! Gateway Module
//!
//! The client-facing front of the cluster. It owns the `Partitioner` and the
//! `NodeClientPool` and never touches node storage directly.
//!
//! ## HTTP surface
//! - `POST /`: JSON object of key/value strings. Responds with the applied
//!   count and the shards that failed.
//! - `GET /{key}`: `{"key": "value"}`, or 404 when absent.
//! - `DELETE /{key}`: deleted count (`0` or `1`) as text.

pub mod dispatcher;
pub mod handlers;
pub mod server;
pub mod types;

pub use dispatcher::Gateway;
pub use types::{ShardFailure, WriteOutcome, WriteResponse};
