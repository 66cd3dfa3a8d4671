//! Cache Node RPC Protocol
//!
//! Endpoints and Data Transfer Objects for gateway-to-node calls, carried as
//! JSON over HTTP.
//!
//! Key-value batches travel as a single serialized JSON text blob
//! (`kv_string`) rather than as a native map field, and the field names match
//! the counters existing nodes report (`update_cnt`, `delete_cnt`).

use crate::error::{CacheError, Result};
use crate::routing::{Batch, Value};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// --- API Endpoints ---

/// Applies a batch of key-value pairs.
pub const ENDPOINT_UPDATE: &str = "/rpc/update";
/// Looks up a single key.
pub const ENDPOINT_SEARCH: &str = "/rpc/search";
/// Removes a single key.
pub const ENDPOINT_DELETE: &str = "/rpc/delete";
/// Read-only diagnostics (node id and distinct-key count).
pub const ENDPOINT_STATS: &str = "/rpc/stats";

// --- Data Transfer Objects ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateKeyValueRequest {
    /// JSON object of string keys to string values.
    pub kv_string: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateKeyValueResponse {
    /// Number of pairs processed, overwrites included.
    pub update_cnt: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchKeyValueRequest {
    pub key: String,
}

/// `kv_string` is `{"<key>": "<value>"}` on a hit and `{}` on a miss.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchKeyValueResponse {
    pub kv_string: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteKeyValueRequest {
    pub key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteKeyValueResponse {
    /// `1` if a value was removed, `0` if the key was absent.
    pub delete_cnt: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeStatsResponse {
    pub node_id: String,
    /// Distinct keys currently held by the node.
    pub key_count: usize,
}

/// Body returned with any non-success status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcErrorResponse {
    pub error: String,
}

// --- kv_string codec ---

pub fn encode_batch(batch: &Batch) -> String {
    // A map of strings always serializes.
    serde_json::to_string(batch).unwrap_or_else(|_| "{}".to_string())
}

/// Decodes an Update payload. Anything other than a JSON object of strings is
/// an `InvalidArgument`.
pub fn decode_batch(kv_string: &str) -> Result<Batch> {
    serde_json::from_str::<Batch>(kv_string).map_err(|e| {
        CacheError::InvalidArgument(format!("kv_string is not a JSON object of strings: {}", e))
    })
}

pub fn encode_search_result(key: &str, value: Option<&str>) -> String {
    match value {
        Some(value) => {
            let mut hit = HashMap::with_capacity(1);
            hit.insert(key, value);
            serde_json::to_string(&hit).unwrap_or_else(|_| "{}".to_string())
        }
        None => "{}".to_string(),
    }
}

/// Extracts the value for `key` from a Search reply. An empty blob is read as
/// a miss.
pub fn decode_search_result(
    key: &str,
    kv_string: &str,
) -> std::result::Result<Option<Value>, serde_json::Error> {
    if kv_string.trim().is_empty() {
        return Ok(None);
    }
    let mut kv: HashMap<String, Value> = serde_json::from_str(kv_string)?;
    Ok(kv.remove(key))
}
