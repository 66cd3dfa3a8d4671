//! RPC client for a single cache node.

use crate::config::NodeEndpoint;
use crate::error::{CacheError, Result};
use crate::node::protocol::*;
use crate::routing::{Batch, ShardIndex, Value};

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Session to the node serving one shard.
///
/// The underlying `reqwest::Client` keeps its own connection pool, so one
/// handle serves any number of concurrent calls.
pub struct NodeClient {
    shard: ShardIndex,
    endpoint: NodeEndpoint,
    http_client: reqwest::Client,
    timeout: Duration,
    attempts: usize,
}

impl NodeClient {
    pub fn new(shard: ShardIndex, endpoint: NodeEndpoint, timeout: Duration, attempts: usize) -> Self {
        Self {
            shard,
            endpoint,
            http_client: reqwest::Client::new(),
            timeout,
            attempts: attempts.max(1),
        }
    }

    pub fn shard(&self) -> ShardIndex {
        self.shard
    }

    pub fn endpoint(&self) -> &NodeEndpoint {
        &self.endpoint
    }

    /// Sends `batch` to the node and returns the node's applied count.
    pub async fn update(&self, batch: &Batch) -> Result<usize> {
        let payload = UpdateKeyValueRequest {
            kv_string: encode_batch(batch),
        };
        let response: UpdateKeyValueResponse =
            self.call("update", ENDPOINT_UPDATE, Some(&payload)).await?;
        Ok(response.update_cnt)
    }

    pub async fn search(&self, key: &str) -> Result<Option<Value>> {
        let payload = SearchKeyValueRequest {
            key: key.to_string(),
        };
        let response: SearchKeyValueResponse =
            self.call("search", ENDPOINT_SEARCH, Some(&payload)).await?;

        decode_search_result(key, &response.kv_string).map_err(|e| CacheError::Decode {
            shard: self.shard,
            call: "search",
            message: e.to_string(),
        })
    }

    pub async fn delete(&self, key: &str) -> Result<usize> {
        let payload = DeleteKeyValueRequest {
            key: key.to_string(),
        };
        let response: DeleteKeyValueResponse =
            self.call("delete", ENDPOINT_DELETE, Some(&payload)).await?;
        Ok(response.delete_cnt)
    }

    pub async fn stats(&self) -> Result<NodeStatsResponse> {
        self.call::<(), _>("stats", ENDPOINT_STATS, None).await
    }

    /// Issues one RPC: POST with a JSON body when `payload` is set, GET
    /// otherwise. Non-success statuses and undecodable bodies become errors.
    async fn call<Req, Resp>(
        &self,
        call: &'static str,
        path: &str,
        payload: Option<&Req>,
    ) -> Result<Resp>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        let url = format!("{}{}", self.endpoint.base_url(), path);
        let response = self.send_with_retry(call, &url, payload).await?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<RpcErrorResponse>().await {
                Ok(body) => body.error,
                Err(_) => status.canonical_reason().unwrap_or("unknown").to_string(),
            };
            return Err(CacheError::Remote {
                shard: self.shard,
                call,
                status: status.as_u16(),
                message,
            });
        }

        response.json::<Resp>().await.map_err(|e| {
            if e.is_timeout() {
                CacheError::Timeout {
                    shard: self.shard,
                    timeout: self.timeout,
                }
            } else {
                CacheError::Decode {
                    shard: self.shard,
                    call,
                    message: e.to_string(),
                }
            }
        })
    }

    /// Retries only transport failures, and only when more than one attempt
    /// is configured. Every retry is logged.
    async fn send_with_retry<Req: Serialize>(
        &self,
        call: &'static str,
        url: &str,
        payload: Option<&Req>,
    ) -> Result<reqwest::Response> {
        let mut delay_ms = 150u64;

        for attempt in 0..self.attempts {
            let request = match payload {
                Some(body) => self.http_client.post(url).json(body),
                None => self.http_client.get(url),
            };
            let response = request.timeout(self.timeout).send().await;

            match response {
                Ok(resp) => return Ok(resp),
                Err(e) => {
                    let err = CacheError::from_transport(self.shard, self.timeout, e);
                    if attempt + 1 == self.attempts {
                        return Err(err);
                    }
                    tracing::warn!(
                        "{} to shard {} failed (attempt {}/{}): {}",
                        call,
                        self.shard,
                        attempt + 1,
                        self.attempts,
                        err
                    );
                    let jitter = rand::random::<u64>() % 50;
                    tokio::time::sleep(Duration::from_millis(delay_ms + jitter)).await;
                    delay_ms = (delay_ms * 2).min(1200);
                }
            }
        }

        Err(CacheError::Config("rpc_attempts must be >= 1".to_string()))
    }
}
