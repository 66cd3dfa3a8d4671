//! Cache Node Module Tests
//!
//! ## Test Scopes
//! - **Service**: Update/Search/Delete semantics on a node instance, including
//!   the distinct-key count and the worker limit.
//! - **Protocol**: the `kv_string` codec for batches and Search replies.
//! - **HTTP surface**: the RPC endpoints served by a real listener, including
//!   rejection of malformed batches.

#[cfg(test)]
mod tests {
    use crate::node::CacheNode;
    use crate::node::protocol::*;
    use crate::routing::Batch;
    use crate::test_support::spawn_node;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;

    fn batch_of(pairs: &[(&str, &str)]) -> Batch {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    // ============================================================
    // SERVICE TESTS
    // ============================================================

    #[test]
    fn test_update_then_search() {
        let node = CacheNode::new(4);

        let applied = node.update(r#"{"k": "v"}"#).unwrap();

        assert_eq!(applied, 1);
        assert_eq!(node.search("k").as_deref(), Some("v"));
    }

    #[test]
    fn test_overwrite_keeps_count_and_takes_latest_value() {
        let node = CacheNode::new(4);

        assert_eq!(node.update(r#"{"k": "v1"}"#).unwrap(), 1);
        let count_after_first = node.key_count();

        // Overwrites still count as applied.
        assert_eq!(node.update(r#"{"k": "v2"}"#).unwrap(), 1);

        assert_eq!(node.key_count(), count_after_first);
        assert_eq!(node.key_count(), 1);
        assert_eq!(node.search("k").as_deref(), Some("v2"));
    }

    #[test]
    fn test_delete_reports_zero_or_one() {
        let node = CacheNode::new(4);

        assert_eq!(node.delete("missing"), 0);

        node.update(r#"{"k": "v"}"#).unwrap();
        assert_eq!(node.delete("k"), 1);
        assert!(node.search("k").is_none());
        assert_eq!(node.key_count(), 0);
    }

    #[test]
    fn test_malformed_update_applies_nothing() {
        let node = CacheNode::new(4);

        for bad in ["not json", "[1, 2]", r#"{"a": 1}"#, r#"{"a": "1", "b": null}"#, ""] {
            let err = node.update(bad).unwrap_err();
            assert!(
                matches!(err, crate::error::CacheError::InvalidArgument(_)),
                "{:?} should be InvalidArgument, got {}",
                bad,
                err
            );
        }

        assert_eq!(node.key_count(), 0);
        assert!(node.search("a").is_none());
    }

    #[test]
    fn test_nodes_do_not_share_state() {
        let first = CacheNode::new(4);
        let second = CacheNode::new(4);

        first.update(r#"{"k": "v"}"#).unwrap();

        assert!(second.search("k").is_none());
        assert_ne!(first.node_id(), second.node_id());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_count_matches_store_after_concurrent_updates_and_deletes() {
        let node = CacheNode::new(8);
        let mut handles = Vec::new();

        for task in 0..12 {
            let node: Arc<CacheNode> = node.clone();
            handles.push(tokio::spawn(async move {
                for round in 0..20 {
                    let batch: Batch = (0..10)
                        .map(|i| (format!("t{}-r{}-k{}", task, round, i), "v".to_string()))
                        .collect();
                    assert_eq!(node.update_batch(batch), 10);
                    if round % 3 == 0 {
                        for i in 0..5 {
                            assert_eq!(node.delete(&format!("t{}-r{}-k{}", task, round, i)), 1);
                        }
                    }
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        // 12 tasks * 20 rounds * 10 keys, minus 5 keys in each of 7 rounds per task.
        let expected = 12 * 20 * 10 - 12 * 7 * 5;
        assert_eq!(node.store().dump().len(), expected);
        assert_eq!(node.key_count(), expected);
    }

    #[tokio::test]
    async fn test_worker_limit_blocks_until_a_permit_drops() {
        let node = CacheNode::new(2);
        assert_eq!(node.worker_limit(), 2);

        let first = node.acquire_worker().await.unwrap();
        let second = node.acquire_worker().await.unwrap();

        assert!(
            timeout(Duration::from_millis(100), node.acquire_worker())
                .await
                .is_err(),
            "a third call must wait while both workers are busy"
        );

        drop(first);
        let third = timeout(Duration::from_secs(1), node.acquire_worker())
            .await
            .expect("freed worker was not handed out")
            .unwrap();

        drop(second);
        drop(third);
    }

    #[test]
    fn test_zero_worker_limit_is_raised_to_one() {
        assert_eq!(CacheNode::new(0).worker_limit(), 1);
    }

    // ============================================================
    // PROTOCOL TESTS
    // ============================================================

    #[test]
    fn test_batch_blob_decodes_back() {
        let batch = batch_of(&[("alpha", "1"), ("beta", "2")]);
        let decoded = decode_batch(&encode_batch(&batch)).unwrap();
        assert_eq!(decoded, batch);
    }

    #[test]
    fn test_search_result_encoding() {
        assert_eq!(encode_search_result("k", None), "{}");
        assert_eq!(encode_search_result("k", Some("v")), r#"{"k":"v"}"#);

        assert_eq!(decode_search_result("k", "{}").unwrap(), None);
        assert_eq!(decode_search_result("k", "").unwrap(), None);
        assert_eq!(
            decode_search_result("k", r#"{"k": "v"}"#).unwrap().as_deref(),
            Some("v")
        );
        // A reply for a different key is a miss for this one.
        assert_eq!(decode_search_result("k", r#"{"other": "v"}"#).unwrap(), None);
        assert!(decode_search_result("k", "garbage").is_err());
    }

    // ============================================================
    // HTTP SURFACE TESTS
    // ============================================================

    #[tokio::test]
    async fn test_rpc_endpoints_over_http() {
        let running = spawn_node(4).await;
        let http = reqwest::Client::new();

        let update: UpdateKeyValueResponse = http
            .post(running.url(ENDPOINT_UPDATE))
            .json(&UpdateKeyValueRequest {
                kv_string: r#"{"alpha": "1", "beta": "2"}"#.to_string(),
            })
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(update.update_cnt, 2);

        let search: SearchKeyValueResponse = http
            .post(running.url(ENDPOINT_SEARCH))
            .json(&SearchKeyValueRequest {
                key: "alpha".to_string(),
            })
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(search.kv_string, r#"{"alpha":"1"}"#);

        let delete: DeleteKeyValueResponse = http
            .post(running.url(ENDPOINT_DELETE))
            .json(&DeleteKeyValueRequest {
                key: "beta".to_string(),
            })
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(delete.delete_cnt, 1);

        let stats: NodeStatsResponse = http
            .get(running.url(ENDPOINT_STATS))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(stats.key_count, 1);
        assert_eq!(stats.node_id, running.node.node_id().to_string());

        running.stop().await;
    }

    #[tokio::test]
    async fn test_malformed_update_is_bad_request() {
        let running = spawn_node(4).await;
        let http = reqwest::Client::new();

        let response = http
            .post(running.url(ENDPOINT_UPDATE))
            .json(&UpdateKeyValueRequest {
                kv_string: "{not json".to_string(),
            })
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
        let body: RpcErrorResponse = response.json().await.unwrap();
        assert!(body.error.contains("invalid argument"));
        assert_eq!(running.node.key_count(), 0);

        running.stop().await;
    }

    #[tokio::test]
    async fn test_rpc_waits_for_a_free_worker() {
        let running = spawn_node(1).await;
        let busy = running.node.acquire_worker().await.unwrap();

        let http = reqwest::Client::new();
        let url = running.url(ENDPOINT_UPDATE);
        let call = tokio::spawn(async move {
            http.post(url)
                .json(&UpdateKeyValueRequest {
                    kv_string: r#"{"queued": "1"}"#.to_string(),
                })
                .send()
                .await
                .unwrap()
                .status()
        });

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!call.is_finished());
        assert_eq!(running.node.key_count(), 0);

        drop(busy);
        let status = timeout(Duration::from_secs(5), call)
            .await
            .expect("update still blocked after the worker was freed")
            .unwrap();
        assert_eq!(status, reqwest::StatusCode::OK);
        assert_eq!(running.node.search("queued").as_deref(), Some("1"));

        running.stop().await;
    }
}
