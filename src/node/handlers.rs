use axum::{Extension, Json, http::StatusCode};
use std::sync::Arc;

use super::protocol::{
    DeleteKeyValueRequest, DeleteKeyValueResponse, NodeStatsResponse, RpcErrorResponse,
    SearchKeyValueRequest, SearchKeyValueResponse, UpdateKeyValueRequest, UpdateKeyValueResponse,
    encode_search_result,
};
use super::service::CacheNode;

type RpcError = (StatusCode, Json<RpcErrorResponse>);

fn rpc_error(status: StatusCode, error: impl Into<String>) -> RpcError {
    (
        status,
        Json(RpcErrorResponse {
            error: error.into(),
        }),
    )
}

fn unavailable() -> RpcError {
    rpc_error(StatusCode::SERVICE_UNAVAILABLE, "node worker pool is closed")
}

pub async fn handle_update(
    Extension(node): Extension<Arc<CacheNode>>,
    Json(req): Json<UpdateKeyValueRequest>,
) -> Result<Json<UpdateKeyValueResponse>, RpcError> {
    let _permit = node.acquire_worker().await.map_err(|_| unavailable())?;

    match node.update(&req.kv_string) {
        Ok(update_cnt) => Ok(Json(UpdateKeyValueResponse { update_cnt })),
        Err(e) => {
            tracing::error!("Rejected update: {}", e);
            Err(rpc_error(StatusCode::BAD_REQUEST, e.to_string()))
        }
    }
}

pub async fn handle_search(
    Extension(node): Extension<Arc<CacheNode>>,
    Json(req): Json<SearchKeyValueRequest>,
) -> Result<Json<SearchKeyValueResponse>, RpcError> {
    let _permit = node.acquire_worker().await.map_err(|_| unavailable())?;

    let value = node.search(&req.key);
    tracing::debug!("Search {} -> hit={}", req.key, value.is_some());

    Ok(Json(SearchKeyValueResponse {
        kv_string: encode_search_result(&req.key, value.as_deref()),
    }))
}

pub async fn handle_delete(
    Extension(node): Extension<Arc<CacheNode>>,
    Json(req): Json<DeleteKeyValueRequest>,
) -> Result<Json<DeleteKeyValueResponse>, RpcError> {
    let _permit = node.acquire_worker().await.map_err(|_| unavailable())?;

    let delete_cnt = node.delete(&req.key);
    tracing::debug!("Delete {} -> {}", req.key, delete_cnt);

    Ok(Json(DeleteKeyValueResponse { delete_cnt }))
}

pub async fn handle_stats(Extension(node): Extension<Arc<CacheNode>>) -> Json<NodeStatsResponse> {
    Json(NodeStatsResponse {
        node_id: node.node_id().to_string(),
        key_count: node.key_count(),
    })
}
