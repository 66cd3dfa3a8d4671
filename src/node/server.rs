use axum::{
    Extension, Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

use super::handlers::{handle_delete, handle_search, handle_stats, handle_update};
use super::protocol::{ENDPOINT_DELETE, ENDPOINT_SEARCH, ENDPOINT_STATS, ENDPOINT_UPDATE};
use super::service::CacheNode;
use crate::config::NODE_BODY_LIMIT;

pub fn router(node: Arc<CacheNode>) -> Router {
    Router::new()
        .route(ENDPOINT_UPDATE, post(handle_update))
        .route(ENDPOINT_SEARCH, post(handle_search))
        .route(ENDPOINT_DELETE, post(handle_delete))
        .route(ENDPOINT_STATS, get(handle_stats))
        .layer(DefaultBodyLimit::max(NODE_BODY_LIMIT))
        .layer(Extension(node))
}

/// Serves the node RPC endpoints on `listener` until `shutdown` resolves.
///
/// In-flight calls are drained before this returns.
pub async fn serve<F>(listener: TcpListener, node: Arc<CacheNode>, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    tracing::info!("Cache node {} serving RPC on {}", node.node_id(), addr);

    axum::serve(listener, router(node.clone()))
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!(
        "Cache node {} stopped with {} keys",
        node.node_id(),
        node.key_count()
    );
    Ok(())
}
