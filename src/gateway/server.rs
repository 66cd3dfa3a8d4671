use axum::{
    Extension, Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

use super::dispatcher::Gateway;
use super::handlers::{handle_delete, handle_get, handle_write};
use crate::config::GATEWAY_BODY_LIMIT;

pub fn router(gateway: Arc<Gateway>) -> Router {
    Router::new()
        .route("/", post(handle_write))
        .route("/:key", get(handle_get).delete(handle_delete))
        .layer(DefaultBodyLimit::max(GATEWAY_BODY_LIMIT))
        .layer(Extension(gateway))
}

/// Serves the client-facing HTTP surface until `shutdown` resolves, then
/// closes the node clients.
pub async fn serve<F>(listener: TcpListener, gateway: Arc<Gateway>, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    tracing::info!("Gateway listening on {}", listener.local_addr()?);

    axum::serve(listener, router(gateway.clone()))
        .with_graceful_shutdown(shutdown)
        .await?;

    gateway.shutdown();
    tracing::info!("Gateway stopped");
    Ok(())
}
