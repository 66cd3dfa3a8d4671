//! Helpers for tests that need real nodes listening on loopback ports.

use crate::config::{ClusterConfig, NodeEndpoint};
use crate::node::{CacheNode, server};

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

pub struct RunningNode {
    pub node: Arc<CacheNode>,
    pub addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    handle: tokio::task::JoinHandle<std::io::Result<()>>,
}

impl RunningNode {
    pub fn endpoint(&self) -> NodeEndpoint {
        self.addr.to_string().parse().unwrap()
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        self.handle.await.unwrap().unwrap();
    }
}

pub async fn spawn_node(worker_limit: usize) -> RunningNode {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let node = CacheNode::new(worker_limit);
    let (tx, rx) = oneshot::channel::<()>();

    let handle = tokio::spawn(server::serve(listener, node.clone(), async move {
        let _ = rx.await;
    }));

    RunningNode {
        node,
        addr,
        shutdown: Some(tx),
        handle,
    }
}

pub async fn spawn_cluster(size: usize) -> Vec<RunningNode> {
    let mut nodes = Vec::with_capacity(size);
    for _ in 0..size {
        nodes.push(spawn_node(16).await);
    }
    nodes
}

pub fn cluster_config(nodes: &[RunningNode]) -> ClusterConfig {
    ClusterConfig::new(nodes.iter().map(RunningNode::endpoint).collect())
        .with_rpc_timeout(Duration::from_secs(2))
}

/// An address nothing listens on: bind a port, then release it.
pub async fn dead_endpoint() -> NodeEndpoint {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr.to_string().parse().unwrap()
}
