use clap::{Args, Parser, Subcommand};
use sharded_cache::config::{
    ClusterConfig, DEFAULT_NODE_WORKERS, DEFAULT_RPC_ATTEMPTS, parse_endpoints,
};
use sharded_cache::gateway::{Gateway, server as gateway_server};
use sharded_cache::node::{CacheNode, server as node_server};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::sync::watch;

#[derive(Parser, Debug)]
#[command(name = "sharded-cache")]
#[command(about = "Sharded in-memory key-value cache")]
#[command(version)]
struct Cli {
    /// Maximum log level (trace, debug, info, warn, error)
    #[arg(long, env = "CACHE_LOG_LEVEL", default_value = "info", global = true)]
    log_level: tracing::Level,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a cache node (RPC server only).
    Node(NodeArgs),
    /// Run the client-facing gateway (HTTP front only).
    Gateway(GatewayArgs),
    /// Run a cache node and a gateway in one process.
    Combined {
        #[command(flatten)]
        node: NodeArgs,
        #[command(flatten)]
        gateway: GatewayArgs,
    },
}

#[derive(Args, Debug)]
struct NodeArgs {
    /// Address the node RPC server binds to
    #[arg(long, env = "CACHE_RPC_BIND", default_value = "0.0.0.0:8000")]
    rpc_bind: SocketAddr,

    /// Maximum number of RPC calls handled concurrently
    #[arg(long, env = "CACHE_NODE_WORKERS", default_value_t = DEFAULT_NODE_WORKERS)]
    workers: usize,
}

#[derive(Args, Debug)]
struct GatewayArgs {
    /// Address the gateway HTTP server binds to
    #[arg(long, env = "CACHE_HTTP_BIND", default_value = "0.0.0.0:5000")]
    http_bind: SocketAddr,

    /// Comma-separated node endpoints; position i serves shard i
    #[arg(long, env = "CACHE_NODES")]
    nodes: String,

    /// Per-call timeout for node RPCs, in milliseconds
    #[arg(long, env = "CACHE_RPC_TIMEOUT_MS", default_value_t = 3000)]
    rpc_timeout_ms: u64,

    /// Attempts per node RPC (1 = no retries)
    #[arg(long, env = "CACHE_RPC_ATTEMPTS", default_value_t = DEFAULT_RPC_ATTEMPTS)]
    rpc_attempts: usize,

    /// Seed key-1..key-N before serving (0 disables)
    #[arg(long, env = "CACHE_PRELOAD", default_value_t = 0)]
    preload: usize,
}

impl GatewayArgs {
    fn cluster_config(&self) -> anyhow::Result<ClusterConfig> {
        let config = ClusterConfig::new(parse_endpoints(&self.nodes)?)
            .with_rpc_timeout(Duration::from_millis(self.rpc_timeout_ms))
            .with_rpc_attempts(self.rpc_attempts);
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .init();

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        tracing::info!("Shutdown signal received");
        let _ = shutdown_tx.send(true);
    });

    match cli.cmd {
        Command::Node(node) => {
            let (_, node_task) = start_node(node, shutdown_rx).await?;
            node_task.await?
        }
        Command::Gateway(gateway) => run_gateway(gateway, shutdown_rx).await,
        Command::Combined { node, gateway } => {
            // The local node is listening before the gateway preloads into it.
            let (_, node_task) = start_node(node, shutdown_rx.clone()).await?;
            run_gateway(gateway, shutdown_rx).await?;
            node_task.await??;
            Ok(())
        }
    }
}

type NodeTask = tokio::task::JoinHandle<anyhow::Result<()>>;

/// Binds the node's RPC listener, then serves it on a spawned task.
async fn start_node(
    args: NodeArgs,
    shutdown: watch::Receiver<bool>,
) -> anyhow::Result<(SocketAddr, NodeTask)> {
    if args.workers == 0 {
        anyhow::bail!("--workers must be >= 1");
    }
    let listener = tokio::net::TcpListener::bind(args.rpc_bind).await?;
    let addr = listener.local_addr()?;
    let node = CacheNode::new(args.workers);

    let task = tokio::spawn(async move {
        node_server::serve(listener, node, wait_for_shutdown(shutdown)).await?;
        Ok::<(), anyhow::Error>(())
    });
    Ok((addr, task))
}

async fn run_gateway(args: GatewayArgs, shutdown: watch::Receiver<bool>) -> anyhow::Result<()> {
    let config = args.cluster_config()?;
    let gateway = Gateway::new(&config)?;

    if args.preload > 0 {
        tracing::info!("Preloading {} keys, please don't shut down...", args.preload);
        gateway.preload(args.preload).await;
    }

    let listener = tokio::net::TcpListener::bind(args.http_bind).await?;
    tracing::info!("Press Ctrl+C to shutdown");

    gateway_server::serve(listener, gateway, wait_for_shutdown(shutdown)).await?;
    Ok(())
}

/// Resolves once the shutdown flag flips. If the signal listener is gone the
/// flag can never flip, so this waits forever.
async fn wait_for_shutdown(mut shutdown: watch::Receiver<bool>) {
    while !*shutdown.borrow() {
        if shutdown.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
