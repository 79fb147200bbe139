//! Server wiring and lifecycle.

use crate::args::{Cli, LogLevel};
use anyhow::Context;
use cw_api::ServiceState;
use cw_cache::ValkeyCache;
use cw_engine::PrefetchEngine;
use cw_s3::S3Store;
use cw_types::Config;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::info;
use tracing_subscriber::fmt;

/// Initialize logging with the specified level.
///
/// Logs are written to stderr so stdout remains clean for program output.
pub fn init_logging(level: LogLevel) {
    fmt::Subscriber::builder()
        .with_max_level(tracing::Level::from(level))
        .with_writer(std::io::stderr)
        .init();
}

/// Load configuration, build the external clients, and serve until shutdown.
///
/// A failure to load config or construct either client is fatal and exits
/// the process with a nonzero status.
pub async fn execute(args: Cli) -> anyhow::Result<()> {
    let config = Config::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    info!(path = %args.config.display(), "Loaded configuration");

    let store = Arc::new(
        S3Store::new(&config.s3)
            .await
            .context("initializing S3 client")?,
    );
    let cache = Arc::new(
        ValkeyCache::connect(&config.cache)
            .await
            .context("connecting to cache cluster")?,
    );
    info!(
        endpoint = %config.cache.elasticache_endpoint,
        port = config.cache.elasticache_port,
        "Connected to cache cluster"
    );

    let engine = PrefetchEngine::new(store, cache, &config.prefetching);
    let state = Arc::new(ServiceState::new(engine));

    let addr: SocketAddr = config
        .server
        .listen_addr
        .parse()
        .with_context(|| format!("invalid listen address {}", config.server.listen_addr))?;

    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown signal received");
            let _ = shutdown_tx.send(());
        }
    });

    info!(
        addr = %addr,
        concurrency_limit = config.prefetching.concurrency_limit,
        "Serving prefetch API"
    );
    cw_api::serve(addr, state, shutdown_rx).await
}
